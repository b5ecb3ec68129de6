//! **dagred** computes the transitive reduction of directed acyclic graphs.
//!
//! The transitive reduction of a DAG **G** is the unique graph with the same
//! reachability relation as **G** and the fewest edges. This crate implements
//! the three edge-elimination algorithms TR-B, TR-O and TR-O+ from *One Edge
//! at a Time: Novel Approach Towards Efficient Transitive Reduction
//! Computation on DAGs*, driven by a [Bloom Filter Labeling](bfl)
//! reachability index that answers most queries without a full traversal.
//!
//! Supporting pieces: an arena-backed [`DiGraph`], Kahn topological ordering
//! and topological adjacency sorting in [`algo`], an [`Acyclic`] wrapper that
//! keeps its ordering valid across batch edge insertion (Pearce's PK2), a
//! seeded random DAG [generator](generate), and [readers](io) for the `.gra`
//! and SNAP edge-list formats.
//!
//! ```
//! use dagred::{algo::tred::tr_o_plus, graph::DiGraph};
//!
//! // a triangle: 0 -> 1 -> 2 plus the shortcut 0 -> 2
//! let mut g = DiGraph::from_edges(3, &[(0, 1), (1, 2), (0, 2)]).unwrap();
//! tr_o_plus(&mut g).unwrap();
//!
//! // the shortcut is redundant, the chain is not
//! assert_eq!(g.edge_count(), 2);
//! assert!(!g.contains_edge(0.into(), 2.into()));
//! ```

pub mod acyclic;
pub mod algo;
pub mod bfl;
mod error;
pub mod generate;
pub mod graph;
pub mod io;

pub use crate::acyclic::Acyclic;
pub use crate::algo::{sort_adjacency, toposort, TopoOrder};
pub use crate::bfl::{BflIndex, BflParams};
pub use crate::error::Error;
pub use crate::graph::Direction::{Incoming, Outgoing};
pub use crate::graph::{node_index, DiGraph, Direction, NodeIndex};
