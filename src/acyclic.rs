//! A DAG bundled with a topological order that survives edge insertion.
//!
//! [`Acyclic`] owns a [`DiGraph`] together with a valid [`TopoOrder`] and
//! restores the order after a batch of new edges with the PK2 algorithm from
//! *A Batch Algorithm for Maintaining a Topological Order* (David J.
//! Pearce). Only the *affected regions*, the position ranges spanned by
//! edges whose tail currently sits at or after their head, are reworked, so
//! a batch that respects the current order costs nothing beyond appending
//! the edges.
//!
//! Each region is processed in two steps:
//!
//! * **discover** walks forward from every invalidating head within the
//!   region, bounded by the tail's position, marking the positions of all
//!   nodes that must move as *vacant* and recording `(node, boundary)`
//!   frontier pairs on unwind, where the boundary is the node the moved node
//!   must be re-placed behind;
//! * **shift** sweeps the region upward, compacting non-vacant occupants
//!   down by the number of vacancies consumed so far and dropping each
//!   frontier node back in right after its boundary node passes the cursor.

use fixedbitset::FixedBitSet;
use tracing::debug;

use crate::algo::{toposort, TopoOrder};
use crate::error::Error;
use crate::graph::{DiGraph, NodeIndex};

/// A directed acyclic graph with a maintained topological order.
#[derive(Clone, Debug)]
pub struct Acyclic {
    graph: DiGraph,
    topo: TopoOrder,
}

impl Acyclic {
    /// Wrap a graph, computing its order with [`toposort`].
    ///
    /// Fails with [`Error::NotADag`] when the graph is cyclic.
    ///
    /// ```
    /// use dagred::{graph::{node_index, DiGraph}, Acyclic};
    ///
    /// let g = DiGraph::from_edges(3, &[(0, 1)]).unwrap();
    /// let mut dag = Acyclic::try_from_graph(g).unwrap();
    ///
    /// // (1, 2) runs against the current order and forces a re-shuffle
    /// dag.insert_edges(&[(node_index(1), node_index(2))]).unwrap();
    /// assert!(dag.position(node_index(1)) < dag.position(node_index(2)));
    /// ```
    pub fn try_from_graph(graph: DiGraph) -> Result<Self, Error> {
        let topo = toposort(&graph)?;
        Ok(Acyclic { graph, topo })
    }

    /// The underlying graph.
    pub fn inner(&self) -> &DiGraph {
        &self.graph
    }

    /// The maintained order.
    pub fn order(&self) -> &TopoOrder {
        &self.topo
    }

    /// The position of `n` in the maintained order.
    pub fn position(&self, n: NodeIndex) -> usize {
        self.topo.position(n)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Take the wrapper apart.
    pub fn into_inner(self) -> (DiGraph, TopoOrder) {
        (self.graph, self.topo)
    }

    /// Insert a batch of edges and restore the topological order.
    ///
    /// Fails with [`Error::OutOfRange`], before any mutation, when an
    /// endpoint does not name a node, and with [`Error::CycleDetected`] when
    /// the discovery walk runs into a cycle the batch would close. Detection
    /// covers a walk revisiting its own stack and a walk stepping onto the
    /// invalidating tail itself; when several invalidating edges interact, a
    /// vacancy left by an earlier walk can mask a path, so callers must not
    /// feed batches that create cycles and rely on the error. After
    /// `CycleDetected` the wrapper is corrupt and must be discarded.
    ///
    /// Edges already satisfied by the current order are appended without any
    /// re-ordering work.
    pub fn insert_edges(&mut self, batch: &[(NodeIndex, NodeIndex)]) -> Result<(), Error> {
        for &(x, y) in batch {
            if x.index() >= self.graph.node_count() {
                return Err(Error::OutOfRange(x));
            }
            if y.index() >= self.graph.node_count() {
                return Err(Error::OutOfRange(y));
            }
        }

        let mut invalidating: Vec<(NodeIndex, NodeIndex)> = Vec::new();
        for &(x, y) in batch {
            self.graph.add_edge(x, y)?;
            if self.position(x) >= self.position(y) {
                invalidating.push((x, y));
            }
        }
        debug!(
            total = batch.len(),
            invalidating = invalidating.len(),
            "inserting edge batch"
        );
        if invalidating.is_empty() {
            return Ok(());
        }

        invalidating.sort_by_key(|&(x, _)| core::cmp::Reverse(self.position(x)));

        let mut vacant = FixedBitSet::with_capacity(self.graph.node_count());
        let mut region_start = 0;
        let mut lower_bound = self.graph.node_count();
        for i in 0..invalidating.len() {
            let (x, y) = invalidating[i];
            if i > 0 && self.position(x) < lower_bound {
                let frontier = self.discover(&invalidating[region_start..i], &mut vacant)?;
                self.shift(lower_bound, frontier, &mut vacant);
                region_start = i;
                lower_bound = self.graph.node_count();
            }
            lower_bound = lower_bound.min(self.position(y));
        }
        let frontier = self.discover(&invalidating[region_start..], &mut vacant)?;
        self.shift(lower_bound, frontier, &mut vacant);
        Ok(())
    }

    /// Vacate everything that must move for one region and record where it
    /// belongs.
    ///
    /// `edges` must be sorted by descending tail position. A head whose
    /// position is already vacant was reached by an earlier walk with a
    /// higher bound, which subsumes this one.
    fn discover(
        &self,
        edges: &[(NodeIndex, NodeIndex)],
        vacant: &mut FixedBitSet,
    ) -> Result<Vec<(NodeIndex, NodeIndex)>, Error> {
        let mut frontier = Vec::new();
        for &(x, y) in edges {
            if !vacant.contains(self.position(y)) {
                self.bounded_dfs(y, self.position(x), &mut frontier, vacant)?;
            }
        }
        Ok(frontier)
    }

    /// Forward walk from `start` over positions below `upper_bound`, marking
    /// every reached position vacant and pushing `(node, boundary)` pairs in
    /// unwind order. The boundary is the node currently at `upper_bound`.
    fn bounded_dfs(
        &self,
        start: NodeIndex,
        upper_bound: usize,
        frontier: &mut Vec<(NodeIndex, NodeIndex)>,
        vacant: &mut FixedBitSet,
    ) -> Result<(), Error> {
        let boundary = self.topo.node_at(upper_bound);
        let mut on_stack = FixedBitSet::with_capacity(self.graph.node_count());
        let mut stack = vec![start];
        vacant.insert(self.position(start));
        on_stack.insert(self.position(start));

        while let Some(&node) = stack.last() {
            let mut advanced = false;
            for &dest in self.graph.successors(node) {
                let dest_position = self.position(dest);
                if on_stack.contains(dest_position) || dest_position == upper_bound {
                    // walked back into the stack, or onto the tail whose new
                    // edge points at our start
                    return Err(Error::CycleDetected);
                }
                if !vacant.contains(dest_position) && dest_position < upper_bound {
                    stack.push(dest);
                    vacant.insert(dest_position);
                    on_stack.insert(dest_position);
                    advanced = true;
                    break;
                }
            }
            if !advanced {
                stack.pop();
                on_stack.set(self.position(node), false);
                frontier.push((node, boundary));
            }
        }
        Ok(())
    }

    /// Sweep one region from `starting_position` upward, consuming vacant
    /// slots, relocating the occupants in between and draining frontier
    /// pairs behind the cursor as their boundary node is passed.
    fn shift(
        &mut self,
        starting_position: usize,
        mut frontier: Vec<(NodeIndex, NodeIndex)>,
        vacant: &mut FixedBitSet,
    ) {
        let mut consumed = 0usize;
        let mut position = starting_position;
        while !frontier.is_empty() {
            let current = self.topo.node_at(position);
            if vacant.contains(position) {
                consumed += 1;
                vacant.set(position, false);
            } else {
                self.place(current, position - consumed);
            }
            while let Some(&(node, boundary)) = frontier.last() {
                if boundary != current {
                    break;
                }
                consumed -= 1;
                self.place(node, position - consumed);
                frontier.pop();
            }
            position += 1;
        }
    }

    fn place(&mut self, n: NodeIndex, position: usize) {
        self.topo.to[n.index()] = position;
        self.topo.order[position] = n;
    }
}
