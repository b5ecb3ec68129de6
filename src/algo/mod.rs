//! Ordering and traversal algorithms on [`DiGraph`].
//!
//! The topological machinery lives here: Kahn's algorithm ([`toposort`]),
//! topological sorting of the adjacency lists ([`sort_adjacency`]) and the
//! predicates the rest of the crate uses to state its pre- and
//! post-conditions. The transitive reduction drivers are in [`tred`].

pub mod tred;

use fixedbitset::FixedBitSet;

use crate::error::Error;
use crate::graph::{DiGraph, NodeIndex};

/// A topological numbering of a DAG.
///
/// Keeps the two parallel sequences `position(node)` and `node_at(position)`
/// over `0..len`. Produced by [`toposort`]; every edge of the graph it was
/// computed for points from a smaller to a larger position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopoOrder {
    /// Position by node id.
    pub(crate) to: Vec<usize>,
    /// Node id by position.
    pub(crate) order: Vec<NodeIndex>,
}

impl TopoOrder {
    /// The position of `n` in the order.
    ///
    /// Panics when `n` is out of range.
    #[inline]
    pub fn position(&self, n: NodeIndex) -> usize {
        self.to[n.index()]
    }

    /// The node at `position`.
    ///
    /// Panics when `position >= len()`.
    #[inline]
    pub fn node_at(&self, position: usize) -> NodeIndex {
        self.order[position]
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The nodes in topological order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeIndex> + '_ {
        self.order.iter().copied()
    }

    /// The position sequence indexed by node id.
    pub fn positions(&self) -> &[usize] {
        &self.to
    }
}

/// Compute a topological order of `g` with Kahn's algorithm.
///
/// The worklist of ready nodes is popped LIFO, so among the many valid
/// topologies one specific one is produced deterministically; no caller may
/// rely on which. Fails with [`Error::NotADag`] when the graph contains a
/// directed cycle, in which case `g` is left untouched (it is never mutated
/// by this function).
///
/// Runs in **O(|V| + |E|)**.
///
/// ```
/// use dagred::{algo::toposort, graph::DiGraph};
///
/// let g = DiGraph::from_edges(3, &[(2, 1), (1, 0)]).unwrap();
/// let topo = toposort(&g).unwrap();
/// assert!(topo.position(2.into()) < topo.position(0.into()));
///
/// let cyclic = DiGraph::from_edges(2, &[(0, 1), (1, 0)]).unwrap();
/// assert!(toposort(&cyclic).is_err());
/// ```
pub fn toposort(g: &DiGraph) -> Result<TopoOrder, Error> {
    let n = g.node_count();
    let mut to = vec![0usize; n];
    let mut order = Vec::with_capacity(n);
    // number of edges into each node already released by an emitted node
    let mut visited_edges = vec![0usize; n];
    let mut visited_total = 0usize;

    let mut ready: Vec<NodeIndex> = g.sources().collect();
    while let Some(node) = ready.pop() {
        to[node.index()] = order.len();
        order.push(node);
        for &succ in g.successors(node) {
            visited_edges[succ.index()] += 1;
            visited_total += 1;
            if visited_edges[succ.index()] == g.predecessors(succ).len() {
                ready.push(succ);
            }
        }
    }

    if visited_total != g.edge_count() {
        return Err(Error::NotADag);
    }
    Ok(TopoOrder { to, order })
}

/// Sort every adjacency list of `g` by the given order: outgoing neighbors
/// ascending, incoming neighbors descending by position.
///
/// This orientation is what lets the ordered reduction drivers break out of
/// their witness scans at the first neighbor past the index guard. The edge
/// set is unchanged.
pub fn sort_adjacency(g: &mut DiGraph, topo: &TopoOrder) {
    g.sort_neighbors(&topo.to);
}

/// Whether `topo` is a valid topological order of `g`: the two sequences
/// agree and every edge points from a smaller to a larger position.
pub fn is_topological_order(g: &DiGraph, topo: &TopoOrder) -> bool {
    if topo.len() != g.node_count() {
        return false;
    }
    for (position, node) in topo.iter().enumerate() {
        if topo.position(node) != position {
            return false;
        }
    }
    g.edges()
        .all(|(a, b)| topo.position(a) < topo.position(b))
}

/// Whether every adjacency list of `g` is sorted the way [`sort_adjacency`]
/// leaves it: outgoing strictly ascending, incoming strictly descending.
pub fn is_adjacency_sorted(g: &DiGraph, topo: &TopoOrder) -> bool {
    g.node_indices().all(|n| {
        let out = g.successors(n);
        let inc = g.predecessors(n);
        out.windows(2)
            .all(|w| topo.position(w[0]) < topo.position(w[1]))
            && inc
                .windows(2)
                .all(|w| topo.position(w[0]) > topo.position(w[1]))
    })
}

/// The set of nodes reachable from `from`, including `from` itself, as a
/// bitset over node ids.
pub fn reachable_from(g: &DiGraph, from: NodeIndex) -> FixedBitSet {
    let mut visited = FixedBitSet::with_capacity(g.node_count());
    let mut stack = vec![from];
    visited.insert(from.index());
    while let Some(node) = stack.pop() {
        for &succ in g.successors(node) {
            if !visited.contains(succ.index()) {
                visited.insert(succ.index());
                stack.push(succ);
            }
        }
    }
    visited
}

/// Whether a directed path from `from` to `to` exists. Returns `true` when
/// the two are equal.
pub fn has_path(g: &DiGraph, from: NodeIndex, to: NodeIndex) -> bool {
    if from == to {
        return true;
    }
    let mut visited = FixedBitSet::with_capacity(g.node_count());
    let mut stack = vec![from];
    visited.insert(from.index());
    while let Some(node) = stack.pop() {
        for &succ in g.successors(node) {
            if succ == to {
                return true;
            }
            if !visited.contains(succ.index()) {
                visited.insert(succ.index());
                stack.push(succ);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node_index as n;

    #[test]
    fn toposort_small_dag() {
        let g = DiGraph::from_edges(5, &[(0, 1), (0, 2), (2, 3), (1, 3), (3, 4)]).unwrap();
        let topo = toposort(&g).unwrap();
        assert!(is_topological_order(&g, &topo));
    }

    #[test]
    fn toposort_rejects_cycle() {
        let g = DiGraph::from_edges(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();
        assert_eq!(toposort(&g), Err(Error::NotADag));
    }

    #[test]
    fn toposort_rejects_unreachable_cycle_component() {
        // 0 -> 1 is fine, 2 <-> 3 never becomes ready
        let g = DiGraph::from_edges(4, &[(0, 1), (2, 3), (3, 2)]).unwrap();
        assert_eq!(toposort(&g), Err(Error::NotADag));
    }

    #[test]
    fn sort_adjacency_orients_both_lists() {
        let mut g = DiGraph::from_edges(
            6,
            &[(0, 3), (0, 1), (0, 4), (1, 5), (3, 5), (4, 5), (2, 5)],
        )
        .unwrap();
        let topo = toposort(&g).unwrap();
        sort_adjacency(&mut g, &topo);
        assert!(is_adjacency_sorted(&g, &topo));
        assert!(is_topological_order(&g, &topo));
    }

    #[test]
    fn reachability_helpers_agree() {
        let g = DiGraph::from_edges(5, &[(0, 1), (1, 2), (3, 4)]).unwrap();
        assert!(has_path(&g, n(0), n(2)));
        assert!(!has_path(&g, n(2), n(0)));
        assert!(!has_path(&g, n(0), n(4)));
        assert!(has_path(&g, n(3), n(3)));

        let reach = reachable_from(&g, n(0));
        assert_eq!(reach.ones().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
