//! Seeded random graph generation, for tests and benchmarks.
//!
//! All functions take the random source as an argument; under a seeded
//! [`rand::rngs::StdRng`] every result is reproducible.

use indexmap::IndexSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::algo::TopoOrder;
use crate::error::Error;
use crate::graph::{DiGraph, NodeIndex};

/// Generate a graph with `nodes` nodes and `edges` distinct random edges.
///
/// With `acyclic` set, every sampled pair is oriented from the smaller to
/// the larger id, so the result is a DAG whose identity order is
/// topological. Without it, pairs keep their sampled orientation and the
/// result may contain cycles.
///
/// Fails with [`Error::InvalidArgument`] when `nodes < 2` or when `edges`
/// exceeds the number of distinct node pairs (`n(n-1)/2` oriented pairs in
/// acyclic mode, `n(n-1)` otherwise).
pub fn gnm<R: Rng + ?Sized>(
    rng: &mut R,
    nodes: usize,
    edges: usize,
    acyclic: bool,
) -> Result<DiGraph, Error> {
    if nodes < 2 {
        return Err(Error::InvalidArgument("the number of nodes must be at least 2"));
    }
    let capacity = if acyclic {
        nodes * (nodes - 1) / 2
    } else {
        nodes * (nodes - 1)
    };
    if edges > capacity {
        return Err(Error::InvalidArgument("too many edges requested"));
    }

    let mut chosen: IndexSet<(usize, usize)> = IndexSet::with_capacity(edges);
    while chosen.len() < edges {
        let a = rng.gen_range(0..nodes);
        let b = rng.gen_range(0..nodes);
        if a == b {
            continue;
        }
        let pair = if acyclic {
            (a.min(b), a.max(b))
        } else {
            (a, b)
        };
        chosen.insert(pair);
    }

    let mut g = DiGraph::with_nodes(nodes);
    for &(a, b) in &chosen {
        g.add_edge(NodeIndex::new(a), NodeIndex::new(b))?;
    }
    Ok(g)
}

/// Sample `count` new forward edges absent from `g`.
///
/// Every returned edge runs from the smaller to the larger id and is
/// distinct from the existing edges and from the other returned edges.
/// Fails with [`Error::InvalidArgument`] when the request cannot fit next
/// to the existing edges.
pub fn extra_edges<R: Rng + ?Sized>(
    rng: &mut R,
    g: &DiGraph,
    count: usize,
) -> Result<Vec<(NodeIndex, NodeIndex)>, Error> {
    let nodes = g.node_count();
    if nodes < 2 {
        return Err(Error::InvalidArgument("the number of nodes must be at least 2"));
    }
    if count > (nodes * (nodes - 1) / 2).saturating_sub(g.edge_count()) {
        return Err(Error::InvalidArgument("too many edges requested"));
    }

    let mut seen: IndexSet<(usize, usize)> = g
        .edges()
        .map(|(a, b)| (a.index(), b.index()))
        .collect();
    let mut batch = Vec::with_capacity(count);
    while batch.len() < count {
        let a = rng.gen_range(0..nodes);
        let b = rng.gen_range(0..nodes);
        if a == b {
            continue;
        }
        let pair = (a.min(b), a.max(b));
        if seen.insert(pair) {
            batch.push((NodeIndex::new(pair.0), NodeIndex::new(pair.1)));
        }
    }
    Ok(batch)
}

/// Relabel the nodes of `g` with a random permutation, preserving the
/// structure. Returns the new graph and the permutation, `relabel[old] =
/// new`.
pub fn shuffled<R: Rng + ?Sized>(
    rng: &mut R,
    g: &DiGraph,
) -> Result<(DiGraph, Vec<NodeIndex>), Error> {
    let mut relabel: Vec<NodeIndex> = g.node_indices().collect();
    relabel.shuffle(rng);

    let mut out = DiGraph::with_nodes(g.node_count());
    for (a, b) in g.edges() {
        out.add_edge(relabel[a.index()], relabel[b.index()])?;
    }
    Ok((out, relabel))
}

/// Sample `count` query endpoint pairs, each ordered by topological
/// position, so a positive answer is at least possible. Returns an empty
/// vector when the graph has fewer than two nodes.
pub fn query_pairs<R: Rng + ?Sized>(
    rng: &mut R,
    g: &DiGraph,
    count: usize,
    topo: &TopoOrder,
) -> Vec<(NodeIndex, NodeIndex)> {
    let nodes = g.node_count();
    if nodes < 2 {
        return Vec::new();
    }
    let mut pairs = Vec::with_capacity(count);
    while pairs.len() < count {
        let a = NodeIndex::new(rng.gen_range(0..nodes));
        let b = NodeIndex::new(rng.gen_range(0..nodes));
        if a == b {
            continue;
        }
        if topo.position(a) < topo.position(b) {
            pairs.push((a, b));
        } else {
            pairs.push((b, a));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::toposort;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn same_seed_same_graph() {
        let a = gnm(&mut StdRng::seed_from_u64(7), 50, 200, true).unwrap();
        let b = gnm(&mut StdRng::seed_from_u64(7), 50, 200, true).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.edge_count(), 200);
    }

    #[test]
    fn acyclic_mode_generates_a_dag() {
        let g = gnm(&mut StdRng::seed_from_u64(1), 100, 400, true).unwrap();
        assert!(toposort(&g).is_ok());
    }

    #[test]
    fn parameters_are_validated() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            gnm(&mut rng, 1, 0, true),
            Err(Error::InvalidArgument(_))
        ));
        // 4 nodes fit at most 6 forward edges
        assert!(matches!(
            gnm(&mut rng, 4, 7, true),
            Err(Error::InvalidArgument(_))
        ));
        assert!(gnm(&mut rng, 4, 6, true).is_ok());
    }

    #[test]
    fn extra_edges_are_new_and_forward() {
        let mut rng = StdRng::seed_from_u64(3);
        let g = gnm(&mut rng, 30, 100, true).unwrap();
        let batch = extra_edges(&mut rng, &g, 50).unwrap();
        assert_eq!(batch.len(), 50);
        for &(a, b) in &batch {
            assert!(a.index() < b.index());
            assert!(!g.contains_edge(a, b));
        }
        let distinct: IndexSet<_> = batch.iter().collect();
        assert_eq!(distinct.len(), batch.len());
    }

    #[test]
    fn shuffling_preserves_structure() {
        let mut rng = StdRng::seed_from_u64(9);
        let g = gnm(&mut rng, 40, 150, true).unwrap();
        let (h, relabel) = shuffled(&mut rng, &g).unwrap();
        assert_eq!(h.node_count(), g.node_count());
        assert_eq!(h.edge_count(), g.edge_count());
        for (a, b) in g.edges() {
            assert!(h.contains_edge(relabel[a.index()], relabel[b.index()]));
        }
        assert!(toposort(&h).is_ok());
    }

    #[test]
    fn query_pairs_follow_the_order() {
        let mut rng = StdRng::seed_from_u64(4);
        let g = gnm(&mut rng, 25, 60, true).unwrap();
        let topo = toposort(&g).unwrap();
        for (a, b) in query_pairs(&mut rng, &g, 100, &topo) {
            assert!(topo.position(a) < topo.position(b));
        }
    }
}
