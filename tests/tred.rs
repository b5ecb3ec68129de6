use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use dagred::algo::reachable_from;
use dagred::algo::tred::{
    tr_b, tr_b_with, tr_by_closure, tr_o, tr_o_plus, tr_o_plus_with, tr_o_with,
};
use dagred::bfl::BflParams;
use dagred::generate::gnm;
use dagred::graph::{node_index as n, DiGraph};
use dagred::Error;

type Driver = fn(&mut DiGraph) -> Result<(), Error>;

const DRIVERS: [(&str, Driver); 4] = [
    ("tr_b", tr_b),
    ("tr_o", tr_o),
    ("tr_o_plus", tr_o_plus),
    ("tr_by_closure", tr_by_closure),
];

/// The 15-node example graph from the TR paper.
fn paper_graph() -> DiGraph {
    DiGraph::from_edges(
        15,
        &[
            (0, 1),
            (0, 4),
            (0, 5),
            (0, 6),
            (0, 8),
            (1, 2),
            (1, 3),
            (1, 9),
            (2, 9),
            (2, 14),
            (3, 9),
            (3, 10),
            (4, 5),
            (4, 13),
            (5, 9),
            (6, 7),
            (7, 8),
            (7, 13),
            (8, 9),
            (8, 12),
            (9, 10),
            (9, 11),
            (9, 12),
            (9, 13),
            (10, 14),
            (11, 14),
            (12, 14),
            (13, 14),
        ],
    )
    .unwrap()
}

fn assert_is_paper_reduction(g: &DiGraph, driver: &str) {
    for (a, b) in [
        (0, 5),
        (0, 8),
        (1, 9),
        (2, 14),
        (3, 10),
        (4, 13),
        (7, 13),
        (8, 12),
    ] {
        assert!(
            !g.contains_edge(n(a), n(b)),
            "{driver}: redundant edge ({a}, {b}) survived"
        );
    }
    for (a, b) in [
        (0, 1),
        (0, 4),
        (0, 6),
        (1, 2),
        (1, 3),
        (2, 9),
        (3, 9),
        (4, 5),
        (5, 9),
        (6, 7),
        (7, 8),
        (8, 9),
        (9, 10),
        (9, 11),
        (9, 12),
        (9, 13),
        (10, 14),
        (11, 14),
        (12, 14),
        (13, 14),
    ] {
        assert!(
            g.contains_edge(n(a), n(b)),
            "{driver}: irreducible edge ({a}, {b}) was removed"
        );
    }
    assert_eq!(g.edge_count(), 20, "{driver}: wrong edge count");
}

fn edge_set(g: &DiGraph) -> BTreeSet<(usize, usize)> {
    g.edges().map(|(a, b)| (a.index(), b.index())).collect()
}

#[test]
fn every_driver_reduces_the_paper_graph() {
    for (name, driver) in DRIVERS {
        let mut g = paper_graph();
        driver(&mut g).unwrap();
        assert_is_paper_reduction(&g, name);
    }
}

#[test]
fn the_dense_regime_reduces_the_paper_graph_too() {
    let dense = BflParams::dense();
    let mut a = paper_graph();
    tr_b_with(&mut a, dense).unwrap();
    assert_is_paper_reduction(&a, "tr_b dense");

    let mut b = paper_graph();
    tr_o_with(&mut b, dense).unwrap();
    assert_is_paper_reduction(&b, "tr_o dense");

    let mut c = paper_graph();
    tr_o_plus_with(&mut c, dense).unwrap();
    assert_is_paper_reduction(&c, "tr_o_plus dense");
}

#[test]
fn reduction_preserves_reachability() {
    let original = paper_graph();
    for (name, driver) in DRIVERS {
        let mut reduced = original.clone();
        driver(&mut reduced).unwrap();
        for node in original.node_indices() {
            assert_eq!(
                reachable_from(&original, node),
                reachable_from(&reduced, node),
                "{name}: reachable set of {node:?} changed"
            );
        }
    }
}

#[test]
fn drivers_agree_on_a_large_random_dag() {
    let g = gnm(&mut StdRng::seed_from_u64(1_000), 1_000, 20_000, true).unwrap();

    let mut reference = g.clone();
    tr_by_closure(&mut reference).unwrap();
    let expected = edge_set(&reference);

    for (name, driver) in [
        ("tr_b", tr_b as Driver),
        ("tr_o", tr_o),
        ("tr_o_plus", tr_o_plus),
    ] {
        let mut reduced = g.clone();
        driver(&mut reduced).unwrap();
        assert_eq!(edge_set(&reduced), expected, "{name} disagrees");
    }
}

#[test]
fn reduction_is_idempotent() {
    for (name, driver) in DRIVERS {
        let mut g = paper_graph();
        driver(&mut g).unwrap();
        let after_first = edge_set(&g);
        driver(&mut g).unwrap();
        assert_eq!(edge_set(&g), after_first, "{name} kept removing edges");
        assert_eq!(g.edge_count(), after_first.len());
    }
}

#[test]
fn cyclic_input_is_rejected_and_left_untouched() {
    // a short cycle and a longer one buried behind a chain
    let small = DiGraph::from_edges(3, &[(0, 1), (1, 2), (2, 0)]).unwrap();
    let mut chain_edges: Vec<(usize, usize)> = (0..99).map(|i| (i, i + 1)).collect();
    chain_edges.push((99, 40));
    let buried = DiGraph::from_edges(100, &chain_edges).unwrap();

    for cyclic in [small, buried] {
        for (name, driver) in DRIVERS {
            let mut g = cyclic.clone();
            assert_eq!(driver(&mut g), Err(Error::NotADag), "{name}");
            assert_eq!(g, cyclic, "{name} mutated a rejected input");
        }
    }
}
