//! Bloom Filter Labeling: a reachability index for DAGs.
//!
//! The index combines two labelings computed by one depth-first forest walk
//! from the source nodes, after the scheme in *Reachability Querying: Can It
//! Be Even Faster?* (Su, Zhu, Wei and Yu):
//!
//! * **intervals**: discovery and finish times `disc`/`fin` from a shared
//!   counter; `v` lies in `u`'s DFS subtree iff `[disc(v), fin(v)]` is
//!   contained in `[disc(u), fin(u)]`, which answers those queries positively
//!   in constant time;
//! * **set labels**: per node a Bloom-style bitset over a hashed partition
//!   of the post-order: `lout(n)` unions the bucket bits of all descendants
//!   of `n` (itself included), `lin(n)` symmetrically over ancestors. When
//!   `n` reaches `m`, necessarily `lout(m) ⊆ lout(n)` and `lin(n) ⊆ lin(m)`,
//!   so a failed subset test answers a query negatively.
//!
//! Queries the filters cannot decide fall back to a depth-first search that
//! re-applies both filters at every frontier node, so even the fallback
//! rarely explores far.
//!
//! The index is built once and never updated. Queries take the graph as an
//! argument: the transitive reduction drivers keep removing edges between
//! queries, which is sound because every removed edge is redundant and
//! reachability is preserved.

use fixedbitset::FixedBitSet;
use tracing::trace;

use crate::error::Error;
use crate::graph::{DiGraph, NodeIndex};

/// Sizing knobs for the index.
///
/// `hash_range` is the label width in bits; `fanout` is the number of
/// contiguous post-order intervals merged into hash buckets. Both regimes
/// keep `fanout = 10 * hash_range`. Correctness is independent of the
/// choice, since the labels are only a necessary condition; wider labels
/// reject more queries without a traversal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BflParams {
    pub hash_range: usize,
    pub fanout: usize,
}

impl BflParams {
    /// 64-bit labels, for sparse graphs.
    pub const fn sparse() -> Self {
        BflParams {
            hash_range: 64,
            fanout: 640,
        }
    }

    /// 1024-bit labels, for dense graphs.
    pub const fn dense() -> Self {
        BflParams {
            hash_range: 1024,
            fanout: 10240,
        }
    }
}

impl Default for BflParams {
    fn default() -> Self {
        Self::sparse()
    }
}

/// The immutable index: intervals plus in/out labels for every node.
#[derive(Clone, Debug)]
pub struct BflIndex {
    disc: Vec<usize>,
    fin: Vec<usize>,
    lin: Vec<FixedBitSet>,
    lout: Vec<FixedBitSet>,
}

impl BflIndex {
    /// Build the index over `g` with the default hash (fxhash over the
    /// merge representative's id, reduced modulo `hash_range`).
    ///
    /// Fails with [`Error::NotADag`] when some node is unreachable from
    /// every source, which is how a cycle manifests to the forest walk.
    ///
    /// ```
    /// use dagred::bfl::{BflIndex, BflParams};
    /// use dagred::graph::DiGraph;
    ///
    /// let g = DiGraph::from_edges(4, &[(0, 1), (1, 2), (3, 2)]).unwrap();
    /// let index = BflIndex::build(&g, BflParams::sparse()).unwrap();
    /// assert!(index.reaches(&g, 0.into(), 2.into()));
    /// assert!(!index.reaches(&g, 0.into(), 3.into()));
    /// ```
    pub fn build(g: &DiGraph, params: BflParams) -> Result<Self, Error> {
        let range = params.hash_range as u64;
        Self::build_with_hash(g, params.hash_range, params.fanout, move |n| {
            (fxhash::hash64(&n.index()) % range) as usize
        })
    }

    /// Like [`build`](Self::build), but with a recursive forest walk.
    ///
    /// Produces exactly the same index. The recursive walk is the clearer
    /// of the two but can exhaust the call stack on graphs whose longest
    /// path is very deep; `build` uses an explicit stack instead.
    pub fn build_recursive(g: &DiGraph, params: BflParams) -> Result<Self, Error> {
        let range = params.hash_range as u64;
        let (post_order, disc, fin) = forest_dfs_recursive(g)?;
        Self::from_intervals(
            g,
            params.hash_range,
            params.fanout,
            move |n| (fxhash::hash64(&n.index()) % range) as usize,
            post_order,
            disc,
            fin,
        )
    }

    /// Build the index with a caller-supplied hash.
    ///
    /// `hash` is applied to the merge representative of each node and must
    /// map into `[0, hash_range)`.
    pub fn build_with_hash<H>(
        g: &DiGraph,
        hash_range: usize,
        fanout: usize,
        hash: H,
    ) -> Result<Self, Error>
    where
        H: Fn(NodeIndex) -> usize,
    {
        let (post_order, disc, fin) = forest_dfs(g)?;
        Self::from_intervals(g, hash_range, fanout, hash, post_order, disc, fin)
    }

    fn from_intervals<H>(
        g: &DiGraph,
        hash_range: usize,
        fanout: usize,
        hash: H,
        post_order: Vec<NodeIndex>,
        disc: Vec<usize>,
        fin: Vec<usize>,
    ) -> Result<Self, Error>
    where
        H: Fn(NodeIndex) -> usize,
    {
        if hash_range == 0 {
            return Err(Error::InvalidArgument("hash_range must be at least 1"));
        }
        if fanout == 0 {
            return Err(Error::InvalidArgument("fanout must be at least 1"));
        }
        let n = g.node_count();
        let rep = merge_vertices(&post_order, fanout, n);

        // The post-order lists every descendant of a node before the node
        // itself and every ancestor after it, so one forward pass completes
        // the out-labels and one backward pass the in-labels.
        let mut lout = vec![FixedBitSet::with_capacity(hash_range); n];
        for &node in &post_order {
            let mut label = FixedBitSet::with_capacity(hash_range);
            label.insert(hash(rep[node.index()]));
            for &succ in g.successors(node) {
                label.union_with(&lout[succ.index()]);
            }
            lout[node.index()] = label;
        }
        let mut lin = vec![FixedBitSet::with_capacity(hash_range); n];
        for &node in post_order.iter().rev() {
            let mut label = FixedBitSet::with_capacity(hash_range);
            label.insert(hash(rep[node.index()]));
            for &pred in g.predecessors(node) {
                label.union_with(&lin[pred.index()]);
            }
            lin[node.index()] = label;
        }

        Ok(BflIndex {
            disc,
            fin,
            lin,
            lout,
        })
    }

    /// Whether `v` is reachable from `u` in `g`. Reflexive: `reaches(u, u)`
    /// is `true`.
    ///
    /// `g` must be the graph the index was built over, possibly with some
    /// redundant edges already removed. The query is a pure read; the only
    /// allocation is a visited set local to the call, so batches of queries
    /// against a frozen graph may run from multiple threads.
    ///
    /// Filter-decided queries cost **O(hash_range / word)**; the fallback
    /// search is **O(|V| + |E|)** worst case but prunes with the filters at
    /// every step.
    pub fn reaches(&self, g: &DiGraph, u: NodeIndex, v: NodeIndex) -> bool {
        if self.in_subtree(u, v) {
            return true;
        }
        if self.filter_rejects(u, v) {
            return false;
        }

        trace!(from = u.index(), to = v.index(), "bfl filters inconclusive, starting pruned dfs");
        let mut visited = FixedBitSet::with_capacity(g.node_count());
        let mut stack = vec![u];
        visited.insert(u.index());
        while let Some(node) = stack.pop() {
            for &succ in g.successors(node) {
                if visited.contains(succ.index()) {
                    continue;
                }
                visited.insert(succ.index());
                if self.in_subtree(succ, v) {
                    return true;
                }
                if !self.filter_rejects(succ, v) {
                    stack.push(succ);
                }
            }
        }
        false
    }

    /// Interval containment: `v` lies in the DFS subtree of `u`.
    #[inline]
    fn in_subtree(&self, u: NodeIndex, v: NodeIndex) -> bool {
        self.disc[u.index()] <= self.disc[v.index()] && self.fin[v.index()] <= self.fin[u.index()]
    }

    /// The necessary condition fails, so `u` cannot reach `v`.
    #[inline]
    fn filter_rejects(&self, u: NodeIndex, v: NodeIndex) -> bool {
        !self.lout[v.index()].is_subset(&self.lout[u.index()])
            || !self.lin[u.index()].is_subset(&self.lin[v.index()])
    }

    pub fn node_count(&self) -> usize {
        self.disc.len()
    }

    /// Discovery time of `n` (1-based).
    pub fn discovery(&self, n: NodeIndex) -> usize {
        self.disc[n.index()]
    }

    /// Finish time of `n` (1-based).
    pub fn finish(&self, n: NodeIndex) -> usize {
        self.fin[n.index()]
    }

    pub fn label_in(&self, n: NodeIndex) -> &FixedBitSet {
        &self.lin[n.index()]
    }

    pub fn label_out(&self, n: NodeIndex) -> &FixedBitSet {
        &self.lout[n.index()]
    }
}

/// Forest DFS from every source with an explicit stack.
///
/// Each stack frame carries a cursor into the node's outgoing list, so
/// frames advance one successor per step and depth is bounded by the longest
/// path instead of the call stack.
fn forest_dfs(g: &DiGraph) -> Result<(Vec<NodeIndex>, Vec<usize>, Vec<usize>), Error> {
    let n = g.node_count();
    let mut disc = vec![0usize; n];
    let mut fin = vec![0usize; n];
    let mut post_order = Vec::with_capacity(n);
    let mut t = 0usize;
    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();

    for root in g.sources() {
        t += 1;
        disc[root.index()] = t;
        stack.push((root, 0));
        'walk: while let Some(top) = stack.len().checked_sub(1) {
            while stack[top].1 < g.successors(stack[top].0).len() {
                let succ = g.successors(stack[top].0)[stack[top].1];
                stack[top].1 += 1;
                if disc[succ.index()] == 0 {
                    t += 1;
                    disc[succ.index()] = t;
                    stack.push((succ, 0));
                    continue 'walk;
                }
            }
            let (node, _) = stack[top];
            stack.truncate(top);
            post_order.push(node);
            t += 1;
            fin[node.index()] = t;
        }
    }

    if post_order.len() != n {
        // a node no source can reach sits on a cycle
        return Err(Error::NotADag);
    }
    Ok((post_order, disc, fin))
}

/// Recursive twin of [`forest_dfs`]; identical output.
fn forest_dfs_recursive(g: &DiGraph) -> Result<(Vec<NodeIndex>, Vec<usize>, Vec<usize>), Error> {
    fn visit(
        g: &DiGraph,
        node: NodeIndex,
        t: &mut usize,
        disc: &mut [usize],
        fin: &mut [usize],
        post_order: &mut Vec<NodeIndex>,
    ) {
        *t += 1;
        disc[node.index()] = *t;
        for &succ in g.successors(node) {
            if disc[succ.index()] == 0 {
                visit(g, succ, t, disc, fin, post_order);
            }
        }
        post_order.push(node);
        *t += 1;
        fin[node.index()] = *t;
    }

    let n = g.node_count();
    let mut disc = vec![0usize; n];
    let mut fin = vec![0usize; n];
    let mut post_order = Vec::with_capacity(n);
    let mut t = 0usize;
    for root in g.sources() {
        visit(g, root, &mut t, &mut disc, &mut fin, &mut post_order);
    }
    if post_order.len() != n {
        return Err(Error::NotADag);
    }
    Ok((post_order, disc, fin))
}

/// Partition the post-order into `min(fanout, len)` contiguous intervals of
/// width `⌊len / buckets⌋` (the last interval absorbs the remainder) and map
/// every node to the leading node of its interval.
fn merge_vertices(post_order: &[NodeIndex], fanout: usize, node_count: usize) -> Vec<NodeIndex> {
    let mut rep = vec![NodeIndex::new(0); node_count];
    let len = post_order.len();
    if len == 0 {
        return rep;
    }
    let buckets = fanout.min(len);
    let width = len / buckets;
    for (j, &node) in post_order.iter().enumerate() {
        let interval = (j / width).min(buckets - 1);
        rep[node.index()] = post_order[interval * width];
    }
    rep
}
