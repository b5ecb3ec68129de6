use crate::graph::NodeIndex;

/// Errors raised by graph mutation, ordering and the reduction drivers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input graph contains a directed cycle.
    #[error("the input graph is not a dag")]
    NotADag,
    /// The edge scheduled for removal is not present in the graph.
    #[error("no edge {from:?} -> {to:?} in the graph")]
    NoSuchEdge { from: NodeIndex, to: NodeIndex },
    /// A node identifier outside `[0, node_count)`.
    #[error("node {0:?} is out of range")]
    OutOfRange(NodeIndex),
    /// A batch insertion would close a directed cycle. The graph may have
    /// been partially re-ordered and must be discarded.
    #[error("edge batch would create a cycle")]
    CycleDetected,
    /// A generator parameter outside its supported range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
