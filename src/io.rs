//! Readers for the two graph file formats used by reachability benchmarks.
//!
//! * `.gra`: a title line, a node-count line, then one adjacency line per
//!   node of the form `id: n1 n2 … #`.
//! * SNAP edge lists (`.txt`): `#`-prefixed comment lines, one of which
//!   declares `Nodes: N Edges: E`, followed by whitespace-separated
//!   `from to` pairs. Self-loops and repeated pairs are skipped and node
//!   identifiers are compacted to `[0, N)` in order of first appearance.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use indexmap::IndexMap;

use crate::error::Error;
use crate::graph::{DiGraph, NodeIndex};

/// Errors raised by the graph readers.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("i/o error reading graph")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error(transparent)]
    Graph(#[from] Error),
}

fn syntax(line: usize, message: &str) -> ReadError {
    ReadError::Syntax {
        line,
        message: message.to_owned(),
    }
}

fn expect_line<B: BufRead>(lines: &mut Lines<B>, line: usize) -> Result<String, ReadError> {
    match lines.next() {
        Some(result) => Ok(result?),
        None => Err(syntax(line, "unexpected end of file")),
    }
}

/// Read a graph in `.gra` format.
///
/// ```
/// use std::io::Cursor;
///
/// let text = "tiny\n3\n0: 1 2 #\n1: 2 #\n2: #\n";
/// let g = dagred::io::read_gra(Cursor::new(text)).unwrap();
/// assert_eq!(g.node_count(), 3);
/// assert_eq!(g.edge_count(), 3);
/// ```
pub fn read_gra<R: BufRead>(reader: R) -> Result<DiGraph, ReadError> {
    let mut lines = reader.lines();
    let _title = expect_line(&mut lines, 1)?;
    let nodes: usize = expect_line(&mut lines, 2)?
        .trim()
        .parse()
        .map_err(|_| syntax(2, "expected the number of nodes"))?;

    let mut g = DiGraph::with_nodes(nodes);
    let mut line_no = 2;
    for line in lines {
        line_no += 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (id_part, neighbors) = line
            .split_once(':')
            .ok_or_else(|| syntax(line_no, "expected `id: n1 n2 ... #`"))?;
        let from: usize = id_part
            .trim()
            .parse()
            .map_err(|_| syntax(line_no, "expected a node id before `:`"))?;
        if from >= nodes {
            return Err(syntax(line_no, "node id exceeds the node count"));
        }
        for token in neighbors.split_whitespace() {
            if token == "#" {
                break;
            }
            let to: usize = token
                .parse()
                .map_err(|_| syntax(line_no, "expected a neighbor id or `#`"))?;
            if to >= nodes {
                return Err(syntax(line_no, "neighbor id exceeds the node count"));
            }
            g.add_edge(NodeIndex::new(from), NodeIndex::new(to))?;
        }
    }
    Ok(g)
}

/// Read a graph from a `.gra` file.
pub fn read_gra_file<P: AsRef<Path>>(path: P) -> Result<DiGraph, ReadError> {
    read_gra(BufReader::new(File::open(path)?))
}

/// Read a graph in SNAP edge-list format.
///
/// ```
/// use std::io::Cursor;
///
/// let text = "\
/// ## Directed graph\n\
/// ## Saved as an edge list\n\
/// ## Nodes: 3 Edges: 2\n\
/// 10 20\n\
/// 20 30\n\
/// 10 10\n";
/// let g = dagred::io::read_snap(Cursor::new(text)).unwrap();
/// assert_eq!(g.node_count(), 3);
/// // the self-loop was skipped, ids compacted in first-seen order
/// assert_eq!(g.edge_count(), 2);
/// assert!(g.contains_edge(0.into(), 1.into()));
/// assert!(g.contains_edge(1.into(), 2.into()));
/// ```
pub fn read_snap<R: BufRead>(reader: R) -> Result<DiGraph, ReadError> {
    let mut g = DiGraph::new();
    let mut compact: IndexMap<u64, NodeIndex> = IndexMap::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some(rest) = comment.trim().strip_prefix("Nodes:") {
                let declared: usize = rest
                    .split_whitespace()
                    .next()
                    .and_then(|token| token.parse().ok())
                    .ok_or_else(|| syntax(line_no, "malformed `Nodes:` header"))?;
                g = DiGraph::with_nodes(declared);
                compact.reserve(declared);
            }
            continue;
        }

        let mut fields = line.split_whitespace();
        let from = parse_endpoint(fields.next(), line_no)?;
        let to = parse_endpoint(fields.next(), line_no)?;
        if from == to {
            continue;
        }
        let a = intern(&mut g, &mut compact, from);
        let b = intern(&mut g, &mut compact, to);
        if !g.contains_edge(a, b) {
            g.add_edge(a, b)?;
        }
    }
    Ok(g)
}

/// Read a graph from a SNAP edge-list file.
pub fn read_snap_file<P: AsRef<Path>>(path: P) -> Result<DiGraph, ReadError> {
    read_snap(BufReader::new(File::open(path)?))
}

fn parse_endpoint(token: Option<&str>, line_no: usize) -> Result<u64, ReadError> {
    token
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| syntax(line_no, "expected `from to`"))
}

/// Map a raw identifier to its compacted index, allocating the next free
/// index (or a fresh node past the declared count) on first sight.
fn intern(g: &mut DiGraph, compact: &mut IndexMap<u64, NodeIndex>, id: u64) -> NodeIndex {
    if let Some(&ix) = compact.get(&id) {
        return ix;
    }
    let next = compact.len();
    let ix = if next < g.node_count() {
        NodeIndex::new(next)
    } else {
        g.add_node()
    };
    compact.insert(id, ix);
    ix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node_index as n;
    use std::io::Cursor;

    #[test]
    fn gra_roundtrip() {
        let text = "paper example\n4\n0: 1 2 #\n1: 3 #\n2: 3 #\n3: #\n";
        let g = read_gra(Cursor::new(text)).unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert!(g.contains_edge(n(0), n(1)));
        assert!(g.contains_edge(n(2), n(3)));
    }

    #[test]
    fn gra_rejects_out_of_range_neighbor() {
        let text = "bad\n2\n0: 5 #\n";
        match read_gra(Cursor::new(text)) {
            Err(ReadError::Syntax { line: 3, .. }) => {}
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn gra_rejects_truncated_input() {
        assert!(matches!(
            read_gra(Cursor::new("only a title\n")),
            Err(ReadError::Syntax { line: 2, .. })
        ));
    }

    #[test]
    fn snap_compacts_sparse_identifiers() {
        let text = "# t\n# t\n# Nodes: 4 Edges: 3\n100 7\n7 100000\n100 100000\n";
        let g = read_snap(Cursor::new(text)).unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 3);
        // 100 -> 0, 7 -> 1, 100000 -> 2
        assert!(g.contains_edge(n(0), n(1)));
        assert!(g.contains_edge(n(1), n(2)));
        assert!(g.contains_edge(n(0), n(2)));
    }

    #[test]
    fn snap_skips_self_loops_and_duplicates() {
        let text = "# Nodes: 2 Edges: 2\n1 1\n1 2\n1 2\n";
        let g = read_snap(Cursor::new(text)).unwrap();
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn snap_grows_past_an_understated_header() {
        let text = "# Nodes: 1 Edges: 2\n1 2\n2 3\n";
        let g = read_snap(Cursor::new(text)).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }
}
