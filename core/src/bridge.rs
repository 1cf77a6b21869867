use std::collections::BTreeSet;

use rand::Rng;

use crate::graph::{Graph, NodeId};

/// Ids of every node `m` with edges `from -> m` and `m -> to`, in the order
/// `m` appears in `from`'s successor list.
fn bridge_ids(graph: &Graph, from: NodeId, to: NodeId) -> Vec<NodeId> {
    graph
        .successors(from)
        .iter()
        .map(|e| e.target)
        .filter(|&mid| graph.has_edge(mid, to))
        .collect()
}

/// Bridge words between `w1` and `w2`: every word `m` such that the graph
/// holds both `w1 -> m` and `m -> w2`.
///
/// Returns an empty set when either word is not a node. Self-bridges
/// (`m == w1` or `m == w2`) are included whenever the two edges exist.
pub fn bridge_words(graph: &Graph, w1: &str, w2: &str) -> BTreeSet<String> {
    let (Some(from), Some(to)) = (graph.node_id(w1), graph.node_id(w2)) else {
        return BTreeSet::new();
    };
    bridge_ids(graph, from, to)
        .into_iter()
        .map(|id| graph.word(id).to_string())
        .collect()
}

/// Rewrite a token sequence by inserting one bridge word between each
/// adjacent pair that has any.
///
/// For each pair `(a, b)` the output gets `a`, then a bridge word chosen
/// uniformly at random if `bridge_words(a, b)` is non-empty; the last token
/// closes the sequence. Sequences shorter than two tokens come back as-is.
pub fn bridged_sentence<S, R>(graph: &Graph, tokens: &[S], rng: &mut R) -> Vec<String>
where
    S: AsRef<str>,
    R: Rng,
{
    if tokens.len() < 2 {
        return tokens.iter().map(|t| t.as_ref().to_string()).collect();
    }

    let mut out = Vec::with_capacity(tokens.len() * 2 - 1);
    for pair in tokens.windows(2) {
        let (a, b) = (pair[0].as_ref(), pair[1].as_ref());
        out.push(a.to_string());
        if let (Some(from), Some(to)) = (graph.node_id(a), graph.node_id(b)) {
            let mids = bridge_ids(graph, from, to);
            if !mids.is_empty() {
                let pick = mids[rng.random_range(0..mids.len())];
                out.push(graph.word(pick).to_string());
            }
        }
    }
    if let Some(last) = tokens.last() {
        out.push(last.as_ref().to_string());
    }
    out
}
