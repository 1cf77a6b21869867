use std::cmp::Reverse;
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::graph::{Graph, NodeId};

/// A single step in a weighted path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStep {
    pub word: String,
    /// Weight of the edge used to reach this word. None for the start word.
    pub weight: Option<u32>,
}

/// Minimum-cost directed path, endpoints included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub steps: Vec<PathStep>,
    /// Sum of the traversed edge weights.
    pub cost: u64,
}

impl Path {
    pub fn words(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.word.as_str()).collect()
    }

    /// Consecutive word pairs along the path (the edges to highlight).
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.steps
            .windows(2)
            .map(|w| (w[0].word.as_str(), w[1].word.as_str()))
            .collect()
    }

    pub fn hops(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Why a shortest path query produced no path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("word '{word}' is not in the graph")]
    UnknownNode { word: String },
    #[error("no path from '{from}' to '{to}'")]
    NoPath { from: String, to: String },
}

fn resolve(graph: &Graph, word: &str) -> Result<NodeId, NotFound> {
    graph.node_id(word).ok_or_else(|| NotFound::UnknownNode {
        word: word.to_string(),
    })
}

/// Dijkstra over edge weights from `start`, stopping early once `target`
/// is settled. Returns per-node (cost, parent); unreached nodes have None.
///
/// The heap is keyed by (cost, NodeId) so equal-cost candidates settle in id
/// order and the chosen path is stable for a given graph.
fn dijkstra(graph: &Graph, start: NodeId, target: Option<NodeId>) -> Vec<Option<(u64, NodeId)>> {
    let mut best: Vec<Option<(u64, NodeId)>> = vec![None; graph.node_count()];
    let mut settled = vec![false; graph.node_count()];
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();

    // Sentinel: start node's parent is itself
    best[start as usize] = Some((0, start));
    heap.push(Reverse((0, start)));

    while let Some(Reverse((cost, current))) = heap.pop() {
        if settled[current as usize] {
            continue;
        }
        settled[current as usize] = true;
        if Some(current) == target {
            break;
        }

        for edge in graph.successors(current) {
            let next = edge.target as usize;
            if settled[next] {
                continue;
            }
            let candidate = cost + edge.weight as u64;
            let improves = match best[next] {
                None => true,
                Some((known, _)) => candidate < known,
            };
            if improves {
                best[next] = Some((candidate, current));
                heap.push(Reverse((candidate, edge.target)));
            }
        }
    }

    best
}

/// Walk parent pointers from `target` back to `start`.
fn reconstruct_path(
    graph: &Graph,
    best: &[Option<(u64, NodeId)>],
    start: NodeId,
    target: NodeId,
) -> Path {
    let mut ids = vec![target];
    let mut current = target;
    while current != start {
        match best[current as usize] {
            Some((_, parent)) => current = parent,
            None => break,
        }
        ids.push(current);
    }
    ids.reverse();

    let steps = ids
        .iter()
        .enumerate()
        .map(|(i, &id)| PathStep {
            word: graph.word(id).to_string(),
            weight: if i == 0 {
                None
            } else {
                graph.edge_weight(ids[i - 1], id)
            },
        })
        .collect();

    Path {
        steps,
        cost: best[target as usize].map(|(c, _)| c).unwrap_or(0),
    }
}

/// Minimum total-weight directed path from `w1` to `w2`.
///
/// `w1 == w2` yields the single-word path with cost 0, no self-loop needed.
/// Unknown words and unreachable targets are reported as distinct
/// [`NotFound`] variants. When several paths share the minimum cost the one
/// returned is fixed for a given graph; compare costs, not paths.
pub fn shortest_path(graph: &Graph, w1: &str, w2: &str) -> Result<Path, NotFound> {
    let start = resolve(graph, w1)?;
    let target = resolve(graph, w2)?;

    if start == target {
        return Ok(Path {
            steps: vec![PathStep {
                word: graph.word(start).to_string(),
                weight: None,
            }],
            cost: 0,
        });
    }

    let best = dijkstra(graph, start, Some(target));
    if best[target as usize].is_none() {
        return Err(NotFound::NoPath {
            from: w1.to_string(),
            to: w2.to_string(),
        });
    }

    Ok(reconstruct_path(graph, &best, start, target))
}

/// Minimum cost from `word` to every word it can reach (itself included,
/// at cost 0), sorted by cost then word.
pub fn distances_from(graph: &Graph, word: &str) -> Result<Vec<(String, u64)>, NotFound> {
    let start = resolve(graph, word)?;
    let best = dijkstra(graph, start, None);

    let mut out: Vec<(String, u64)> = best
        .iter()
        .enumerate()
        .filter_map(|(id, slot)| slot.map(|(cost, _)| (graph.word(id as NodeId).to_string(), cost)))
        .collect();
    out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    Ok(out)
}
