//! PageRank with dangling-node correction.

use std::collections::HashMap;

use crate::graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRankConfig {
    pub damping: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self { damping: 0.85, tolerance: 1e-10, max_iterations: 100 }
    }
}

/// Stationary importance score for every word.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankVector {
    scores: HashMap<String, f64>,
    /// Power iterations actually run.
    pub iterations: usize,
    /// False when `max_iterations` ran out before the tolerance was met.
    pub converged: bool,
}

impl RankVector {
    pub fn get(&self, word: &str) -> Option<f64> {
        self.scores.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(w, &s)| (w.as_str(), s))
    }

    /// Sum of all scores; 1.0 up to rounding for a non-empty graph.
    pub fn total(&self) -> f64 {
        self.scores.values().sum()
    }

    /// Words by descending score. Ties are broken by word, ascending.
    pub fn ranked(&self) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> =
            self.scores.iter().map(|(w, &s)| (w.clone(), s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    pub fn top(&self, n: usize) -> Vec<(String, f64)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    pub fn into_map(self) -> HashMap<String, f64> {
        self.scores
    }
}

/// PageRank by power iteration.
///
/// Each iteration reads only the previous rank vector. The rank held by
/// dangling nodes (out-degree 0) is pooled and spread evenly over all N
/// nodes, so no mass leaks:
///
/// `new[u] = (1 - d) / N + d * (dangling / N + sum(prev[v] / out_degree(v)))`
///
/// summed over predecessors `v` of `u`. Out-degree counts distinct
/// successors; edge weights do not bias the split. Stops once the L1 change
/// drops below `tolerance` or after `max_iterations`, whichever comes first;
/// running out of iterations is not an error.
pub fn pagerank(graph: &Graph, config: PageRankConfig) -> RankVector {
    let n = graph.node_count();
    if n == 0 {
        return RankVector { scores: HashMap::new(), iterations: 0, converged: true };
    }

    let n_f64 = n as f64;
    let mut scores = vec![1.0 / n_f64; n];
    let mut new_scores = vec![0.0; n];
    let out_degrees: Vec<usize> = (0..n).map(|u| graph.out_degree(u as u32)).collect();
    let teleport = (1.0 - config.damping) / n_f64;

    let mut iterations = 0;
    let mut converged = false;
    for _ in 0..config.max_iterations {
        iterations += 1;
        let dangling_sum: f64 = out_degrees
            .iter()
            .enumerate()
            .filter(|(_, &deg)| deg == 0)
            .map(|(u, _)| scores[u])
            .sum();
        let dangling_share = dangling_sum / n_f64;

        for (u, slot) in new_scores.iter_mut().enumerate() {
            let incoming: f64 = graph
                .predecessors(u as u32)
                .iter()
                .map(|e| scores[e.target as usize] / out_degrees[e.target as usize] as f64)
                .sum();
            *slot = teleport + config.damping * (dangling_share + incoming);
        }

        let diff: f64 = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();
        std::mem::swap(&mut scores, &mut new_scores);
        if diff < config.tolerance {
            converged = true;
            break;
        }
    }

    tracing::debug!(iterations, converged, nodes = n, "pagerank finished");

    let scores = graph
        .words()
        .iter()
        .cloned()
        .zip(scores)
        .collect();
    RankVector { scores, iterations, converged }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;

    fn assert_sums_to_one(ranks: &RankVector) {
        let total = ranks.total();
        assert!((total - 1.0).abs() < 1e-6, "sum={total}");
        assert!(ranks.iter().all(|(_, s)| s >= 0.0));
    }

    #[test]
    fn test_empty_graph() {
        let g = build_graph::<&str>(&[]);
        let ranks = pagerank(&g, PageRankConfig::default());
        assert!(ranks.is_empty());
        assert_eq!(ranks.iterations, 0);
    }

    #[test]
    fn test_single_edge_target_outranks_source() {
        let g = build_graph(&["a", "b"]);
        let ranks = pagerank(&g, PageRankConfig::default());
        assert_sums_to_one(&ranks);
        assert!(ranks.get("a").unwrap() < ranks.get("b").unwrap());
    }

    #[test]
    fn test_single_edge_closed_form() {
        // Fixed point: a = 0.075 + 0.425 b with a + b = 1, so a = 0.5 / 1.425
        let g = build_graph(&["a", "b"]);
        let ranks = pagerank(&g, PageRankConfig::default());
        let a = 0.5 / 1.425;
        assert!((ranks.get("a").unwrap() - a).abs() < 1e-8);
        assert!((ranks.get("b").unwrap() - (1.0 - a)).abs() < 1e-8);
        assert!(ranks.converged);
    }

    #[test]
    fn test_isolated_node_is_uniform() {
        let g = build_graph(&["alone"]);
        let ranks = pagerank(&g, PageRankConfig::default());
        assert!((ranks.get("alone").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_dangling_is_uniform() {
        let mut g = Graph::new();
        for word in ["red", "green", "blue"] {
            g.add_node(word);
        }
        assert_eq!(g.edge_count(), 0);

        let ranks = pagerank(&g, PageRankConfig::default());
        assert_eq!(ranks.len(), 3);
        assert_sums_to_one(&ranks);
        for word in ["red", "green", "blue"] {
            assert!((ranks.get(word).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        }
        assert!(ranks.converged);
    }

    #[test]
    fn test_cycle_is_uniform() {
        let g = build_graph(&["a", "b", "c", "a"]);
        let ranks = pagerank(&g, PageRankConfig::default());
        assert_sums_to_one(&ranks);
        for (_, s) in ranks.iter() {
            assert!((s - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sample_graph_sums_to_one() {
        let g = build_graph(&["the", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog"]);
        let ranks = pagerank(&g, PageRankConfig::default());
        assert_eq!(ranks.len(), 8);
        assert_sums_to_one(&ranks);
        // "the" has in-edge from "over" and feeds two branches
        assert!(ranks.get("the").unwrap() > ranks.get("jumps").unwrap());
    }

    #[test]
    fn test_weights_do_not_bias_split() {
        // a -> b three times, a -> c once: b and c still split a's rank evenly
        let g = build_graph(&["a", "b", "a", "b", "a", "b", "a", "c"]);
        let ranks = pagerank(&g, PageRankConfig::default());
        assert_sums_to_one(&ranks);
        let b = ranks.get("b").unwrap();
        let c = ranks.get("c").unwrap();
        assert!((b - c).abs() < 1e-12);
    }

    #[test]
    fn test_iteration_cap_returns_partial() {
        let g = build_graph(&["a", "b", "c", "d"]);
        let config = PageRankConfig { max_iterations: 1, ..PageRankConfig::default() };
        let ranks = pagerank(&g, config);
        assert_eq!(ranks.iterations, 1);
        assert!(!ranks.converged);
        assert_sums_to_one(&ranks);
    }

    #[test]
    fn test_ranked_order() {
        let g = build_graph(&["a", "b"]);
        let ranks = pagerank(&g, PageRankConfig::default());
        let ranked = ranks.ranked();
        assert_eq!(ranked[0].0, "b");
        assert_eq!(ranked[1].0, "a");
        assert_eq!(ranks.top(1).len(), 1);
    }

    #[test]
    fn test_zero_damping_is_uniform() {
        let g = build_graph(&["a", "b", "c"]);
        let config = PageRankConfig { damping: 0.0, ..PageRankConfig::default() };
        let ranks = pagerank(&g, config);
        for (_, s) in ranks.iter() {
            assert!((s - 1.0 / 3.0).abs() < 1e-12);
        }
    }
}
