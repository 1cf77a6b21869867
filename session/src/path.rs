use serde::Serialize;

use crate::error::Result;
use crate::state::Session;
use crate::util::normalize_word;

/// Shortest path in display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub words: Vec<String>,
    pub cost: u64,
    /// Consecutive `(from, to)` pairs along the path, for highlighting.
    pub edges: Vec<(String, String)>,
}

impl PathReport {
    /// Words joined with arrows: `quick -> brown -> fox`.
    pub fn arrow_form(&self) -> String {
        self.words.join(" -> ")
    }
}

impl Session {
    pub fn shortest_path(&self, w1: &str, w2: &str) -> Result<PathReport> {
        let (w1, w2) = (normalize_word(w1)?, normalize_word(w2)?);
        let state = self.snapshot()?;
        let path = word_graph_core::shortest_path(&state.graph, &w1, &w2)?;

        Ok(PathReport {
            words: path.words().into_iter().map(str::to_string).collect(),
            cost: path.cost,
            edges: path
                .edges()
                .into_iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        })
    }

    /// Cost from `word` to every reachable word, cheapest first.
    pub fn distances_from(&self, word: &str) -> Result<Vec<(String, u64)>> {
        let word = normalize_word(word)?;
        let state = self.snapshot()?;
        Ok(word_graph_core::distances_from(&state.graph, &word)?)
    }
}
