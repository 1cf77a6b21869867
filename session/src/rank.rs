use serde::Serialize;

use crate::error::Result;
use crate::state::Session;

/// One row of the PageRank table. `position` starts at 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankRow {
    pub position: usize,
    pub word: String,
    pub score: f64,
}

impl Session {
    /// PageRank of every word, highest first, ties by word.
    pub fn pagerank(&self) -> Result<Vec<RankRow>> {
        self.pagerank_top(usize::MAX)
    }

    /// The `n` highest-ranked words.
    pub fn pagerank_top(&self, n: usize) -> Result<Vec<RankRow>> {
        let state = self.snapshot()?;
        let ranks = state.ranks(&self.config);
        if !ranks.converged {
            tracing::warn!(
                iterations = ranks.iterations,
                "pagerank hit max_iterations before converging"
            );
        }

        Ok(ranks
            .top(n)
            .into_iter()
            .enumerate()
            .map(|(i, (word, score))| RankRow { position: i + 1, word, score })
            .collect())
    }

    /// Score of a single word, `None` if it is not in the graph.
    pub fn rank_of(&self, word: &str) -> Result<Option<f64>> {
        let word = crate::util::normalize_word(word)?;
        let state = self.snapshot()?;
        Ok(state.ranks(&self.config).get(&word))
    }
}
