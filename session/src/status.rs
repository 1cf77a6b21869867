use std::fmt;

use serde::Serialize;

use crate::state::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loaded,
    /// The source file changed after the graph was loaded.
    Stale,
    NotLoaded,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadState::Loaded => "loaded",
            LoadState::Stale => "stale",
            LoadState::NotLoaded => "not_loaded",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub state: LoadState,
    pub source: Option<String>,
    pub node_count: usize,
    pub edge_count: usize,
    pub memory_bytes: usize,
    pub loaded_generation: u64,
    pub current_generation: u64,
    pub load_time_ms: f64,
}

impl Status {
    /// One-line summary for a status bar.
    pub fn summary(&self) -> String {
        match self.state {
            LoadState::NotLoaded => "no graph loaded".to_string(),
            state => format!(
                "{} nodes, {} edges ({})",
                self.node_count, self.edge_count, state
            ),
        }
    }
}

impl Session {
    /// Describe the loaded graph. Never reloads.
    pub fn status(&self) -> Status {
        let current_generation = self.generation();
        match self.peek() {
            Some(gs) => Status {
                state: if self.is_stale() { LoadState::Stale } else { LoadState::Loaded },
                source: Some(gs.source.to_string()),
                node_count: gs.graph.node_count(),
                edge_count: gs.graph.edge_count(),
                memory_bytes: gs.graph.memory_usage(),
                loaded_generation: gs.loaded_generation,
                current_generation,
                load_time_ms: gs.load_time_ms,
            },
            None => Status {
                state: LoadState::NotLoaded,
                source: None,
                node_count: 0,
                edge_count: 0,
                memory_bytes: 0,
                loaded_generation: 0,
                current_generation,
                load_time_ms: 0.0,
            },
        }
    }
}
