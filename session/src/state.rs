use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Instant, SystemTime};

use word_graph_core::{Graph, RankVector};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::generation::Generation;

/// Where the loaded graph came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File {
        path: PathBuf,
        /// Modification time observed at load. `None` if the platform
        /// does not report one, which disables auto-reload.
        modified: Option<SystemTime>,
    },
    Text,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File { path, .. } => write!(f, "{}", path.display()),
            Source::Text => f.write_str("<text>"),
        }
    }
}

/// One published graph plus metadata about its load.
///
/// Immutable once published; queries hold an `Arc` to it, so a reload
/// never pulls the graph out from under a running walk.
pub struct GraphState {
    pub graph: Graph,
    pub source: Source,
    pub load_time_ms: f64,
    pub loaded_at: Instant,
    /// Generation counter value assigned to this load.
    pub loaded_generation: u64,
    ranks: OnceLock<RankVector>,
}

impl GraphState {
    pub fn new(graph: Graph, source: Source, load_time_ms: f64, loaded_generation: u64) -> Self {
        Self {
            graph,
            source,
            load_time_ms,
            loaded_at: Instant::now(),
            loaded_generation,
            ranks: OnceLock::new(),
        }
    }

    /// PageRank for this snapshot, computed on first use.
    pub fn ranks(&self, config: &SessionConfig) -> &RankVector {
        self.ranks
            .get_or_init(|| word_graph_core::pagerank(&self.graph, config.pagerank()))
    }
}

/// A loaded word graph and the settings that govern queries over it.
///
/// `Session` is `Sync`: share it behind an `Arc` and query from any thread.
/// Loads replace the published snapshot atomically.
pub struct Session {
    pub(crate) config: SessionConfig,
    current: RwLock<Option<Arc<GraphState>>>,
    pub(crate) generation: Generation,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            current: RwLock::new(None),
            generation: Generation::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.peek().is_some()
    }

    /// The published snapshot, without a staleness check.
    pub fn peek(&self) -> Option<Arc<GraphState>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The snapshot a query should run against: reloads first if the
    /// backing file changed, then fails with `NotLoaded` if nothing is loaded.
    pub fn snapshot(&self) -> Result<Arc<GraphState>> {
        self.ensure_fresh();
        self.peek().ok_or(SessionError::NotLoaded)
    }

    /// Execute a closure against the current graph.
    pub fn with_graph<R, F: FnOnce(&GraphState) -> R>(&self, f: F) -> Result<R> {
        let state = self.snapshot()?;
        Ok(f(&state))
    }

    pub(crate) fn publish(&self, state: GraphState) -> Arc<GraphState> {
        let state = Arc::new(state);
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Arc::clone(&state));
        state
    }

    /// Drop the loaded graph. Snapshots already handed out stay valid.
    pub fn unload(&self) {
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session() {
        let session = Session::default();
        assert!(!session.is_loaded());
        assert!(matches!(session.snapshot(), Err(SessionError::NotLoaded)));
        assert!(session.with_graph(|gs| gs.graph.node_count()).is_err());
    }

    #[test]
    fn test_publish_and_unload() {
        let session = Session::default();
        let state = session.publish(GraphState::new(
            Graph::from_text("a b"),
            Source::Text,
            0.0,
            1,
        ));
        assert_eq!(session.with_graph(|gs| gs.graph.node_count()).unwrap(), 2);

        session.unload();
        assert!(!session.is_loaded());
        // Handed-out snapshot survives
        assert_eq!(state.graph.edge_count(), 1);
    }

    #[test]
    fn test_ranks_cached_per_snapshot() {
        let state = GraphState::new(Graph::from_text("a b c a"), Source::Text, 0.0, 1);
        let config = SessionConfig::default();
        let first = state.ranks(&config) as *const RankVector;
        let second = state.ranks(&config) as *const RankVector;
        assert_eq!(first, second);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Text.to_string(), "<text>");
        let file = Source::File { path: PathBuf::from("/tmp/in.txt"), modified: None };
        assert_eq!(file.to_string(), "/tmp/in.txt");
    }
}
