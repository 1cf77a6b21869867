use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use word_graph_core::{tokenize_lines, Graph};

use crate::error::{Result, SessionError};
use crate::state::{GraphState, Session, Source};

/// Result row of a load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub load_time_ms: f64,
    pub generation: u64,
}

/// Decode UTF-8, skipping invalid sequences instead of replacing them.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

impl Session {
    /// Load a text file, replacing the current graph.
    ///
    /// Bytes that are not valid UTF-8 are dropped rather than rejected, so
    /// the letters on either side of them join into one word. Lines are
    /// tokenized independently and concatenated, so the last word of a line
    /// is adjacent to the first word of the next.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadSummary> {
        let path = path.as_ref();
        let start = Instant::now();

        let metadata = fs::metadata(path).map_err(|e| SessionError::io(path, e))?;
        let limit = self.config.max_file_bytes();
        if metadata.len() > limit {
            return Err(SessionError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit,
            });
        }

        let bytes = fs::read(path).map_err(|e| SessionError::io(path, e))?;
        let text = decode_dropping_invalid(&bytes);
        let graph = Graph::from_tokens(&tokenize_lines(text.lines()));

        let source = Source::File {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
        };
        Ok(self.install(graph, source, start))
    }

    /// Build the graph from in-memory text, replacing the current graph.
    pub fn load_text(&self, text: &str) -> Result<LoadSummary> {
        let start = Instant::now();
        let graph = Graph::from_tokens(&tokenize_lines(text.lines()));
        Ok(self.install(graph, Source::Text, start))
    }

    fn install(&self, graph: Graph, source: Source, start: Instant) -> LoadSummary {
        let load_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        let generation = self.generation.next();
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();

        if graph.is_empty() {
            tracing::warn!(source = %source, "loaded text contains no words");
        }
        tracing::info!(
            source = %source,
            node_count,
            edge_count,
            load_time_ms,
            generation,
            "graph loaded"
        );

        self.publish(GraphState::new(graph, source, load_time_ms, generation));
        LoadSummary { node_count, edge_count, load_time_ms, generation }
    }
}
