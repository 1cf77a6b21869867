//! word-graph-session: a loaded word graph behind a thread-safe handle.
//!
//! Wraps word-graph-core with what an interactive front end needs: text
//! file loading with size limits, atomically published snapshots, layered
//! configuration, mtime-based auto-reload, and random walks on a worker
//! thread that stream their trace.

mod bridge;
mod config;
mod error;
mod generation;
mod load;
mod path;
mod rank;
mod state;
mod status;
mod util;
mod walk;

pub use config::{SessionConfig, ENV_PREFIX};
pub use error::{Result, SessionError};
pub use load::LoadSummary;
pub use path::PathReport;
pub use rank::RankRow;
pub use state::{GraphState, Session, Source};
pub use status::{LoadState, Status};
pub use util::normalize_word;
pub use walk::{WalkEvent, WalkHandle, WalkOptions, WalkReport};

pub use word_graph_core::{CancelToken, WalkState, WalkTrace};
