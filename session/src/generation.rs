//! Generation-based staleness tracking.
//!
//! Every load takes the next value of a monotonic counter. A graph loaded
//! from a file remembers the file's modification time; query entry points
//! call [`Session::ensure_fresh`], which compares it against the file on disk
//! and reloads inline when the file changed.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::state::{Session, Source};

#[derive(Debug, Default)]
pub(crate) struct Generation(AtomicU64);

impl Generation {
    /// Bump and return the new value. The first load is generation 1.
    pub(crate) fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl Session {
    /// Number of loads performed so far.
    pub fn generation(&self) -> u64 {
        self.generation.current()
    }

    /// True when the loaded graph came from a file that has since changed.
    pub fn is_stale(&self) -> bool {
        let Some(state) = self.peek() else {
            return false;
        };
        match &state.source {
            Source::File { path, modified: Some(loaded) } => {
                modified_time(path).is_some_and(|now| now != *loaded)
            }
            _ => false,
        }
    }

    /// Check if the loaded graph is stale and optionally reload.
    ///
    /// - No graph loaded, or loaded from text → return immediately
    /// - File unreadable → serve the loaded graph
    /// - Fresh (mtime unchanged) → return immediately
    /// - Stale + auto_reload off → serve stale
    /// - Stale + debounce not elapsed → serve stale
    /// - Stale + debounce elapsed → reload inline
    pub fn ensure_fresh(&self) {
        let Some(state) = self.peek() else {
            return;
        };
        let Source::File { path, modified: Some(loaded) } = &state.source else {
            return;
        };

        let Some(current) = modified_time(path) else {
            tracing::warn!(path = %path.display(), "cannot stat source file, skipping staleness check");
            return;
        };
        if current == *loaded {
            return;
        }

        if !self.config.auto_reload {
            return;
        }

        let debounce_secs = self.config.reload_debounce_sec;
        if debounce_secs > 0 {
            let elapsed = state.loaded_at.elapsed().as_secs();
            if elapsed < debounce_secs {
                tracing::debug!(
                    generation = state.loaded_generation,
                    elapsed,
                    debounce_secs,
                    "source file changed, debouncing reload"
                );
                return;
            }
        }

        tracing::info!(
            path = %path.display(),
            generation = state.loaded_generation,
            "auto-reloading changed source file"
        );
        if let Err(e) = self.load_file(path) {
            tracing::warn!(error = %e, "auto-reload failed, serving previously loaded graph");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use std::io::Write;
    use std::time::Duration;

    fn touch_later(path: &Path, contents: &str) {
        let mut file = fs::File::create(path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let later = SystemTime::now() + Duration::from_secs(60);
        file.set_modified(later).unwrap();
    }

    fn session(auto_reload: bool, debounce: u64) -> Session {
        Session::new(SessionConfig {
            auto_reload,
            reload_debounce_sec: debounce,
            ..SessionConfig::default()
        })
    }

    #[test]
    fn test_generation_counter() {
        let gen = Generation::default();
        assert_eq!(gen.current(), 0);
        assert_eq!(gen.next(), 1);
        assert_eq!(gen.next(), 2);
        assert_eq!(gen.current(), 2);
    }

    #[test]
    fn test_reload_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "alpha beta").unwrap();

        let s = session(true, 0);
        s.load_file(&path).unwrap();
        assert!(!s.is_stale());

        touch_later(&path, "alpha beta gamma");
        assert!(s.is_stale());

        let state = s.snapshot().unwrap();
        assert_eq!(state.graph.node_count(), 3);
        assert_eq!(state.loaded_generation, 2);
        assert!(!s.is_stale());
    }

    #[test]
    fn test_no_reload_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "alpha beta").unwrap();

        let s = session(false, 0);
        s.load_file(&path).unwrap();
        touch_later(&path, "alpha beta gamma");

        let state = s.snapshot().unwrap();
        assert_eq!(state.graph.node_count(), 2);
        assert!(s.is_stale());
        assert_eq!(s.generation(), 1);
    }

    #[test]
    fn test_debounce_serves_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "alpha beta").unwrap();

        let s = session(true, 3600);
        s.load_file(&path).unwrap();
        touch_later(&path, "alpha beta gamma");

        assert_eq!(s.snapshot().unwrap().graph.node_count(), 2);
        assert_eq!(s.generation(), 1);
    }

    #[test]
    fn test_deleted_file_keeps_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "alpha beta").unwrap();

        let s = session(true, 0);
        s.load_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(s.snapshot().unwrap().graph.node_count(), 2);
        assert!(!s.is_stale());
    }

    #[test]
    fn test_text_source_never_stale() {
        let s = session(true, 0);
        s.load_text("one two").unwrap();
        assert!(!s.is_stale());
        s.ensure_fresh();
        assert_eq!(s.generation(), 1);
    }
}
