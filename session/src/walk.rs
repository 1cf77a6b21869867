//! Random walks on a worker thread.
//!
//! The walk runs against the snapshot that was current when it was spawned.
//! Each recorded word goes out on a channel as it happens and, when a trace
//! path is given, is appended to that file one word per line. The caller
//! keeps a [`WalkHandle`] to watch progress, cancel, and collect the result.

use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use word_graph_core::{CancelToken, WalkError, WalkStart, WalkState, WalkTrace};

use crate::error::{Result, SessionError};
use crate::state::{GraphState, Session};
use crate::util::normalize_word;

#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Start word; `None` picks a uniformly random node.
    pub start: Option<String>,
    /// Write the trace here, one word per line, as the walk progresses.
    pub trace_path: Option<PathBuf>,
    /// Use this token instead of a fresh one, e.g. to share it with a UI.
    pub token: Option<CancelToken>,
    /// Overrides the configured `walk_seed`.
    pub seed: Option<u64>,
}

/// Progress reported by a running walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WalkEvent {
    /// A word was recorded. `index` counts from 0 (the start word).
    Visited { index: usize, word: String },
    /// Always the last event.
    Finished { outcome: WalkState, visited: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkReport {
    pub trace: WalkTrace,
    /// Generation of the snapshot the walk ran against.
    pub generation: u64,
    pub trace_path: Option<PathBuf>,
}

pub struct WalkHandle {
    cancel: CancelToken,
    events: Receiver<WalkEvent>,
    worker: JoinHandle<Result<WalkReport>>,
}

impl WalkHandle {
    /// Ask the walk to stop before its next step.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Progress events. The channel closes when the worker exits.
    pub fn events(&self) -> &Receiver<WalkEvent> {
        &self.events
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the walk to finish.
    pub fn join(self) -> Result<WalkReport> {
        self.worker.join().map_err(|_| SessionError::WorkerPanicked)?
    }
}

struct Worker {
    state: Arc<GraphState>,
    start: Option<String>,
    trace: Option<(PathBuf, LineWriter<File>)>,
    cancel: CancelToken,
    events: Sender<WalkEvent>,
    rng: ChaCha8Rng,
    step_delay: Duration,
}

impl Worker {
    fn run(mut self) -> Result<WalkReport> {
        let mut index = 0;
        let mut write_error = None;
        // A failed trace write stops this walk only, not other holders of
        // the caller's token
        let stop = self.cancel.child();
        let (events, step_delay) = (&self.events, self.step_delay);
        let mut writer = self.trace.as_mut().map(|(_, w)| w);

        let start = match &self.start {
            Some(word) => WalkStart::Word(word.as_str()),
            None => WalkStart::Random,
        };

        let trace = word_graph_core::walk(&self.state.graph, start, &mut self.rng, &stop, |word| {
            if let Some(writer) = writer.as_deref_mut() {
                if write_error.is_none() {
                    if let Err(e) = writeln!(writer, "{}", word) {
                        write_error = Some(e);
                        stop.cancel();
                    }
                }
            }
            // Receiver may be gone; the walk still completes
            let _ = events.send(WalkEvent::Visited { index, word: word.to_string() });
            index += 1;
            if !step_delay.is_zero() {
                thread::sleep(step_delay);
            }
        })?;

        let _ = self.events.send(WalkEvent::Finished { outcome: trace.outcome, visited: trace.len() });

        let trace_path = match self.trace {
            Some((path, mut writer)) => {
                if let Some(e) = write_error {
                    return Err(SessionError::io(path, e));
                }
                writer.flush().map_err(|e| SessionError::io(&path, e))?;
                Some(path)
            }
            None => None,
        };

        tracing::info!(
            visited = trace.len(),
            outcome = %trace.outcome,
            generation = self.state.loaded_generation,
            "random walk finished"
        );
        Ok(WalkReport {
            trace,
            generation: self.state.loaded_generation,
            trace_path,
        })
    }
}

impl Session {
    /// Start a random walk on a worker thread.
    ///
    /// Fails immediately, without spawning, if no graph is loaded, the start
    /// word is unknown, or the trace file cannot be created.
    pub fn spawn_walk(&self, options: WalkOptions) -> Result<WalkHandle> {
        let state = self.snapshot()?;

        let start = match options.start.as_deref() {
            Some(raw) => {
                let word = normalize_word(raw)?;
                if !state.graph.contains(&word) {
                    return Err(WalkError::UnknownStart { word }.into());
                }
                Some(word)
            }
            None => None,
        };

        let trace = match options.trace_path {
            Some(path) => {
                let file = File::create(&path).map_err(|e| SessionError::io(&path, e))?;
                Some((path, LineWriter::new(file)))
            }
            None => None,
        };

        let rng = match options.seed.or(self.config.walk_seed) {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        let cancel = options.token.unwrap_or_default();
        let (tx, rx) = mpsc::channel();
        let worker = Worker {
            state,
            start,
            trace,
            cancel: cancel.clone(),
            events: tx,
            rng,
            step_delay: Duration::from_millis(self.config.walk_step_delay_ms),
        };

        tracing::debug!(start = ?worker.start, "spawning random walk");
        let worker = thread::Builder::new()
            .name("word-graph-walk".to_string())
            .spawn(move || worker.run())
            .map_err(SessionError::Spawn)?;

        Ok(WalkHandle { cancel, events: rx, worker })
    }

    /// Run a walk on a worker thread and wait for it.
    pub fn walk(&self, options: WalkOptions) -> Result<WalkReport> {
        self.spawn_walk(options)?.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use std::collections::HashSet;
    use std::fs;

    fn seeded() -> Session {
        Session::new(SessionConfig { walk_seed: Some(5), ..SessionConfig::default() })
    }

    #[test]
    fn test_walk_chain_to_dead_end() {
        let session = seeded();
        session.load_text("one two three four").unwrap();

        let report = session
            .walk(WalkOptions { start: Some("One".into()), ..WalkOptions::default() })
            .unwrap();
        assert_eq!(report.trace.words, vec!["one", "two", "three", "four"]);
        assert_eq!(report.trace.outcome, WalkState::DeadEnd);
        assert_eq!(report.generation, 1);
        assert_eq!(report.trace_path, None);
    }

    #[test]
    fn test_events_match_trace() {
        let session = seeded();
        session
            .load_text("the quick brown fox jumps over the lazy dog the end")
            .unwrap();

        let handle = session.spawn_walk(WalkOptions::default()).unwrap();
        let events: Vec<WalkEvent> = handle.events().iter().collect();
        let report = handle.join().unwrap();

        let visited: Vec<String> = events
            .iter()
            .filter_map(|e| match e {
                WalkEvent::Visited { word, .. } => Some(word.clone()),
                WalkEvent::Finished { .. } => None,
            })
            .collect();
        assert_eq!(visited, report.trace.words);
        assert_eq!(
            events.last(),
            Some(&WalkEvent::Finished {
                outcome: report.trace.outcome,
                visited: report.trace.len(),
            })
        );
        for (i, event) in events.iter().take(visited.len()).enumerate() {
            assert!(matches!(event, WalkEvent::Visited { index, .. } if *index == i));
        }
    }

    #[test]
    fn test_trace_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.txt");

        let session = seeded();
        session.load_text("a b a").unwrap();
        let report = session
            .walk(WalkOptions {
                start: Some("a".into()),
                trace_path: Some(path.clone()),
                ..WalkOptions::default()
            })
            .unwrap();

        assert_eq!(report.trace.words, vec!["a", "b", "a"]);
        assert_eq!(report.trace.outcome, WalkState::CycleDetected);
        assert_eq!(report.trace_path.as_deref(), Some(path.as_path()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\na\n");
    }

    #[test]
    fn test_pre_cancelled_token() {
        let session = seeded();
        session.load_text("a b c d e").unwrap();

        let token = CancelToken::new();
        token.cancel();
        let report = session
            .walk(WalkOptions {
                start: Some("a".into()),
                token: Some(token),
                ..WalkOptions::default()
            })
            .unwrap();
        assert_eq!(report.trace.words, vec!["a"]);
        assert_eq!(report.trace.outcome, WalkState::Cancelled);
    }

    #[test]
    fn test_cancel_while_running() {
        let session = Session::new(SessionConfig {
            walk_seed: Some(1),
            walk_step_delay_ms: 20,
            ..SessionConfig::default()
        });
        let text: Vec<String> = (0..500).map(|i| format!("w{}", letters(i))).collect();
        session.load_text(&text.join(" ")).unwrap();

        let handle = session
            .spawn_walk(WalkOptions { start: Some(format!("w{}", letters(0))), ..WalkOptions::default() })
            .unwrap();
        // Wait for the first word, then stop
        assert!(matches!(handle.events().recv().unwrap(), WalkEvent::Visited { index: 0, .. }));
        handle.cancel();

        let report = handle.join().unwrap();
        assert_eq!(report.trace.outcome, WalkState::Cancelled);
        assert!(report.trace.len() < 500);
    }

    // Digits are separators, so spell numbers in letters.
    fn letters(mut n: usize) -> String {
        let mut s = String::new();
        loop {
            s.push((b'a' + (n % 26) as u8) as char);
            n /= 26;
            if n == 0 {
                return s;
            }
        }
    }

    #[test]
    fn test_seeded_walks_repeat() {
        let session = seeded();
        session
            .load_text("a b c a c b a d b d c d a")
            .unwrap();
        let first = session.walk(WalkOptions::default()).unwrap();
        let second = session.walk(WalkOptions::default()).unwrap();
        assert_eq!(first.trace, second.trace);

        let mut seen = HashSet::new();
        for edge in first.trace.edges() {
            assert!(seen.insert(edge));
        }
    }

    #[test]
    fn test_walk_errors() {
        let session = seeded();
        assert!(matches!(
            session.spawn_walk(WalkOptions::default()),
            Err(SessionError::NotLoaded)
        ));

        session.load_text("a b").unwrap();
        let err = session
            .spawn_walk(WalkOptions { start: Some("zebra".into()), ..WalkOptions::default() })
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Walk(WalkError::UnknownStart { .. })));

        let err = session
            .spawn_walk(WalkOptions {
                trace_path: Some(PathBuf::from("/nonexistent/dir/walk.txt")),
                ..WalkOptions::default()
            })
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Io { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_trace_write_failure_keeps_shared_token() {
        let session = seeded();
        session.load_text("a b c d e f").unwrap();

        // Every write to /dev/full fails with ENOSPC
        let token = CancelToken::new();
        let err = session
            .walk(WalkOptions {
                start: Some("a".into()),
                trace_path: Some(PathBuf::from("/dev/full")),
                token: Some(token.clone()),
                ..WalkOptions::default()
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::Io { ref path, .. } if path == &PathBuf::from("/dev/full")));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_spawn_error_names_no_path() {
        let err = SessionError::Spawn(std::io::Error::other("thread limit reached"));
        assert_eq!(err.to_string(), "cannot start random walk worker: thread limit reached");
    }

    #[test]
    fn test_walk_survives_reload() {
        let session = seeded();
        session.load_text("a b c").unwrap();
        let handle = session
            .spawn_walk(WalkOptions { start: Some("a".into()), ..WalkOptions::default() })
            .unwrap();
        session.load_text("x y").unwrap();

        let report = handle.join().unwrap();
        assert_eq!(report.generation, 1);
        assert_eq!(report.trace.words, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_graph_walk() {
        let session = seeded();
        session.load_text("").unwrap();
        let report = session.walk(WalkOptions::default()).unwrap();
        assert!(report.trace.is_empty());
        assert_eq!(report.trace.outcome, WalkState::DeadEnd);
    }
}
