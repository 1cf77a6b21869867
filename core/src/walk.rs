//! Random walk that stops at a dead end or on the first repeated edge.
//!
//! The walk is an explicit state machine ([`RandomWalk`]) advanced one step
//! at a time, so a driver on another thread can check a [`CancelToken`]
//! between steps and forward each recorded word as it happens.

use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use crate::graph::{Graph, NodeId};

/// Cooperative stop signal shared between a walk and its controller.
///
/// A [`child`](CancelToken::child) token also reads as cancelled once its
/// parent is, but cancelling the child leaves the parent untouched.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    parent: Option<Arc<AtomicBool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> CancelToken {
        CancelToken {
            cancelled: Arc::new(AtomicBool::new(false)),
            parent: Some(Arc::clone(&self.cancelled)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.load(Ordering::Relaxed))
    }
}

/// Walk state. Every state except `Running` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WalkState {
    Running,
    /// The current word has no outgoing edges.
    DeadEnd,
    /// The sampled edge was already traversed in this walk.
    CycleDetected,
    /// The cancel token was set before a step.
    Cancelled,
}

impl WalkState {
    pub fn is_terminal(self) -> bool {
        self != WalkState::Running
    }
}

impl fmt::Display for WalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WalkState::Running => "running",
            WalkState::DeadEnd => "dead end",
            WalkState::CycleDetected => "cycle detected",
            WalkState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Where a walk begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStart<'a> {
    /// Uniformly random node.
    Random,
    Word(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    #[error("start word '{word}' is not in the graph")]
    UnknownStart { word: String },

    #[error("start node {id} is out of range for a graph of {node_count} nodes")]
    StartOutOfRange { id: NodeId, node_count: usize },
}

/// Words visited by a finished walk, in visit order, and why it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkTrace {
    pub words: Vec<String>,
    pub outcome: WalkState,
}

impl WalkTrace {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Traversed edges in order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.words
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
            .collect()
    }

    /// Write the trace as one word per line, each `\n` terminated.
    pub fn write_lines<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for word in &self.words {
            writeln!(writer, "{}", word)?;
        }
        writer.flush()
    }
}

/// Step-at-a-time random walk over a borrowed graph.
pub struct RandomWalk<'g> {
    graph: &'g Graph,
    current: NodeId,
    trace: Vec<NodeId>,
    used: HashSet<(NodeId, NodeId)>,
    state: WalkState,
}

impl<'g> RandomWalk<'g> {
    /// Begin a walk at `start`, which is recorded as the first trace entry.
    pub fn new(graph: &'g Graph, start: NodeId) -> Result<Self, WalkError> {
        if start as usize >= graph.node_count() {
            return Err(WalkError::StartOutOfRange {
                id: start,
                node_count: graph.node_count(),
            });
        }
        Ok(Self {
            graph,
            current: start,
            trace: vec![start],
            used: HashSet::new(),
            state: WalkState::Running,
        })
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Word the walk currently stands on (the last recorded word).
    pub fn current(&self) -> &'g str {
        self.graph.word(self.current)
    }

    pub fn visited(&self) -> usize {
        self.trace.len()
    }

    /// Advance by one edge.
    ///
    /// Checks `cancel` first, then the dead-end condition, then samples a
    /// successor uniformly. A repeated edge ends the walk without being
    /// recorded. Returns the state after the step; calling again after a
    /// terminal state is a no-op.
    pub fn step<R: Rng>(&mut self, rng: &mut R, cancel: &CancelToken) -> WalkState {
        if self.state.is_terminal() {
            return self.state;
        }
        if cancel.is_cancelled() {
            self.state = WalkState::Cancelled;
            return self.state;
        }

        let successors = self.graph.successors(self.current);
        if successors.is_empty() {
            self.state = WalkState::DeadEnd;
            return self.state;
        }

        let next = successors[rng.random_range(0..successors.len())].target;
        if !self.used.insert((self.current, next)) {
            self.state = WalkState::CycleDetected;
            return self.state;
        }

        self.current = next;
        self.trace.push(next);
        self.state
    }

    pub fn into_trace(self) -> WalkTrace {
        WalkTrace {
            words: self
                .trace
                .iter()
                .map(|&id| self.graph.word(id).to_string())
                .collect(),
            outcome: self.state,
        }
    }
}

/// Run a walk to completion.
///
/// `sink` receives every recorded word as soon as it is recorded, start word
/// included, so a consumer can stream progress. On an empty graph the trace
/// is empty with outcome `DeadEnd`.
pub fn walk<R, F>(
    graph: &Graph,
    start: WalkStart<'_>,
    rng: &mut R,
    cancel: &CancelToken,
    mut sink: F,
) -> Result<WalkTrace, WalkError>
where
    R: Rng,
    F: FnMut(&str),
{
    let start_id = match start {
        WalkStart::Word(word) => graph.node_id(word).ok_or_else(|| WalkError::UnknownStart {
            word: word.to_string(),
        })?,
        WalkStart::Random if graph.is_empty() => {
            return Ok(WalkTrace { words: Vec::new(), outcome: WalkState::DeadEnd });
        }
        WalkStart::Random => rng.random_range(0..graph.node_count()) as NodeId,
    };

    let mut walker = RandomWalk::new(graph, start_id)?;
    sink(walker.current());
    while walker.step(rng, cancel) == WalkState::Running {
        sink(walker.current());
    }

    tracing::debug!(
        start = graph.word(start_id),
        visited = walker.visited(),
        outcome = %walker.state(),
        "random walk finished"
    );
    Ok(walker.into_trace())
}

/// Walk from a uniformly random start word.
pub fn random_walk<R, F>(graph: &Graph, rng: &mut R, cancel: &CancelToken, sink: F) -> WalkTrace
where
    R: Rng,
    F: FnMut(&str),
{
    match walk(graph, WalkStart::Random, rng, cancel, sink) {
        Ok(trace) => trace,
        // A random start is always drawn from the graph itself
        Err(_) => WalkTrace { words: Vec::new(), outcome: WalkState::DeadEnd },
    }
}

/// Walk from a given start word.
pub fn walk_from<R, F>(
    graph: &Graph,
    start: &str,
    rng: &mut R,
    cancel: &CancelToken,
    sink: F,
) -> Result<WalkTrace, WalkError>
where
    R: Rng,
    F: FnMut(&str),
{
    walk(graph, WalkStart::Word(start), rng, cancel, sink)
}
