//! word-graph-core: word-adjacency graph engine.
//!
//! A pure Rust library that folds a token stream into a weighted directed
//! graph (edge weight = how often one word immediately follows another) and
//! answers structural queries over it: bridge words, weighted shortest path,
//! PageRank and cycle-terminated random walks.
//!
//! Every query takes `&Graph`; nothing mutates a built graph, so one graph
//! can serve concurrent readers. No file, terminal or UI dependencies: the
//! word-graph-session crate layers loading and background walks on top.

mod bridge;
mod graph;
mod rank;
mod text;
mod traversal;
mod walk;

pub use bridge::{bridge_words, bridged_sentence};
pub use graph::{build_graph, Edge, EdgeRecord, Graph, NodeId};
pub use rank::{pagerank, PageRankConfig, RankVector};
pub use text::{tokenize, tokenize_lines};
pub use traversal::{distances_from, shortest_path, NotFound, Path, PathStep};
pub use walk::{
    random_walk, walk, walk_from, CancelToken, RandomWalk, WalkError, WalkStart, WalkState,
    WalkTrace,
};
