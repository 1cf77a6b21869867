use std::collections::HashMap;

use crate::text::tokenize;

/// Interned node identifier. Assigned in first-appearance order.
pub type NodeId = u32;

/// A weighted directed edge in an adjacency list.
///
/// In `outgoing[a]`, `target` is the successor of `a`. In `incoming[b]`,
/// `target` is the predecessor of `b`. `weight` is the number of times the
/// source word was immediately followed by the target word, always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: NodeId,
    pub weight: u32,
}

/// A fully resolved edge, returned by [`Graph::edges`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub weight: u32,
}

/// In-memory word-adjacency graph.
///
/// Edges are stored in both directions: `outgoing[a]` lists edges leaving
/// `a` and `incoming[b]` lists edges entering `b`, both in insertion order.
/// Node words are interned once; `index` gives O(1) membership checks and
/// `slots` maps an ordered pair to its position in both lists so repeated
/// pairs bump the existing weight instead of adding a parallel edge.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    words: Vec<String>,
    index: HashMap<String, NodeId>,
    outgoing: Vec<Vec<Edge>>,
    incoming: Vec<Vec<Edge>>,
    slots: HashMap<(NodeId, NodeId), (usize, usize)>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known vocabulary size.
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            words: Vec::with_capacity(node_count),
            index: HashMap::with_capacity(node_count),
            outgoing: Vec::with_capacity(node_count),
            incoming: Vec::with_capacity(node_count),
            slots: HashMap::with_capacity(edge_count),
        }
    }

    /// Build a graph from a token stream.
    ///
    /// Every adjacent pair `(tokens[i], tokens[i + 1])` where both sides are
    /// non-empty adds one to the weight of that edge. A single token yields a
    /// single isolated node; no tokens yield an empty graph.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut graph = Self::with_capacity(tokens.len() / 2, tokens.len());
        if let [only] = tokens {
            if !only.as_ref().is_empty() {
                graph.add_node(only.as_ref());
            }
            return graph;
        }
        for pair in tokens.windows(2) {
            let (from, to) = (pair[0].as_ref(), pair[1].as_ref());
            if !from.is_empty() && !to.is_empty() {
                graph.add_edge(from, to);
            }
        }
        graph
    }

    /// Tokenize `text` and build its graph.
    pub fn from_text(text: &str) -> Self {
        Self::from_tokens(&tokenize(text))
    }

    /// Intern a word, returning its id. Existing words keep their id.
    pub fn add_node(&mut self, word: &str) -> NodeId {
        if let Some(&id) = self.index.get(word) {
            return id;
        }
        let id = self.words.len() as NodeId;
        self.words.push(word.to_string());
        self.index.insert(word.to_string(), id);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Record one occurrence of `from` followed by `to`.
    ///
    /// Creates either endpoint if absent. Returns the edge's new weight.
    pub fn add_edge(&mut self, from: &str, to: &str) -> u32 {
        let from_id = self.add_node(from);
        let to_id = self.add_node(to);
        self.add_edge_ids(from_id, to_id)
    }

    fn add_edge_ids(&mut self, from: NodeId, to: NodeId) -> u32 {
        if let Some(&(out_pos, in_pos)) = self.slots.get(&(from, to)) {
            self.outgoing[from as usize][out_pos].weight += 1;
            self.incoming[to as usize][in_pos].weight += 1;
            return self.outgoing[from as usize][out_pos].weight;
        }
        let out_list = &mut self.outgoing[from as usize];
        out_list.push(Edge { target: to, weight: 1 });
        let out_pos = out_list.len() - 1;
        let in_list = &mut self.incoming[to as usize];
        in_list.push(Edge { target: from, weight: 1 });
        let in_pos = in_list.len() - 1;
        self.slots.insert((from, to), (out_pos, in_pos));
        1
    }

    /// Look up a word's id.
    pub fn node_id(&self, word: &str) -> Option<NodeId> {
        self.index.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Resolve a NodeId back to its word.
    ///
    /// Panics if `id` was not produced by this graph.
    pub fn word(&self, id: NodeId) -> &str {
        &self.words[id as usize]
    }

    /// All words in first-appearance order (index = NodeId).
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Get outgoing edges for a node.
    pub fn successors(&self, id: NodeId) -> &[Edge] {
        self.outgoing.get(id as usize).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Get incoming edges for a node. `Edge::target` is the predecessor.
    pub fn predecessors(&self, id: NodeId) -> &[Edge] {
        self.incoming.get(id as usize).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Weight of the edge `from -> to`, if present.
    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<u32> {
        self.slots
            .get(&(from, to))
            .map(|&(out_pos, _)| self.outgoing[from as usize][out_pos].weight)
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.slots.contains_key(&(from, to))
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.successors(id).len()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.predecessors(id).len()
    }

    pub fn node_count(&self) -> usize {
        self.words.len()
    }

    /// Number of distinct directed edges.
    pub fn edge_count(&self) -> usize {
        self.slots.len()
    }

    /// Sum of all edge weights (= number of adjacent word pairs folded in).
    pub fn total_weight(&self) -> u64 {
        self.outgoing
            .iter()
            .flat_map(|edges| edges.iter())
            .map(|e| e.weight as u64)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All edges in (source id, insertion) order, with words resolved.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRecord> + '_ {
        self.outgoing.iter().enumerate().flat_map(move |(from, edges)| {
            edges.iter().map(move |e| EdgeRecord {
                from: self.words[from].clone(),
                to: self.words[e.target as usize].clone(),
                weight: e.weight,
            })
        })
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let words_mem: usize = self
            .words
            .iter()
            .map(|w| 2 * w.capacity() + size_of::<String>() * 2 + size_of::<NodeId>())
            .sum();
        let out_edges: usize = self.outgoing.iter().map(|v| v.len() * size_of::<Edge>()).sum();
        let in_edges: usize = self.incoming.iter().map(|v| v.len() * size_of::<Edge>()).sum();
        let slots_mem = self.slots.len() * (size_of::<(NodeId, NodeId)>() + size_of::<(usize, usize)>());

        words_mem + out_edges + in_edges + slots_mem
    }
}

/// Build a graph from a token stream. See [`Graph::from_tokens`].
pub fn build_graph<S: AsRef<str>>(tokens: &[S]) -> Graph {
    Graph::from_tokens(tokens)
}
