use std::time::Instant;

use anyhow::{bail, Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;
use word_graph_core::{CancelToken, Graph, PageRankConfig};

type Generator = fn(usize) -> Vec<String>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let token_count: usize = match args.get(2) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("token_count must be a positive integer, got '{}'", raw))?,
        None => 1_000_000,
    };

    if mode == "help" || mode == "--help" {
        println!("Usage: word-graph-bench [mode] [token_count]");
        println!();
        println!("Modes:");
        println!("  all      Run all generators and benchmark each (default)");
        println!("  zipf     Zipf-distributed vocabulary (natural-text-like hubs)");
        println!("  chain    Every token distinct (one long path)");
        println!("  cycle    Small vocabulary repeated in order (one big cycle)");
        println!("  random   Uniform draws from a fixed vocabulary");
        println!("  barbell  Two dense vocabularies joined by a thin bridge phrase");
        println!();
        println!("Default token_count: 1000000");
        return Ok(());
    }
    if token_count < 2 {
        bail!("token_count must be at least 2");
    }

    println!("word-graph-bench");
    println!("================");
    println!();

    let generators: Vec<(&str, Generator)> = match mode {
        "zipf" => vec![("Zipf vocabulary", gen_zipf)],
        "chain" => vec![("Distinct chain", gen_chain)],
        "cycle" => vec![("Repeating cycle", gen_cycle)],
        "random" => vec![("Uniform random", gen_random)],
        "barbell" => vec![("Barbell (vocab-bridge-vocab)", gen_barbell)],
        "all" => vec![
            ("Zipf vocabulary", gen_zipf as Generator),
            ("Distinct chain", gen_chain),
            ("Repeating cycle", gen_cycle),
            ("Uniform random", gen_random),
            ("Barbell (vocab-bridge-vocab)", gen_barbell),
        ],
        _ => bail!("unknown mode: {}. Use --help for options.", mode),
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, token_count);
    }
    Ok(())
}

fn run_benchmark(name: &str, generator: Generator, token_count: usize) {
    println!("--- {} ---", name);
    println!("Target: {} tokens", token_count);

    let t = Instant::now();
    let tokens = generator(token_count);
    let gen_time = t.elapsed();

    let t = Instant::now();
    let graph = Graph::from_tokens(&tokens);
    let build_time = t.elapsed();
    println!(
        "Generated in {:.2}s, built in {:.2}s: {} nodes, {} edges, ~{:.1}MB",
        gen_time.as_secs_f64(),
        build_time.as_secs_f64(),
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );

    // First and last token: the pair most likely to be far apart
    let (first, last) = (&tokens[0], &tokens[tokens.len() - 1]);

    let probe = &tokens[2.min(tokens.len() - 1)];
    let t = Instant::now();
    let bridges = word_graph_core::bridge_words(&graph, first, probe);
    println!(
        "Bridge words {} -> {}: {} found in {:.3}ms",
        first,
        probe,
        bridges.len(),
        t.elapsed().as_secs_f64() * 1000.0
    );

    let t = Instant::now();
    let path = word_graph_core::shortest_path(&graph, first, last);
    let elapsed = t.elapsed().as_secs_f64() * 1000.0;
    match path {
        Ok(p) => println!(
            "Shortest path {} -> {}: {} hops, cost {} in {:.1}ms",
            first,
            last,
            p.hops(),
            p.cost,
            elapsed
        ),
        Err(e) => println!("Shortest path {} -> {}: {} ({:.1}ms)", first, last, e, elapsed),
    }

    let t = Instant::now();
    let ranks = word_graph_core::pagerank(&graph, PageRankConfig::default());
    let elapsed = t.elapsed().as_secs_f64() * 1000.0;
    println!(
        "PageRank: {} iterations (converged: {}) in {:.1}ms",
        ranks.iterations, ranks.converged, elapsed
    );
    println!();
    println!("{:>6} {:>16} {:>12}", "rank", "word", "score");
    println!("{:->6} {:->16} {:->12}", "", "", "");
    for (i, (word, score)) in ranks.top(5).into_iter().enumerate() {
        println!("{:>6} {:>16} {:>12.6}", i + 1, word, score);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let t = Instant::now();
    let trace = word_graph_core::random_walk(&graph, &mut rng, &CancelToken::new(), |_| {});
    println!();
    println!(
        "Random walk (seed 42): {} words, {} in {:.2}ms",
        trace.len(),
        trace.outcome,
        t.elapsed().as_secs_f64() * 1000.0
    );
    println!();
}

// ---------------------------------------------------------------------------
// Generators: deterministic token streams. Words are spelled in letters
// because the tokenizer treats digits as separators.
// ---------------------------------------------------------------------------

/// Spell `n` in base 26 with a prefix, e.g. `word("w", 27)` = `"wbb"`.
fn word(prefix: &str, mut n: usize) -> String {
    let mut s = String::from(prefix);
    loop {
        s.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
        if n == 0 {
            return s;
        }
    }
}

/// Zipf-like vocabulary: word `k` appears with probability ~ 1/k.
///
/// Produces a few very heavy hubs ("the", "of") and a long tail, like real
/// text. Sampled by inverting the harmonic CDF.
fn gen_zipf(token_count: usize) -> Vec<String> {
    let vocab = (token_count / 10).clamp(10, 50_000);
    let mut rng = ChaCha8Rng::seed_from_u64(12345);

    let mut cdf = Vec::with_capacity(vocab);
    let mut acc = 0.0;
    for k in 1..=vocab {
        acc += 1.0 / k as f64;
        cdf.push(acc);
    }

    (0..token_count)
        .map(|_| {
            let x = rng.random::<f64>() * acc;
            let k = cdf.partition_point(|&c| c < x).min(vocab - 1);
            word("z", k)
        })
        .collect()
}

/// Every token distinct: a single path, the deepest possible Dijkstra.
fn gen_chain(token_count: usize) -> Vec<String> {
    (0..token_count).map(|i| word("c", i)).collect()
}

/// A fixed vocabulary repeated in order: every walk ends on a cycle and
/// every edge weight grows with the repetition count.
fn gen_cycle(token_count: usize) -> Vec<String> {
    let vocab = (token_count / 100).clamp(3, 10_000);
    (0..token_count).map(|i| word("y", i % vocab)).collect()
}

/// Uniform draws from a fixed vocabulary. Baseline with no structure.
fn gen_random(token_count: usize) -> Vec<String> {
    let vocab = (token_count / 10).clamp(10, 100_000);
    let mut rng = ChaCha8Rng::seed_from_u64(54321);
    (0..token_count)
        .map(|_| word("r", rng.random_range(0..vocab)))
        .collect()
}

/// Barbell: two vocabularies that each mix densely, joined once by a fixed
/// bridge phrase. Paths from one side to the other must cross the bridge.
fn gen_barbell(token_count: usize) -> Vec<String> {
    let bridge_len = 10;
    let half = token_count.saturating_sub(bridge_len) / 2;
    let vocab = (half / 20).clamp(5, 20_000);
    let mut rng = ChaCha8Rng::seed_from_u64(99999);

    let mut tokens = Vec::with_capacity(token_count);
    tokens.extend((0..half).map(|_| word("a", rng.random_range(0..vocab))));
    tokens.extend((0..bridge_len).map(|i| word("m", i)));
    tokens.extend((0..half).map(|_| word("b", rng.random_range(0..vocab))));
    tokens
}
