//! Benchmark harness for the matrix engine
//!
//! Supports:
//! - Random SpGEMM (boolean multiply of two random matrices)
//! - Point-query latency: validity index vs bounded BFS
//!
//! Outputs: p50/p95/p99 times + sizes

use std::time::Instant;

use clap::{Parser, Subcommand};
use hdrhistogram::Histogram;
use rand::prelude::*;

use pairg::heuristics::reachable_within_bound;
use pairg::logging::{self, LogFormat};
use pairg::matrix::{multiply, BoolCsr, ExecConfig, RowExecutor};
use pairg::queries::QueryBatch;
use pairg::reachability::build_validity_matrix;

#[derive(Parser)]
#[command(name = "pairg-bench")]
#[command(about = "Benchmark harness for the pairg matrix engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Multiply two random square boolean matrices
    Spgemm {
        /// Matrix dimension
        #[arg(short = 'd', long, default_value = "100")]
        dim: usize,

        /// Minimum entries per row
        #[arg(short = 'l', long, default_value = "1")]
        min_nnz: usize,

        /// Maximum entries per row
        #[arg(short = 'H', long, default_value = "2")]
        max_nnz: usize,

        /// Number of timed repetitions
        #[arg(long, default_value = "10")]
        reps: usize,

        /// Worker threads (0 = all logical CPUs)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,

        /// Random seed for reproducibility
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Per-query latency of the validity index and of bounded BFS
    Queries {
        /// Matrix dimension (vertices of the random graph)
        #[arg(short = 'd', long, default_value = "10000")]
        dim: usize,

        /// Maximum out-degree of the random graph
        #[arg(short = 'H', long, default_value = "2")]
        max_nnz: usize,

        /// Upper distance bound (lower bound is 0 so both methods agree)
        #[arg(short = 'u', long, default_value = "8")]
        d_up: u32,

        /// Number of queries
        #[arg(long, default_value = "10000")]
        n_queries: usize,

        /// Worker threads (0 = all logical CPUs)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_with_default(LogFormat::Text, "warn");

    match cli.command {
        Commands::Spgemm {
            dim,
            min_nnz,
            max_nnz,
            reps,
            threads,
            seed,
        } => run_spgemm_bench(dim, min_nnz, max_nnz, reps, threads, seed),

        Commands::Queries {
            dim,
            max_nnz,
            d_up,
            n_queries,
            threads,
            seed,
        } => run_query_bench(dim, max_nnz, d_up, n_queries, threads, seed),
    }
}

fn run_spgemm_bench(
    dim: usize,
    min_nnz: usize,
    max_nnz: usize,
    reps: usize,
    threads: usize,
    seed: u64,
) -> anyhow::Result<()> {
    let exec = RowExecutor::new(&ExecConfig { threads })?;

    println!("═══════════════════════════════════════════════════════════════");
    println!("  SPGEMM BENCHMARK");
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Dimension: {}", dim);
    println!("  Row nnz: {}..={}", min_nnz, max_nnz);
    println!("  Threads: {}", exec.threads());
    println!("  Seed: {}", seed);
    println!();

    let mut rng = StdRng::seed_from_u64(seed);
    let a = BoolCsr::random(&mut rng, dim, min_nnz, max_nnz, true)?;
    let b = BoolCsr::random(&mut rng, dim, min_nnz, max_nnz, true)?;
    println!("  A: {} nnz, B: {} nnz", format_number(a.nnz()), format_number(b.nnz()));

    let mut hist = Histogram::<u64>::new(3)?;
    let mut c_nnz = 0;
    for _ in 0..reps {
        let start = Instant::now();
        let c = multiply(&exec, &a, &b)?;
        hist.record(start.elapsed().as_micros() as u64)?;
        c_nnz = c.nnz();
    }
    println!("  C: {} nnz", format_number(c_nnz));
    println!();

    print_histogram_stats("Multiply", "μs", &hist);
    println!();
    Ok(())
}

fn run_query_bench(
    dim: usize,
    max_nnz: usize,
    d_up: u32,
    n_queries: usize,
    threads: usize,
    seed: u64,
) -> anyhow::Result<()> {
    let exec = RowExecutor::new(&ExecConfig { threads })?;

    println!("═══════════════════════════════════════════════════════════════");
    println!("  QUERY BENCHMARK");
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Vertices: {}", dim);
    println!("  Interval: [0, {}]", d_up);
    println!("  Queries: {}", n_queries);
    println!("  Seed: {}", seed);
    println!();

    println!("[1/2] Building validity matrix...");
    let mut rng = StdRng::seed_from_u64(seed);
    let a = BoolCsr::random(&mut rng, dim, 0, max_nnz, false)?;
    let build_start = Instant::now();
    let validity = build_validity_matrix(&exec, &a, 0, d_up)?;
    println!("  ✓ Built in {:.1}s", build_start.elapsed().as_secs_f64());
    println!("  ✓ Validity nnz: {}", format_number(validity.matrix().nnz()));
    println!();

    println!("[2/2] Running {} queries...", n_queries);
    let batch = QueryBatch::random(&mut rng, dim, n_queries, dim);
    let mut hist_index = Histogram::<u64>::new(3)?;
    let mut hist_bfs = Histogram::<u64>::new(3)?;
    let mut mismatches = 0usize;

    for &(src, target) in batch.pairs() {
        let start = Instant::now();
        let by_index = validity.query(src, target);
        hist_index.record(start.elapsed().as_nanos() as u64)?;

        let start = Instant::now();
        let by_bfs = reachable_within_bound(&a, d_up, src, target);
        hist_bfs.record(start.elapsed().as_nanos() as u64)?;

        if by_index != by_bfs {
            mismatches += 1;
        }
    }
    println!();

    print_histogram_stats("Index query", "ns", &hist_index);
    print_histogram_stats("BFS query", "ns", &hist_bfs);
    println!();
    println!("  Mismatches: {}", mismatches);
    println!();
    Ok(())
}

fn print_histogram_stats(name: &str, unit: &str, hist: &Histogram<u64>) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {} timing ({})", name, unit);
    println!("───────────────────────────────────────────────────────────────");
    println!("    min:    {:>10.0}", hist.min() as f64);
    println!("    p50:    {:>10.0}", hist.value_at_quantile(0.50) as f64);
    println!("    p95:    {:>10.0}", hist.value_at_quantile(0.95) as f64);
    println!("    p99:    {:>10.0}", hist.value_at_quantile(0.99) as f64);
    println!("    max:    {:>10.0}", hist.max() as f64);
    println!("    mean:   {:>10.1}", hist.mean());
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}
