///! CLI commands for pairg

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn};

use pairg::config::{Parameters, PartialParameters};
use pairg::formats::{load_graph, GraphFormat};
use pairg::logging::LogFormat;
use pairg::matrix::{BoolCsr, RowExecutor};
use pairg::queries::{cross_check, QueryBatch};
use pairg::reachability::build_validity_matrix;

/// Random query targets lie at most this many ids after their source
const QUERY_MAX_OFFSET: usize = 1000;

#[derive(Parser)]
#[command(name = "pairg")]
#[command(about = "Distance-constrained reachability queries on variation graphs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log record format (stderr)
    #[arg(long, value_enum, global = true, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Graph and distance flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Reference graph file
    #[arg(short = 'r', long = "graph")]
    pub graph: Option<PathBuf>,

    /// Graph format (txt or vg)
    #[arg(short = 'm', long = "mode")]
    pub format: Option<String>,

    /// Upper distance bound
    #[arg(short = 'u', long)]
    pub d_up: Option<u32>,

    /// Worker threads (0 = all logical CPUs)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Query pair "src,target" (repeatable)
    #[arg(long = "pair", value_parser = parse_pair)]
    pub pairs: Vec<(usize, usize)>,

    /// TOML file with default parameters; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the validity matrix and answer queries from it
    Index {
        #[command(flatten)]
        graph: GraphArgs,

        /// Lower distance bound
        #[arg(short = 'l', long)]
        d_low: Option<u32>,

        /// Count of random queries to answer and time (0 = none)
        #[arg(short = 'c', long = "queries")]
        query_count: Option<usize>,

        /// Seed for the random query batch
        #[arg(long)]
        seed: Option<u64>,

        /// Write build statistics as JSON to this path
        #[arg(long)]
        stats_json: Option<PathBuf>,
    },

    /// Answer queries with bounded BFS only, without building a matrix
    Bfs {
        #[command(flatten)]
        graph: GraphArgs,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Index {
                graph,
                d_low,
                query_count,
                seed,
                stats_json,
            } => {
                let mut flags = graph.to_partial()?;
                flags.d_low = d_low;
                flags.query_count = query_count;
                flags.seed = seed;
                let params = Parameters::resolve(graph.config.as_deref(), flags)?;
                run_index(&params, &graph.pairs, stats_json)
            }
            Commands::Bfs { graph } => {
                let mut flags = graph.to_partial()?;
                flags.d_low = Some(0);
                let params = Parameters::resolve(graph.config.as_deref(), flags)?;
                run_bfs(&params, &graph.pairs)
            }
        }
    }
}

impl GraphArgs {
    fn to_partial(&self) -> Result<PartialParameters> {
        let format = self
            .format
            .as_deref()
            .map(str::parse::<GraphFormat>)
            .transpose()?;
        Ok(PartialParameters {
            graph_file: self.graph.clone(),
            format,
            d_up: self.d_up,
            threads: self.threads,
            ..Default::default()
        })
    }
}

fn load_adjacency(params: &Parameters) -> Result<BoolCsr> {
    let graph = load_graph(&params.graph_file, params.format)
        .with_context(|| format!("loading graph {}", params.graph_file.display()))?;
    let a = BoolCsr::from_graph(graph)?;
    a.print("adjacency matrix", 1);
    Ok(a)
}

fn run_index(
    params: &Parameters,
    pairs: &[(usize, usize)],
    stats_json: Option<PathBuf>,
) -> Result<()> {
    info!(
        graph = %params.graph_file.display(),
        format = %params.format,
        d_low = params.d_low,
        d_up = params.d_up,
        "pairg index"
    );
    let exec = RowExecutor::new(&params.exec_config())?;
    let a = load_adjacency(params)?;

    let validity = build_validity_matrix(&exec, &a, params.d_low, params.d_up)?;
    validity.matrix().matrix().print("validity matrix", 1);

    if let Some(path) = stats_json {
        let file = File::create(&path)
            .with_context(|| format!("creating stats file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), validity.stats())?;
        info!(path = %path.display(), "wrote build stats");
    }

    for &(i, j) in pairs {
        println!("{i}\t{j}\t{}", validity.query(i, j));
    }

    if let Some(count) = params.query_count {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let batch = QueryBatch::random(&mut rng, a.n_rows(), count, QUERY_MAX_OFFSET);
        let by_index = batch.answer_with_index(&exec, validity.matrix());

        if params.d_low == 0 {
            let by_bfs = batch.answer_with_bfs(&exec, &a, params.d_up);
            let mismatches = cross_check(&by_index, &by_bfs);
            if mismatches > 0 {
                warn!(mismatches, queries = count, "index and bfs disagree");
            } else {
                info!(queries = count, "index and bfs agree on every query");
            }
        }
    }

    Ok(())
}

fn run_bfs(params: &Parameters, pairs: &[(usize, usize)]) -> Result<()> {
    if pairs.is_empty() {
        anyhow::bail!("no --pair given; nothing to answer");
    }
    let exec = RowExecutor::new(&params.exec_config())?;
    let a = load_adjacency(params)?;

    let batch = QueryBatch::from_pairs(pairs.to_vec());
    let answers = batch.answer_with_bfs(&exec, &a, params.d_up);
    for (&(i, j), found) in pairs.iter().zip(&answers.answers) {
        println!("{i}\t{j}\t{found}");
    }
    Ok(())
}

fn parse_pair(s: &str) -> Result<(usize, usize)> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        anyhow::bail!("Pair must be in format 'src,target'");
    }
    let src = parts[0].trim().parse::<usize>()?;
    let target = parts[1].trim().parse::<usize>()?;
    Ok((src, target))
}
