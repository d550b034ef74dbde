use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use lifegrid_core::{AppConfig, EdgePolicy};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "lifegrid.toml")]
    pub config: PathBuf,

    /// Tracing filter directive, e.g. `debug` or `lifegrid=trace`
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the final board
    #[arg(short, long)]
    pub print: bool,

    /// Seed for the random initial board
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start from a named pattern instead of random cells
    #[arg(long)]
    pub pattern: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// One thread owns the whole board
    Serial {
        #[arg(value_parser = positive_usize())]
        size: usize,
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        generations: u64,
        /// Edge policy (toroidal or bounded)
        #[arg(long, value_parser = parse_edges)]
        edges: Option<EdgePolicy>,
    },
    /// The step fans out across a thread pool
    Threaded {
        #[arg(value_parser = positive_usize())]
        size: usize,
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        generations: u64,
        #[arg(value_parser = positive_usize())]
        threads: usize,
        /// Edge policy (toroidal or bounded)
        #[arg(long, value_parser = parse_edges)]
        edges: Option<EdgePolicy>,
    },
    /// Rows are split across message-passing workers
    Distributed {
        #[arg(value_parser = positive_usize())]
        size: usize,
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        generations: u64,
        /// Number of workers
        #[arg(short, long, value_parser = positive_usize())]
        workers: Option<usize>,
        /// Step threads inside each worker
        #[arg(long, value_parser = positive_usize())]
        threads_per_worker: Option<usize>,
    },
}

/// How a run is executed once the configuration is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Serial,
    Threaded { threads: usize },
    Distributed,
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Serial => "serial",
            Variant::Threaded { .. } => "threaded",
            Variant::Distributed => "distributed",
        }
    }
}

impl Args {
    /// Overrides `config` with everything given on the command line.
    pub fn apply(&self, config: &mut AppConfig) -> Variant {
        if let Some(level) = &self.log_level {
            config.output.log_level = level.clone();
        }
        if self.print {
            config.output.print_board = true;
        }
        if let Some(seed) = self.seed {
            config.grid.seed = seed;
        }
        if let Some(pattern) = &self.pattern {
            config.grid.pattern = Some(pattern.clone());
        }

        match &self.command {
            Command::Serial {
                size,
                generations,
                edges,
            } => {
                config.grid.size = *size;
                config.grid.generations = *generations;
                if let Some(edges) = edges {
                    config.grid.edges = *edges;
                }
                config.cluster.workers = 1;
                Variant::Serial
            }
            Command::Threaded {
                size,
                generations,
                threads,
                edges,
            } => {
                config.grid.size = *size;
                config.grid.generations = *generations;
                if let Some(edges) = edges {
                    config.grid.edges = *edges;
                }
                config.cluster.workers = 1;
                Variant::Threaded { threads: *threads }
            }
            Command::Distributed {
                size,
                generations,
                workers,
                threads_per_worker,
            } => {
                config.grid.size = *size;
                config.grid.generations = *generations;
                if let Some(workers) = workers {
                    config.cluster.workers = *workers;
                }
                if let Some(threads) = threads_per_worker {
                    config.cluster.threads_per_worker = *threads;
                }
                // Partitions never wrap.
                config.grid.edges = EdgePolicy::Bounded;
                Variant::Distributed
            }
        }
    }
}

fn positive_usize() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

fn parse_edges(value: &str) -> Result<EdgePolicy, String> {
    match value.to_ascii_lowercase().as_str() {
        "toroidal" | "torus" | "wrap" => Ok(EdgePolicy::Toroidal),
        "bounded" | "dead" => Ok(EdgePolicy::Bounded),
        other => Err(format!(
            "unknown edge policy '{other}' (expected toroidal or bounded)"
        )),
    }
}
