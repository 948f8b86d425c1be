//! Work Split Planner
//!
//! Command-line driver for the split planner: builds locality-annotated
//! splits on the coordinating side and inspects them on the worker side.
//!
//! # Usage
//!
//! ```bash
//! # Plan every descriptor file under jobs/ into at most 8 splits
//! split-planner --config planner.toml plan --max-workers 8 jobs/
//!
//! # Show what a worker would read from a split
//! split-planner inspect splits/split-00000.bin
//!
//! # Write a container descriptor file covering two byte ranges
//! split-planner describe jobs/batch.mwu data/events.bin:0-4096 data/events.bin:4096-
//! ```

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use split_core::PlannerConfig;

/// Work Split Planner
#[derive(Parser, Debug)]
#[command(name = "split-planner")]
#[command(about = "Groups work descriptors into locality-aware splits")]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan splits from descriptor files and write them to the output directory
    Plan {
        /// Upper bound on the number of splits (default: one per descriptor file)
        #[arg(short, long)]
        max_workers: Option<u32>,

        /// Directory to write encoded splits to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Descriptor files or directories of descriptor files
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Decode a split and list the references a worker would read
    Inspect {
        /// Encoded split file
        split: PathBuf,
    },

    /// Write a descriptor file
    Describe {
        /// Reference to write; the container extension makes it a container
        output: String,

        /// Source files as PATH, PATH:START-END or PATH:START-
        #[arg(required = true)]
        sources: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => PlannerConfig::from_file(path)?,
        None => PlannerConfig::default(),
    }
    .with_env_overrides();
    config.validate()?;

    match args.command {
        Command::Plan {
            max_workers,
            output,
            inputs,
        } => {
            let max_workers = max_workers.or(config.planner.max_workers);
            let output = output.unwrap_or_else(|| config.planner.output_dir.clone());
            commands::plan(&config, &inputs, max_workers, &output)?;
        }
        Command::Inspect { split } => {
            let mut stdout = std::io::stdout().lock();
            commands::inspect(&config, &split, &mut stdout)?;
        }
        Command::Describe { output, sources } => {
            commands::describe(&config, &output, &sources)?;
        }
    }

    Ok(())
}
