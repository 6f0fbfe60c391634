//! `maglevctl` — inspect Maglev assignment tables.
//!
//! Builds a table from a TOML backend list and answers questions about it.
//!
//! # Usage
//!
//! ```text
//! maglevctl -c maglev.toml lookup 42 1234567        # owner of each key
//! maglevctl -c maglev.toml owners                   # partition -> backend
//! maglevctl -c maglev.toml stats                    # per-backend load
//! maglevctl -c maglev.toml diff --remove backend-3  # disruption of a change
//! maglevctl -b a -b b -b c -p 7 owners              # no config file
//! ```

mod config;
mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use maglev_table::{LookupTable, Maglev};
use tracing::debug;

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "maglevctl",
    version,
    about = "Inspect Maglev consistent-hashing tables"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend names (appended to the configured ones).
    #[arg(short, long = "backend", global = true)]
    backends: Vec<String>,

    /// Override the requested partition count.
    #[arg(short, long, global = true)]
    partitions: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the backend owning each key.
    Lookup {
        /// 64-bit keys.
        #[arg(required = true)]
        keys: Vec<u64>,
    },
    /// Print the owner of every partition.
    Owners,
    /// Print per-backend partition counts.
    Stats,
    /// Apply membership changes and report which partitions move.
    Diff {
        /// Backends to mark dead.
        #[arg(short, long)]
        remove: Vec<String>,
        /// Backends to add or revive.
        #[arg(short, long)]
        add: Vec<String>,
        /// Print every moved partition, not just the summary.
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref())?;
    telemetry::init(&config.log.level);

    config.table.backends.extend(cli.backends);
    if let Some(partitions) = cli.partitions {
        config.table.partitions = partitions;
    }

    let table = config.build().context("building table")?;
    debug!(
        backends = table.names().len(),
        modulus = table.modulus().get(),
        "table ready"
    );

    match cli.command {
        Commands::Lookup { keys } => {
            for key in keys {
                println!("{key}\t{}", table.lookup(key));
            }
        }
        Commands::Owners => {
            let snap = table.snapshot();
            for (p, &index) in snap.assignments().iter().enumerate() {
                println!("{p}\t{}", snap.names()[index as usize]);
            }
        }
        Commands::Stats => print_stats(&table),
        Commands::Diff {
            remove,
            add,
            verbose,
        } => diff(table, &remove, &add, verbose)?,
    }

    Ok(())
}

fn print_stats(table: &Maglev) {
    let load = table.snapshot().load();
    for backend in table.backends() {
        let state = if backend.live { "live" } else { "dead" };
        println!("{}\t{}\t{state}", backend.name, load.counts[backend.index]);
    }
    println!(
        "partitions={} owners={} min={} max={} peak-to-mean={:.4}",
        table.modulus(),
        load.owners(),
        load.min(),
        load.max(),
        load.peak_to_mean()
    );
}

fn diff(mut table: Maglev, remove: &[String], add: &[String], verbose: bool) -> Result<()> {
    let before = table.snapshot();
    if !remove.is_empty() {
        table.remove(remove).context("removing backends")?;
    }
    if !add.is_empty() {
        table.add(add).context("adding backends")?;
    }
    let after = table.snapshot();

    let moved = LookupTable::diff(&before, &after);
    if verbose {
        for r in &moved {
            println!("{}\t{}\t{}", r.partition, r.from, r.to);
        }
    }
    println!(
        "moved={} of {} ({:.4})",
        moved.len(),
        after.len(),
        LookupTable::disruption(&before, &after)
    );
    Ok(())
}
