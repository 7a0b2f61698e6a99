#![warn(clippy::pedantic)]

mod config;

use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::{eyre::WrapErr, owo_colors::OwoColorize};
use config::SearchConfig;
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::{LevelFilter, info};
use qter_core::parse_puzzle;
use second_cycle_finder::{FirstCycle, SearchResult, SecondCycleFinder, encode};

/// Finds second cycles on the 3x3x3 that fit alongside a first cycle
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    log_level: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every first cycle of a configuration and append the encodings to its output log
    Search {
        /// The search configuration to use, in TOML format
        #[arg(
            long,
            short = 'c',
            default_value = "search.toml",
            value_name = "SEARCH_CONFIG"
        )]
        config: PathBuf,
        /// Use this target order instead of the configured one
        #[arg(long, short = 'o')]
        order: Option<u64>,
        /// Append to this file instead of the configured output log
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the encodings instead of appending them to a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
    /// Print the Speffz encoding of a move sequence, e.g. "U L F L' R2"
    Encode { moves: String },
    /// Print the cycles, the order, and the number of moved facelets of a move sequence
    Info { moves: String },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.log_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Search {
            config,
            order,
            output,
            stdout,
        } => {
            let config = SearchConfig::load(&config)?;

            let output = if stdout {
                None
            } else {
                Some(output.unwrap_or_else(|| config.output.clone()))
            };

            run_search(&config, order, output)?;
        }
        Commands::Encode { moves } => {
            let finder = SecondCycleFinder::cube3()?;
            let permutation = finder.puzzle().apply_moves(&moves)?;

            println!("{}", encode(&permutation));
        }
        Commands::Info { moves } => {
            let finder = SecondCycleFinder::cube3()?;
            let permutation = finder.puzzle().apply_moves(&moves)?;

            println!("{} {permutation}", "Cycles:".bold());
            println!(
                "{} {}",
                "Cycle lengths:".bold(),
                permutation.cycles().iter().map(Vec::len).join(" ")
            );
            println!("{} {}", "Order:".bold(), permutation.order());
            println!(
                "{} {}",
                "Moved facelets:".bold(),
                permutation.moved_points().len()
            );
            println!("{} {}", "Speffz:".bold(), encode(&permutation));
        }
    }

    Ok(())
}

fn run_search(
    config: &SearchConfig,
    order: Option<u64>,
    output: Option<PathBuf>,
) -> color_eyre::Result<()> {
    let finder = match &config.puzzle {
        Some(path) => {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read the puzzle {}", path.display()))?;
            SecondCycleFinder::new(parse_puzzle(&text)?)?
        }
        None => SecondCycleFinder::cube3()?,
    };

    let mut options = config.options();
    if let Some(order) = order {
        options.target_order = order;
    }

    let first_cycles = config
        .first_cycles
        .iter()
        .map(|moves| {
            finder
                .first_cycle(moves)
                .wrap_err_with(|| format!("Failed to read the first cycle `{moves}`"))
        })
        .collect::<color_eyre::Result<Vec<_>>>()?;

    let out: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("Failed to open the output log {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(out);

    for (i, result) in finder.search_all(&first_cycles, &options) {
        let result = match result {
            Ok(result) => result,
            // Already logged by the finder
            Err(e) if !e.is_fatal() => continue,
            Err(e) => return Err(e.into()),
        };

        let written = write_first_cycle(&mut out, i, &first_cycles[i], &result)?;
        // Keep what's been found so far if a later first cycle takes forever
        out.flush()?;

        info!("Wrote {written} second cycles for first cycle {i}");
    }

    Ok(())
}

/// A `# <index>: <moves>` header followed by one encoding per line
fn write_first_cycle(
    out: &mut impl Write,
    index: usize,
    first_cycle: &FirstCycle,
    result: &SearchResult,
) -> io::Result<usize> {
    writeln!(out, "# {index}: {}", first_cycle.moves())?;

    let mut written = 0;
    for encoding in result.encodings() {
        writeln!(out, "{encoding}")?;
        written += 1;
    }

    Ok(written)
}
