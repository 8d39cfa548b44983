//! MT103 Converter - CLI tool for converting MT103 messages to JSON.

use clap::Parser;
use mt103_system::{
    config::{CanonicalConfig, ConvertOptions, DEFAULT_CENTURY_BASE},
    conversion::{convert_directory, convert_file, write_message},
    Format, Message, Result,
};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(name = "mt103_converter")]
#[command(about = "Convert SWIFT MT103 messages to canonical JSON", long_about = None)]
struct Cli {
    /// Input file path (or stdin if neither this nor --batch is given)
    #[arg(short, long, conflicts_with = "batch")]
    input: Option<PathBuf>,

    /// Output file path (defaults to stdout for stdin input, or next to the input file)
    #[arg(short, long, conflicts_with = "batch")]
    output: Option<PathBuf>,

    /// Convert every *.txt file in this directory
    #[arg(long)]
    batch: Option<PathBuf>,

    /// Write a CSV report of a batch run to this path
    #[arg(long, requires = "batch")]
    report: Option<PathBuf>,

    /// Output format (json, swift)
    #[arg(long = "output-format", default_value = "json")]
    output_format: String,

    /// Base year for two-digit years
    #[arg(long = "century-base", default_value_t = DEFAULT_CENTURY_BASE)]
    century_base: i32,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when a batch finished with failed files.
fn run(cli: Cli) -> Result<bool> {
    let options = ConvertOptions {
        canonical: CanonicalConfig {
            century_base: cli.century_base,
        },
        format: cli.output_format.parse::<Format>()?,
        pretty: !cli.compact,
    };

    if let Some(ref dir) = cli.batch {
        let report = convert_directory(dir, &options)?;
        for outcome in &report.outcomes {
            if let Err(ref message) = outcome.result {
                error!("{}: {}", outcome.input.display(), message);
            }
        }
        info!(
            "Converted {} of {} files ({} failed)",
            report.succeeded(),
            report.outcomes.len(),
            report.failed()
        );
        if let Some(ref path) = cli.report {
            let mut file = File::create(path)?;
            report.write_csv(&mut file)?;
        }
        return Ok(report.failed() == 0);
    }

    match cli.input {
        Some(ref input) => {
            let written = convert_file(input, cli.output.as_deref(), &options)?;
            info!("Wrote {}", written.display());
        }
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            let message = Message::parse(&raw)?;

            if let Some(ref output_path) = cli.output {
                let mut file = BufWriter::new(File::create(output_path)?);
                write_message(&message, &mut file, &options)?;
                file.flush()?;
            } else {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                write_message(&message, &mut handle, &options)?;
            }
        }
    }

    Ok(true)
}
