mod append;
mod decode;
mod error;
mod eval;
mod extract;
mod markers;
mod pipeline;
mod row;
mod scanner;
mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, warn};

use error::{Error, Result};
use pipeline::{BatchSummary, RunOptions};
use row::QuoteStyle;
use settings::{DEFAULT_SETTINGS_PATH, Settings};

#[derive(Parser)]
#[command(
    name = "kifu_sql",
    about = "Append shogi game logs (KIF) to SQL insert statements"
)]
struct Cli {
    /// A .kif file, or a directory scanned recursively for .kif files
    path: PathBuf,

    /// Settings file mapping file-name patterns to players and SQL files
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Print the extracted record and row without touching the SQL file
    #[arg(long)]
    dry_run: bool,

    /// Double single quotes inside string fields
    #[arg(long)]
    escape_quotes: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let options = RunOptions {
        dry_run: cli.dry_run,
        quote_style: if cli.escape_quotes {
            QuoteStyle::Escaped
        } else {
            QuoteStyle::Verbatim
        },
    };

    match run(&cli.path, &cli.settings, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path, settings_path: &Path, options: &RunOptions) -> Result<()> {
    if path.is_dir() {
        let summary =
            pipeline::process_directory(path, || load_settings(settings_path), options)?;
        print_summary(&summary);
        eprintln!("Directory processing completed.");
    } else if path.is_file() {
        let settings = load_settings(settings_path)?;
        let update = pipeline::update_sql(path, &settings, options)?;
        match update.outcome {
            Some(_) => eprintln!("Added entry to {}", update.sql_path.display()),
            None => print!("{}", update.dry_run_output()),
        }
    } else {
        return Err(Error::InvalidInput {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn load_settings(settings_path: &Path) -> Result<Settings> {
    let settings = Settings::load(settings_path)?;
    if settings.is_empty() {
        warn!("{} has no entries", settings_path.display());
    }
    Ok(settings)
}

// ═══════════════════════════════════════════════════════════════════════
//  OUTPUT
// ═══════════════════════════════════════════════════════════════════════

fn print_summary(summary: &BatchSummary) {
    eprintln!("\n══════════════════════════════════════════");
    eprintln!("  PROCESSING SUMMARY");
    eprintln!("══════════════════════════════════════════");
    eprintln!("  Total files found:      {}", summary.found);
    eprintln!("  Successfully processed: {}", summary.succeeded);
    eprintln!("  Errors encountered:     {}", summary.error_count());

    if !summary.failed.is_empty() {
        eprintln!("\nFailed files:");
        for (path, e) in summary.failed.iter().take(30) {
            eprintln!("  {}: {e}", path.display());
        }
        if summary.failed.len() > 30 {
            eprintln!("  ... and {} more", summary.failed.len() - 30);
        }
    }
}
