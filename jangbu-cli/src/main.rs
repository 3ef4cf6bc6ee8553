use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use jangbu_ingest::{read_raw_ledger, write_classified_ledger};
use jangbu_statement::run_pipeline;

#[derive(Parser, Debug)]
#[command(name = "jangbu", version, about = "Bank ledger → financial statement pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a raw bank-export CSV and write the classified ledger
    Classify {
        /// Path to the raw ledger CSV
        #[arg(long)]
        ledger: PathBuf,

        /// Output path (default: <ledger>.classified.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the assembled financial statement
    Report {
        #[arg(long)]
        ledger: PathBuf,
    },

    /// Run the reconciliation checks; exits non-zero if any fail
    Verify {
        #[arg(long)]
        ledger: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Classify { ledger, out } => {
            let raw = read_raw_ledger(&ledger)
                .with_context(|| format!("reading {}", ledger.display()))?;
            let output = run_pipeline(raw)?;

            let out_path = out.unwrap_or_else(|| default_out_path(&ledger));
            write_classified_ledger(&out_path, &output.classified)
                .with_context(|| format!("writing {}", out_path.display()))?;

            println!(
                "Classified {} transactions → {}",
                output.classified.len(),
                out_path.display()
            );
            let excluded = output.classified.iter().filter(|c| c.is_excluded()).count();
            if excluded > 0 {
                println!("({excluded} excluded test rows)");
            }
        }

        Command::Report { ledger } => {
            let raw = read_raw_ledger(&ledger)
                .with_context(|| format!("reading {}", ledger.display()))?;
            let output = run_pipeline(raw)?;
            print!("{}", output.statement.to_text());
        }

        Command::Verify { ledger } => {
            let raw = read_raw_ledger(&ledger)
                .with_context(|| format!("reading {}", ledger.display()))?;
            let output = run_pipeline(raw)?;
            print!("{}", output.report.to_text());
            if !output.report.all_passed() {
                bail!("reconciliation failed");
            }
        }
    }

    Ok(())
}

fn default_out_path(ledger: &Path) -> PathBuf {
    let mut name = ledger
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger".to_string());
    name.push_str(".classified.csv");
    ledger.with_file_name(name)
}
