use clap::Args;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use stress_check::config::AppConfig;
use stress_check::error::AppError;
use stress_check::workflows::analytics::{hash_password, AnalyticsSummary};
use stress_check::workflows::assessment::store::write_csv;
use stress_check::workflows::assessment::{CsvResponseStore, ResponseStore};

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = CsvResponseStore::open(&config.storage.responses_path)?;
    let records = store.list_all()?;

    match args.output {
        Some(path) => {
            write_csv(&records, File::create(&path)?)?;
            println!("Exported {} responses to {}", records.len(), path.display());
        }
        None => write_csv(&records, io::stdout().lock())?,
    }
    Ok(())
}

pub(crate) fn run_summary() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = CsvResponseStore::open(&config.storage.responses_path)?;
    let summary = AnalyticsSummary::from_records(&store.list_all()?);
    render_summary(&summary, io::stdout().lock())?;
    Ok(())
}

pub(crate) fn hash_admin_password(password: &str) -> Result<(), AppError> {
    println!("{}", hash_password(password)?);
    Ok(())
}

fn render_summary<W: Write>(summary: &AnalyticsSummary, mut out: W) -> io::Result<()> {
    writeln!(out, "Research analytics")?;
    if let Some(message) = summary.message {
        writeln!(out, "{message}")?;
        return Ok(());
    }

    writeln!(out, "Total participants: {}", summary.total_participants)?;
    if let Some(average) = summary.average_score {
        writeln!(out, "Average score: {average:.1}")?;
    }
    if let Some(max) = summary.max_score {
        writeln!(out, "Max score: {max}")?;
    }

    writeln!(out, "\nStress distribution")?;
    for entry in &summary.level_distribution {
        writeln!(out, "- {}: {}", entry.level, entry.count)?;
    }

    writeln!(out, "\nScore spread")?;
    for bucket in &summary.score_spread {
        writeln!(out, "- {:>2}: {}", bucket.score, "#".repeat(bucket.count))?;
    }
    Ok(())
}
