use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

mod auth;
mod config;
mod grading;
mod models;
mod offline;
mod report;
mod roster;
mod sheets;
mod sync;

use config::SheetConfig;
use models::CourseConfig;
use sheets::SheetsClient;

#[derive(Parser)]
#[command(name = "class-outcome-sync")]
#[command(about = "Computes pass/fail/exam outcomes for a class roster kept in Google Sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the roster, evaluate it and write outcomes back (default)
    Sync,
    /// Evaluate the roster and print outcomes without writing
    Preview {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Generate a markdown report of the current outcomes
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Evaluate a local CSV export instead of the spreadsheet
    Evaluate {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        total_classes: u32,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => {
            let config = SheetConfig::from_env()?;
            let client = connect(&config).await?;
            match sync::run_sync(&client, &config).await? {
                sync::SyncOutcome::NoData => println!("No data found."),
                sync::SyncOutcome::Written { rows, ack } => println!(
                    "Wrote {rows} outcomes to {}.",
                    ack.updated_range.unwrap_or_else(|| config.output_a1())
                ),
            }
        }
        Commands::Preview { limit } => {
            let config = SheetConfig::from_env()?;
            let client = connect(&config).await?;
            let Some(evaluation) = sync::evaluate_sheet(&client, &config).await? else {
                println!("No data found.");
                return Ok(());
            };

            println!(
                "Outcomes for {} ({} classes):",
                config.roster_a1(),
                evaluation.course.total_classes
            );
            for (position, (record, outcome)) in evaluation
                .records
                .iter()
                .zip(&evaluation.outcomes)
                .enumerate()
                .take(limit)
            {
                println!(
                    "- {}: {} absences, average {:.2} -> {} (final exam {})",
                    record.display_name(position),
                    record.absences,
                    record.average(),
                    outcome.status,
                    outcome.final_exam_score
                );
            }
        }
        Commands::Report { out } => {
            let config = SheetConfig::from_env()?;
            let client = connect(&config).await?;
            let Some(evaluation) = sync::evaluate_sheet(&client, &config).await? else {
                println!("No data found.");
                return Ok(());
            };

            let report = report::build_report(
                &config.roster_a1(),
                chrono::Utc::now(),
                evaluation.course,
                &evaluation.records,
                &evaluation.outcomes,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Evaluate {
            csv,
            total_classes,
            out,
        } => {
            let rows = offline::read_roster_csv(&csv)?;
            if rows.is_empty() {
                println!("No data found.");
                return Ok(());
            }

            let records = roster::parse_records(&rows, roster::RosterLayout::default())
                .with_context(|| format!("invalid roster data in {}", csv.display()))?;
            let outcomes = grading::evaluate(&records, CourseConfig { total_classes });

            match out {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    offline::write_outcomes_csv(file, &records, &outcomes)?;
                    println!("Evaluated {} students into {}.", records.len(), path.display());
                }
                None => offline::write_outcomes_csv(std::io::stdout(), &records, &outcomes)?,
            }
        }
    }

    Ok(())
}

async fn connect(config: &SheetConfig) -> anyhow::Result<SheetsClient> {
    let token = auth::TokenSource::from_env()
        .acquire()
        .await
        .context("failed to obtain a Google access token")?;
    info!(spreadsheet = %config.spreadsheet_id, "sheets client ready");
    Ok(SheetsClient::new(
        config.api_base.as_str(),
        config.spreadsheet_id.as_str(),
        token,
    )?)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
