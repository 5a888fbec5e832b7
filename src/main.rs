use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod config;
mod diagnostics;
mod log;
mod model;
mod notify;
mod render;
mod signature;
mod window;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "mongo-slowlog")]
#[command(about = "MongoDB slow query log analyzer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group slow find queries by suggested index and report the slowest.
    Report(config::ReportArgs),
}

/// How a report run ended; mapped onto the process exit code.
#[derive(Debug, PartialEq)]
enum Outcome {
    /// At least one find shape met the threshold.
    Report(String),
    /// Nothing slow enough or frequent enough to show.
    NothingToReport,
}

const EXIT_NOTHING_TO_REPORT: u8 = 1;
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Report(args) => {
            diagnostics::init(args.cron_mode);

            let settings = match config::Settings::load(&args) {
                Ok(settings) => settings,
                Err(err) => {
                    tracing::error!("{:#}", err);
                    return ExitCode::from(EXIT_FAILURE);
                }
            };

            execute(&settings)
        }
    }
}

/// Run one report and deliver its result. Delivery problems are logged and
/// never change the exit code.
fn execute(settings: &config::Settings) -> ExitCode {
    let webhook = settings.webhook_url.as_deref().and_then(|url| {
        notify::Webhook::new(url)
            .map_err(|err| diagnostics::warn(format!("webhook disabled: {:#}", err)))
            .ok()
    });
    let deliver = |text: &str| {
        if let Some(hook) = &webhook {
            match hook.send(text) {
                Ok(()) => tracing::info!("notification sent"),
                Err(err) => tracing::error!("{:#}", err),
            }
        }
    };

    match run_report(settings) {
        Ok(Outcome::Report(table)) => {
            if !settings.quiet {
                println!("{}", table);
            }
            deliver(&notify::report_message(
                settings.last_minutes,
                settings.threshold,
                &table,
            ));
            ExitCode::SUCCESS
        }
        Ok(Outcome::NothingToReport) => ExitCode::from(EXIT_NOTHING_TO_REPORT),
        Err(err) => {
            tracing::error!("{:#}", err);
            deliver(&notify::failure_message(&settings.log_files, &err));
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run_report(settings: &config::Settings) -> Result<Outcome> {
    if settings.log_files.is_empty() {
        anyhow::bail!(
            "{}",
            diagnostics::error_message("MongoDB log file path not specified in config or as argument")
        );
    }

    tracing::info!(
        files = ?settings.log_files,
        threshold = settings.threshold,
        last_minutes = ?settings.last_minutes,
        webhook = settings.webhook_url.is_some(),
        "processing slow queries"
    );

    // 1) Window.
    let window = window::TimeWindow::last_minutes(settings.last_minutes, chrono::Utc::now());
    if let Some(cutoff) = window.cutoff() {
        tracing::info!("only considering entries from {}", cutoff.to_rfc3339());
    }

    // 2) Parse + aggregate every source.
    let mut analysis = log::Analysis::default();
    for path in &settings.log_files {
        analysis.absorb(log::analyze_log_file(path, &window)?);
    }

    let stats = analysis.stats;
    tracing::info!("lines processed: {}", stats.lines_processed);
    if stats.malformed_lines > 0 {
        tracing::info!("undecodable lines skipped: {}", stats.malformed_lines);
    }
    if let Some(minutes) = settings.last_minutes {
        tracing::info!(
            "lines older than {} minutes: {} (without timestamp: {})",
            minutes,
            stats.filtered_by_time,
            stats.missing_timestamp
        );
    }
    tracing::info!(
        "slow query entries analyzed: {} ({} distinct shapes)",
        stats.slow_query_entries,
        analysis.aggregate.len()
    );

    if analysis.aggregate.is_empty() {
        tracing::info!("no slow queries found after filtering");
        return Ok(Outcome::NothingToReport);
    }

    // 3) Report.
    let rows = model::build_report(&analysis.aggregate, settings.threshold);
    if rows.is_empty() {
        tracing::info!(
            "no slow find query meets the threshold of {} occurrences",
            settings.threshold
        );
        return Ok(Outcome::NothingToReport);
    }

    Ok(Outcome::Report(render::render_table(&rows)))
}
