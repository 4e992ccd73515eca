use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use railyard_reporter::{Reporter, ReporterConfig, ReporterError};
use railyard_results::AggregatedResults;
use railyard_tracker::{ProjectId, SuiteId};
use railyard_tracker_http::{HttpTracker, HttpTrackerConfig};

mod logging;

/// Report a finished Jest run to TestRail, one closed run per suite.
///
/// TestRail host and credentials come from `TESTRAIL_HOST`, `TESTRAIL_USER`
/// and `TESTRAIL_PASSWORD` (a `.env` file is honoured).
#[derive(Debug, Parser)]
#[command(name = "railyard", version)]
struct Args {
    /// Aggregated results written by `jest --json --outputFile=<file>`.
    results: PathBuf,

    /// Reporter options as JSON, e.g. `{"project_id": 1, "suite_id": 3}`.
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Project to create runs in. Overrides the options file.
    #[arg(long)]
    project_id: Option<u64>,

    /// Suite for tests whose outermost group has no suite id. Overrides the
    /// options file.
    #[arg(long)]
    suite_id: Option<u64>,

    /// Exit non-zero when any suite fails to submit.
    #[arg(long)]
    fail_on_error: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::init();

    let args = Args::parse();
    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "railyard failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, ReporterError> {
    let options = match &args.options {
        Some(path) => Some(ReporterConfig::from_json(&read_to_string(path).await?)?),
        None => None,
    };
    let config = resolve_config(options, args.project_id, args.suite_id)?;

    let results = AggregatedResults::from_json(&read_to_string(&args.results).await?)?;
    let tracker = HttpTracker::new(HttpTrackerConfig::from_env()?)?;
    let reporter = Reporter::new(config, Arc::new(tracker));

    let report = reporter.on_run_complete(&results).wait().await;
    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "submission finished"
    );

    if args.fail_on_error && !report.is_success() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

async fn read_to_string(path: &Path) -> Result<String, ReporterError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReporterError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Flags win over the options file; a project id is required from one of them.
fn resolve_config(
    options: Option<ReporterConfig>,
    project_id: Option<u64>,
    suite_id: Option<u64>,
) -> Result<ReporterConfig, ReporterError> {
    let invalid = |e: railyard_tracker::TrackerError| ReporterError::Config(e.to_string());

    let mut config = match (options, project_id) {
        (Some(mut config), Some(id)) => {
            config.project_id = ProjectId::new(id).map_err(invalid)?;
            config
        }
        (Some(config), None) => config,
        (None, Some(id)) => ReporterConfig::new(ProjectId::new(id).map_err(invalid)?),
        (None, None) => {
            return Err(ReporterError::Config(
                "project id is required (--project-id or options file)".to_string(),
            ));
        }
    };

    if let Some(id) = suite_id {
        config.suite_id = Some(SuiteId::new(id).map_err(invalid)?);
    }
    Ok(config)
}
