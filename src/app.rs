//! One complete dbtest run: validate, report, loop, finish.

use crate::config::{self, ConfigError, RunConfig};
use crate::report::Reporter;
use crate::runner::{RunSummary, Runner};
use smoke_settings::Settings;
use sqlserver_demo::Connector;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Errors that end the program with a non-zero exit status.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Run dbtest against `connector`, writing the report to `out`.
///
/// Configuration errors are returned before the connector is touched.
/// Database errors are reported on `out` and folded into the summary.
pub async fn execute<W, R>(
    settings: &Settings,
    connector: &dyn Connector,
    out: W,
    input: &mut R,
) -> Result<RunSummary, AppError>
where
    W: Write,
    R: BufRead,
{
    let mut reporter = Reporter::new(out);

    let loops = match config::loop_count(settings) {
        Ok(loops) => loops,
        Err(e) => {
            reporter.fatal(e.console_message())?;
            return Err(e.into());
        }
    };
    reporter.loops(loops)?;

    let wait_for_key = match config::wait_for_key(settings) {
        Ok(wait) => wait,
        Err(e) => {
            reporter.fatal(e.console_message())?;
            return Err(e.into());
        }
    };
    reporter.cli_override(wait_for_key)?;

    let run_config = RunConfig::resolve(settings, loops, wait_for_key);
    tracing::debug!("Run configuration: {:?}", run_config);
    reporter.settings(config::dump(settings))?;

    let summary = Runner::new(&run_config).run(connector, &mut reporter).await?;
    tracing::info!(
        "Run finished: {} writes, {} reads{}",
        summary.writes,
        summary.reads,
        if summary.error.is_some() {
            " (aborted on database error)"
        } else {
            ""
        }
    );

    reporter.done(run_config.wait_for_key, input)?;
    Ok(summary)
}
