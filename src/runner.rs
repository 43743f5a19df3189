//! The write/read loop against the Demo table.

use crate::config::RunConfig;
use crate::report::Reporter;
use crate::timestamp;
use sqlserver_demo::{Connector, DemoStore, DemoStoreError};
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Outcome of a run. Database failures end the run early but are not errors
/// of the program; they are recorded here and on the console.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub writes: u32,
    pub reads: u32,
    /// Text of the database error that stopped the run, if any.
    pub error: Option<String>,
}

#[derive(Error, Debug)]
enum IterationError {
    #[error(transparent)]
    Store(#[from] DemoStoreError),
    #[error(transparent)]
    Report(#[from] io::Error),
}

/// Runs `loops` iterations of optional-insert-then-read over one connection.
pub struct Runner<'a> {
    config: &'a RunConfig,
    clock: fn() -> String,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self {
            config,
            clock: timestamp::now,
        }
    }

    /// Replace the source of row timestamps.
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    /// Connect, iterate, and close.
    ///
    /// The connection is closed whether or not the iterations succeed. Only
    /// console write failures are returned as errors.
    pub async fn run<W: Write>(
        &self,
        connector: &dyn Connector,
        reporter: &mut Reporter<W>,
    ) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();

        reporter.connection(&self.config.target)?;
        reporter.query_banner()?;

        let mut store = match connector.connect(&self.config.target).await {
            Ok(store) => store,
            Err(e) => {
                warn!("Connection failed: {}", e);
                reporter.database_error(&e)?;
                summary.error = Some(e.to_string());
                return Ok(summary);
            }
        };

        let outcome = self.iterate(store.as_mut(), reporter, &mut summary).await;
        let closed = store.close().await;

        match outcome {
            Ok(()) => {}
            Err(IterationError::Store(e)) => {
                warn!("Run aborted after {} reads: {}", summary.reads, e);
                reporter.database_error(&e)?;
                summary.error = Some(e.to_string());
            }
            Err(IterationError::Report(e)) => return Err(e),
        }

        if let Err(e) = closed {
            if summary.error.is_none() {
                reporter.database_error(&e)?;
                summary.error = Some(e.to_string());
            } else {
                warn!("Failed to close connection: {}", e);
            }
        }

        Ok(summary)
    }

    async fn iterate<W: Write>(
        &self,
        store: &mut dyn DemoStore,
        reporter: &mut Reporter<W>,
        summary: &mut RunSummary,
    ) -> Result<(), IterationError> {
        let config = self.config;
        if config.read_only {
            info!("Read-only mode: skipping inserts");
        }

        for iteration in 1..=config.loops {
            if !config.read_only {
                let now = (self.clock)();
                reporter.writing(&now)?;
                let affected = store.insert_demo(&now, &now).await?;
                debug!(iteration, affected, "Inserted Demo row");
                summary.writes += 1;
            }

            let latest = store.latest_demo().await?;
            reporter.record(latest.as_ref())?;
            summary.reads += 1;

            if iteration < config.loops && !config.pause.is_zero() {
                tokio::time::sleep(config.pause).await;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlserver_demo::memory::{MemoryConnector, Statement};
    use sqlserver_demo::ConnectionTarget;
    use std::time::Duration;

    const FIXED: &str = "2024-01-05T09:03:07.1234567+02:00";

    fn fixed_clock() -> String {
        FIXED.to_string()
    }

    fn config(loops: u32, read_only: bool) -> RunConfig {
        RunConfig {
            loops,
            wait_for_key: false,
            read_only,
            pause: Duration::ZERO,
            failover: false,
            target: ConnectionTarget {
                server: "sql-a".to_string(),
                ..Default::default()
            },
        }
    }

    async fn run(config: &RunConfig, connector: &MemoryConnector) -> (RunSummary, String) {
        let mut reporter = Reporter::new(Vec::new());
        let summary = Runner::new(config)
            .with_clock(fixed_clock)
            .run(connector, &mut reporter)
            .await
            .unwrap();
        (summary, String::from_utf8(reporter.into_inner()).unwrap())
    }

    #[tokio::test]
    async fn test_write_then_read_each_iteration() {
        let connector = MemoryConnector::new();
        let (summary, output) = run(&config(3, false), &connector).await;

        assert_eq!(summary.writes, 3);
        assert_eq!(summary.reads, 3);
        assert_eq!(summary.error, None);

        let insert = Statement::Insert {
            name: FIXED.to_string(),
            content: FIXED.to_string(),
        };
        assert_eq!(
            connector.statements(),
            vec![
                insert.clone(),
                Statement::SelectLatest,
                insert.clone(),
                Statement::SelectLatest,
                insert,
                Statement::SelectLatest,
            ]
        );
        assert!(output.contains(&format!("Writing {FIXED} to the database...")));
        assert!(output.contains(&format!("3 {FIXED} {FIXED}")));
        assert_eq!(connector.close_count(), 1);
    }

    #[tokio::test]
    async fn test_read_only_never_inserts() {
        for loops in [2, 5] {
            let connector = MemoryConnector::new().with_row("seed", "seed");
            let (summary, output) = run(&config(loops, true), &connector).await;

            assert_eq!(connector.insert_count(), 0);
            assert_eq!(connector.select_count(), loops as usize);
            assert_eq!(summary.writes, 0);
            assert!(!output.contains("Writing"));
            assert!(output.contains("1 seed seed"));
        }
    }

    #[tokio::test]
    async fn test_unreachable_runs_no_iterations() {
        let connector = MemoryConnector::new().unreachable();
        let (summary, output) = run(&config(3, false), &connector).await;

        assert!(connector.statements().is_empty());
        assert_eq!(connector.close_count(), 0);
        assert_eq!(summary.reads, 0);
        assert!(summary.error.as_deref().unwrap().contains("connection refused"));
        assert!(output.contains("Failed to connect to SQL Server at sql-a"));
    }

    #[tokio::test]
    async fn test_failure_aborts_and_still_closes() {
        // Statement 2 is the second insert.
        let connector = MemoryConnector::new().fail_statement(2);
        let (summary, output) = run(&config(5, false), &connector).await;

        assert_eq!(connector.statements().len(), 3);
        assert_eq!(summary.writes, 1);
        assert_eq!(summary.reads, 1);
        assert!(summary.error.is_some());
        assert!(output.contains("connection reset on statement 2"));
        assert_eq!(connector.close_count(), 1);
        assert!(!connector.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_only_between_iterations() {
        let mut config = config(3, true);
        config.pause = Duration::from_millis(500);
        let connector = MemoryConnector::new();

        let started = tokio::time::Instant::now();
        run(&config, &connector).await;

        // Two pauses for three iterations; a trailing pause would reach 1500ms.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");
    }
}
