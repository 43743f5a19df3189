//! dbtest: a SQL Server smoke-test utility.
//!
//! Connects to the primary (or, on failover, the secondary) server, then for
//! each iteration optionally inserts a timestamped row into `Demo`, reads the
//! most recent row back, and pauses.
//!
//! Settings come from an optional `appsettings.json` with environment
//! overrides (`db__userId` overrides `{"db": {"userId": ...}}`):
//!
//! | key                        | meaning                               |
//! |----------------------------|---------------------------------------|
//! | `iLoops`                   | iterations, must be greater than 1    |
//! | `iCliOverride`             | 1 to wait for Enter before exiting    |
//! | `isReadOnly`               | skip inserts                          |
//! | `iMsPause`                 | pause between iterations (ms)         |
//! | `isFailover`               | use `db:secondaryServer`              |
//! | `db:primaryServer`         | `host`, `host,port` or `host\inst`    |
//! | `db:secondaryServer`       | as above                              |
//! | `db:database`              | initial catalog                       |
//! | `db:userId`, `db:password` | SQL Server authentication             |
//! | `db:port`                  | default port (1433)                   |
//! | `db:trustServerCertificate`| skip certificate validation           |

pub mod app;
pub mod config;
pub mod report;
pub mod runner;
pub mod timestamp;

pub use app::{execute, AppError};
pub use config::{ConfigError, RunConfig};
pub use report::Reporter;
pub use runner::{RunSummary, Runner};
