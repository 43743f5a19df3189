//! SQL Server access for dbtest.
//!
//! - [`target`] - failover-aware server selection and driver configuration
//! - [`store`] - the [`DemoStore`] / [`Connector`] traits and [`DemoRecord`]
//! - [`SqlServerConnector`] - TDS connections via `tiberius`
//! - [`memory`] - in-memory store for dry runs and tests

pub mod error;
pub mod memory;
mod sqlserver;
pub mod store;
pub mod target;

pub use error::DemoStoreError;
pub use sqlserver::{
    SqlServerConnector, SqlServerDemoStore, INSERT_DEMO_SQL, SELECT_LATEST_DEMO_SQL,
};
pub use store::{Connector, DemoRecord, DemoStore};
pub use target::{select_server, ConnectionTarget, ServerAddress, DEFAULT_PORT};
