//! Error types for the Demo store.

use thiserror::Error;

/// Errors that can occur while talking to the database.
#[derive(Error, Debug)]
pub enum DemoStoreError {
    /// TCP connection to the server could not be established.
    #[error("Failed to connect to SQL Server at {server}: {source}")]
    Connect {
        server: String,
        #[source]
        source: std::io::Error,
    },

    /// Error reported by the SQL Server driver (login, statement, protocol).
    #[error("SQL Server error: {0}")]
    SqlServer(#[from] tiberius::error::Error),

    /// A row came back with a shape the Demo table should never produce.
    #[error("Unexpected Demo row: {0}")]
    UnexpectedRow(String),

    /// The server address could not be interpreted.
    #[error("Invalid server address '{0}'")]
    InvalidServer(String),
}
