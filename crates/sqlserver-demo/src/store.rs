//! Demo store trait and record type.
//!
//! The runner only ever talks to a [`DemoStore`], so the same loop works
//! against a real SQL Server ([`crate::SqlServerConnector`]) and against the
//! in-memory store used for dry runs and tests ([`crate::memory`]).

use crate::error::DemoStoreError;
use crate::target::ConnectionTarget;
use async_trait::async_trait;
use std::fmt;

/// One row of the `Demo` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoRecord {
    pub id: i32,
    pub name: Option<String>,
    pub content: Option<String>,
}

impl fmt::Display for DemoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.id,
            self.name.as_deref().unwrap_or("NULL"),
            self.content.as_deref().unwrap_or("NULL")
        )
    }
}

/// An open connection to the Demo table.
#[async_trait]
pub trait DemoStore: Send {
    /// Insert one row. Returns the number of rows affected.
    async fn insert_demo(&mut self, name: &str, content: &str) -> Result<u64, DemoStoreError>;

    /// Fetch the row with the highest `DemoId`, if the table has any rows.
    async fn latest_demo(&mut self) -> Result<Option<DemoRecord>, DemoStoreError>;

    /// Close the connection.
    async fn close(self: Box<Self>) -> Result<(), DemoStoreError>;
}

/// Opens [`DemoStore`] connections.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        target: &ConnectionTarget,
    ) -> Result<Box<dyn DemoStore>, DemoStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display() {
        let record = DemoRecord {
            id: 7,
            name: Some("2024-01-15T10:30:45.1234567+00:00".to_string()),
            content: None,
        };
        assert_eq!(
            record.to_string(),
            "7 2024-01-15T10:30:45.1234567+00:00 NULL"
        );
    }
}
