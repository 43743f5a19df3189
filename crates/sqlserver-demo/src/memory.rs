//! In-memory Demo store.
//!
//! Behaves like a `Demo` table with an identity `DemoId` column and records
//! every statement it receives, so callers can assert on exactly what was
//! issued. Failures can be injected at connect time or on the nth statement.

use crate::error::DemoStoreError;
use crate::store::{Connector, DemoRecord, DemoStore};
use crate::target::ConnectionTarget;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// A statement received by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert { name: String, content: String },
    SelectLatest,
}

#[derive(Debug, Default)]
struct State {
    rows: Vec<DemoRecord>,
    next_id: i32,
    statements: Vec<Statement>,
    connects: usize,
    open: bool,
    closes: usize,
}

/// Connector handing out stores that share one in-memory table.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    state: Arc<Mutex<State>>,
    refuse_connect: bool,
    fail_statement: Option<usize>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every connection attempt, like an unreachable server.
    pub fn unreachable(mut self) -> Self {
        self.refuse_connect = true;
        self
    }

    /// Fail the statement with this zero-based index (counted across the
    /// lifetime of the connector).
    pub fn fail_statement(mut self, index: usize) -> Self {
        self.fail_statement = Some(index);
        self
    }

    /// Seed a row as if it had been inserted earlier.
    pub fn with_row(self, name: &str, content: &str) -> Self {
        {
            let mut state = lock(&self.state);
            state.next_id += 1;
            let id = state.next_id;
            state.rows.push(DemoRecord {
                id,
                name: Some(name.to_string()),
                content: Some(content.to_string()),
            });
        }
        self
    }

    /// Every statement issued so far, in order.
    pub fn statements(&self) -> Vec<Statement> {
        lock(&self.state).statements.clone()
    }

    pub fn insert_count(&self) -> usize {
        self.statements()
            .iter()
            .filter(|s| matches!(s, Statement::Insert { .. }))
            .count()
    }

    pub fn select_count(&self) -> usize {
        self.statements()
            .iter()
            .filter(|s| matches!(s, Statement::SelectLatest))
            .count()
    }

    /// Number of connection attempts, successful or not.
    pub fn connect_count(&self) -> usize {
        lock(&self.state).connects
    }

    pub fn close_count(&self) -> usize {
        lock(&self.state).closes
    }

    /// Whether a store handed out by this connector is still open.
    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    // A panic while holding the lock only happens in a failing test.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(
        &self,
        target: &ConnectionTarget,
    ) -> Result<Box<dyn DemoStore>, DemoStoreError> {
        let mut state = lock(&self.state);
        state.connects += 1;

        if self.refuse_connect {
            return Err(DemoStoreError::Connect {
                server: target.server.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ),
            });
        }

        state.open = true;
        Ok(Box::new(MemoryDemoStore {
            state: Arc::clone(&self.state),
            fail_statement: self.fail_statement,
        }))
    }
}

/// Store handed out by [`MemoryConnector`].
pub struct MemoryDemoStore {
    state: Arc<Mutex<State>>,
    fail_statement: Option<usize>,
}

impl MemoryDemoStore {
    fn record(&self, statement: Statement) -> Result<MutexGuard<'_, State>, DemoStoreError> {
        let mut state = lock(&self.state);
        let index = state.statements.len();
        state.statements.push(statement);

        if self.fail_statement == Some(index) {
            let io = std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                format!("connection reset on statement {index}"),
            );
            return Err(DemoStoreError::SqlServer(io.into()));
        }
        Ok(state)
    }
}

#[async_trait]
impl DemoStore for MemoryDemoStore {
    async fn insert_demo(&mut self, name: &str, content: &str) -> Result<u64, DemoStoreError> {
        let mut state = self.record(Statement::Insert {
            name: name.to_string(),
            content: content.to_string(),
        })?;

        state.next_id += 1;
        let id = state.next_id;
        state.rows.push(DemoRecord {
            id,
            name: Some(name.to_string()),
            content: Some(content.to_string()),
        });
        Ok(1)
    }

    async fn latest_demo(&mut self) -> Result<Option<DemoRecord>, DemoStoreError> {
        let state = self.record(Statement::SelectLatest)?;
        Ok(state.rows.iter().max_by_key(|r| r.id).cloned())
    }

    async fn close(self: Box<Self>) -> Result<(), DemoStoreError> {
        let mut state = lock(&self.state);
        state.open = false;
        state.closes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_latest_is_highest_id() {
        let connector = MemoryConnector::new().with_row("old", "old");
        let mut store = connector
            .connect(&ConnectionTarget::default())
            .await
            .unwrap();

        store.insert_demo("new", "new").await.unwrap();
        let latest = store.latest_demo().await.unwrap().unwrap();

        assert_eq!(latest.id, 2);
        assert_eq!(latest.name.as_deref(), Some("new"));
        store.close().await.unwrap();

        assert!(!connector.is_open());
        assert_eq!(connector.insert_count(), 1);
        assert_eq!(connector.select_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_table() {
        let connector = MemoryConnector::new();
        let mut store = connector
            .connect(&ConnectionTarget::default())
            .await
            .unwrap();

        assert_eq!(store.latest_demo().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreachable() {
        let connector = MemoryConnector::new().unreachable();
        let result = connector.connect(&ConnectionTarget::default()).await;

        assert!(matches!(result, Err(DemoStoreError::Connect { .. })));
        assert_eq!(connector.connect_count(), 1);
        assert!(!connector.is_open());
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let connector = MemoryConnector::new().fail_statement(1);
        let mut store = connector
            .connect(&ConnectionTarget::default())
            .await
            .unwrap();

        store.insert_demo("a", "a").await.unwrap();
        assert!(store.latest_demo().await.is_err());
        assert_eq!(connector.statements().len(), 2);
    }
}
