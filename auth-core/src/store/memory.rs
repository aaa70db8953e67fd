use super::UserSource;
use crate::error::StoreError;
use crate::model::UserRecord;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process row table.
///
/// Rows are kept as inserted, without a uniqueness index, so the table can
/// hold the same broken states a real database could.
#[derive(Clone, Default)]
pub struct InMemorySource {
    rows: Arc<RwLock<Vec<UserRecord>>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<UserRecord>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    /// Appends a raw row without checking for an existing username
    pub async fn insert_row(&self, record: UserRecord) {
        self.rows.write().await.push(record);
    }

    /// Replaces every row for the record's username with `record`
    pub async fn upsert(&self, record: UserRecord) {
        let mut rows = self.rows.write().await;
        rows.retain(|row| row.username() != record.username());
        rows.push(record);
    }

    /// Removes every row for `username`, returning how many were dropped
    pub async fn remove(&self, username: &str) -> usize {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.username() != username);
        before - rows.len()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl UserSource for InMemorySource {
    async fn select_by_username(&self, username: &str) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|row| row.username() == username)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }
}
