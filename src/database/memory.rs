use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{DataSource, NewDataSource};
use crate::database::store::DataSourceStore;

/// In-process `DataSourceStore` used by tests and `--memory` runs.
///
/// Ids start at 1 and increase by one per insert, mirroring a fresh
/// `BIGSERIAL` column.
#[derive(Default)]
pub struct MemoryDataSourceStore {
    rows: RwLock<Vec<DataSource>>,
}

impl MemoryDataSourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: i64) -> Option<DataSource> {
        self.rows.read().await.iter().find(|row| row.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl DataSourceStore for MemoryDataSourceStore {
    async fn insert(&self, record: NewDataSource) -> Result<i64, DatabaseError> {
        let mut rows = self.rows.write().await;
        let id = rows.last().map(|row| row.id + 1).unwrap_or(1);
        let now = Utc::now();

        rows.push(DataSource {
            id,
            name: record.name,
            source_type: record.source_type,
            uri: record.uri,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        Ok(id)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
