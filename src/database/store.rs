use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::NewDataSource;

/// Persistence capability consumed by the data source handlers.
///
/// Implementations assign the identifier; callers never choose it.
#[async_trait]
pub trait DataSourceStore: Send + Sync {
    /// Insert a new data source and return its freshly assigned id
    async fn insert(&self, record: NewDataSource) -> Result<i64, DatabaseError>;

    /// Cheap connectivity probe used by `/health`
    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// `DataSourceStore` backed by the `data_sources` table in Postgres
#[derive(Clone)]
pub struct PgDataSourceStore {
    pool: PgPool,
}

impl PgDataSourceStore {
    const TABLE_NAME: &'static str = "data_sources";

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn insert_sql() -> String {
        format!(
            "INSERT INTO {} (name, source_type, uri, created_at, updated_at) \
             VALUES ($1, $2, $3, now(), now()) RETURNING id",
            Self::TABLE_NAME
        )
    }
}

#[async_trait]
impl DataSourceStore for PgDataSourceStore {
    async fn insert(&self, record: NewDataSource) -> Result<i64, DatabaseError> {
        let id: i64 = sqlx::query_scalar(&Self::insert_sql())
            .bind(&record.name)
            .bind(&record.source_type)
            .bind(&record.uri)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(id, source_type = %record.source_type, "Inserted data source");
        Ok(id)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
