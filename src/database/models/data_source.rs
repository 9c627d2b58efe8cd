use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered data source row from `data_sources`.
///
/// `id` and the audit columns are owned by the storage layer; callers only
/// ever supply the fields in [`NewDataSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: i64,
    pub name: String,
    pub source_type: String,
    pub uri: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insert input for a data source. Every field defaults to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDataSource {
    pub name: String,
    pub source_type: String,
    pub uri: String,
}

impl NewDataSource {
    pub fn new(
        name: impl Into<String>,
        source_type: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            uri: uri.into(),
        }
    }
}
