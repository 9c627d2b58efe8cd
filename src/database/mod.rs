pub mod manager;
pub mod memory;
pub mod models;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryDataSourceStore;
pub use models::{DataSource, NewDataSource};
pub use store::{DataSourceStore, PgDataSourceStore};
