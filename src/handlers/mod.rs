// handlers/mod.rs - HTTP handlers
//
// Public system endpoints (/, /health) and the data source API (/api/datasource/*).
pub mod datasource;
pub mod system;

pub use datasource::*;
pub use system::*;
