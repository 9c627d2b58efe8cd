pub mod create;

// Re-export handler functions for use in routing
pub use create::create as datasource_create;
