pub mod ingest;
pub mod models;
pub mod store;
