pub mod core;
pub mod embed;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod store;
