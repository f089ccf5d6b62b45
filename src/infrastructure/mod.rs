// Infrastructure layer - batching, config and in-memory data access
pub mod batch;
pub mod config;
pub mod memory_reader;
