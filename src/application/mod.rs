// Application layer - aggregation algorithms and the streaming loader
pub mod aggregate;
pub mod cancel;
pub mod colors;
pub mod iterator;
pub mod layout;
pub mod loader;
pub mod sample_reader;
pub mod store;
