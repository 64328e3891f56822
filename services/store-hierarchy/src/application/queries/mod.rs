//! Queries

mod store_queries;

pub use store_queries::*;
