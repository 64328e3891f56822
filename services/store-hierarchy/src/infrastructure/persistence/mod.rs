//! 持久化实现

mod converters;
mod postgres;
mod rows;
mod schema;
mod store_sql;
mod tx_repositories;
mod unit_of_work;

pub use postgres::PostgresStoreRepository;
pub use schema::{migrations, run_migrations};
pub use unit_of_work::{PostgresUnitOfWork, PostgresUnitOfWorkFactory};
