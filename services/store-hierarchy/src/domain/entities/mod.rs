//! 领域实体

mod store;

pub use store::*;
