//! Commands

mod store_commands;

pub use store_commands::*;
