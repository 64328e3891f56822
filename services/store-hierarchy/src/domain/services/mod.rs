//! 领域服务

mod code_allocator;

pub use code_allocator::*;
