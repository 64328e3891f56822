//! 值对象

mod business_number;
mod ids;
mod store_code;

pub use business_number::*;
pub use ids::*;
pub use store_code::*;
