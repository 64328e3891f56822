//! 领域枚举

mod store_category;
mod store_status;
mod store_type;

pub use store_category::*;
pub use store_status::*;
pub use store_type::*;
