pub mod calculations;
pub mod models;
pub mod tables;

pub use models::*;
pub use tables::{builtin_tables, check_windows, table_for_date};
