pub mod app;
pub mod format;
pub mod rates;
pub mod report;

pub use app::{OutputFormat, RunOptions, run};
