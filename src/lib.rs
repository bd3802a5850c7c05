pub mod api;
pub mod classify;
pub mod config;
pub mod convert;
pub mod entry;
pub mod errors;
pub mod filter;
pub mod patterns;
pub mod project;
pub mod prompt;
pub mod report;
pub mod transactions;
pub mod utils;
pub mod walk;

pub use gyou::Separator;
