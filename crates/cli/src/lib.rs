mod app;
pub mod command;
pub mod logger;

/// Re-exports.
pub use app::{Args, RunCmd};
