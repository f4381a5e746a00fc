// Library surface for headless/integration tests and reuse.
// main.rs only owns the terminal, the tokio runtime and CLI parsing.
pub mod app;
pub mod app_dirs;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod profile;
pub mod runtime;
pub mod ui;
pub mod units;
pub mod video;
pub mod workflow;
