// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires config, logging and the terminal.
pub mod app;
pub mod app_dirs;
pub mod auth;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod materials;
pub mod playback;
pub mod profiles;
pub mod progress;
pub mod runtime;
pub mod scheduler;
pub mod specialization;
pub mod ui;
pub mod util;
