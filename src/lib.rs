// Library surface for the binary and for headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod content;
pub mod history;
pub mod menu;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod typing_policy;
pub mod ui;
pub mod util;
