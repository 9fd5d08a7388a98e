//! Terminal platform shell: CLI, event loop, effect execution, logging,
//! session storage, and panel rendering.

mod app;
mod commands;
mod effects;
mod logging;
mod session;
mod ui;

pub use app::run_app;
