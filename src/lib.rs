//! Offline weather dashboard for the terminal.
//!
//! Library surface exists for the binary in `main.rs` and the integration
//! tests; nothing here is meant as a stable public API.

pub mod app;
pub mod cli;
pub mod clock;
pub mod directory;
pub mod geo;
pub mod ui;
pub mod weather;
