//! Night Run - endless runner for the terminal.
//!
//! The simulation (`game`) is independent of the terminal: it is stepped
//! with elapsed milliseconds and an RNG, which keeps it testable and lets
//! the headless simulator replay seeded games.

pub mod app;
pub mod audio;
pub mod build_info;
pub mod cli;
pub mod core;
pub mod game;
pub mod input;
pub mod logging;
pub mod menu;
pub mod persistence;
pub mod ui;

#[cfg(feature = "web")]
pub mod web;
