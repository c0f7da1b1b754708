//! Command-line command handlers for adhanr.
//!
//! This module contains implementations for one-shot CLI commands like
//! `--times` and `--reload`. Each command is implemented in its own submodule
//! to keep the code organized and maintainable.

pub mod calendar;
pub mod reload;
pub mod simulate;
pub mod times;
