//! # Adhanr Library
//!
//! Internal library for the adhanr binary application.
//!
//! This library exists to enable testing of complex internals and provide
//! clean separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Adhanr` struct provides the daemon API with resource
//!   management
//! - **Core Logic**: Internal `core` module contains the main loop and state
//!   management
//! - **Calculation**: `solar` for astronomy primitives, `prayers` for the
//!   daily schedule and live tracking, `hijri` for the Islamic calendar
//! - **Configuration**: `config` module for TOML-based settings with
//!   SIGUSR2-triggered reload
//! - **Commands**: `commands` module for one-shot CLI actions (times,
//!   calendar, reload, simulate)
//! - **Notifications**: `notify` module for desktop alerts and the
//!   persistent countdown
//! - **Infrastructure**: Signal handling, D-Bus monitoring, logging, and the
//!   swappable time source

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

// Public API modules
pub mod args;
pub mod clock;
pub mod commands;
pub mod config;
pub mod constants;
pub mod hijri;
pub mod notify;
pub mod prayers;
pub mod signals;
pub mod solar;
pub mod time_source;

// Internal modules
mod adhanr;
mod core;
pub(crate) mod dbus;
pub(crate) mod lock;

// Re-export for binary
pub use adhanr::Adhanr;
