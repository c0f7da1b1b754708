//! Application coordinator that manages the complete daemon lifecycle.
//!
//! This module handles resource acquisition, initialization, and
//! orchestration of the core loop:
//! - Configuration loading
//! - Lock file management for single-instance enforcement
//! - Signal handler setup
//! - D-Bus monitors (sleep/resume, session lock)
//! - Notification sink selection
//!
//! The `Adhanr` struct uses a builder pattern to support different startup
//! contexts:
//! - Normal startup: `Adhanr::new(debug_enabled).run()`
//! - Simulation mode: `Adhanr::new(debug_enabled).without_lock().without_headers().run()`

use anyhow::Result;

use crate::{
    clock::ClockZone,
    config::Config,
    constants::EXIT_FAILURE,
    core::{Core, CoreParams},
    dbus, lock,
    logger::Log,
    notify::{DesktopSink, NotificationSink, NullSink, Orchestrator},
    signals::setup_signal_handler,
    time_source,
};

/// Builder for configuring and running the adhanr daemon.
pub struct Adhanr {
    debug_enabled: bool,
    create_lock: bool,
    show_headers: bool,
}

impl Adhanr {
    /// Create a new runner with defaults matching a normal run.
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            create_lock: true,
            show_headers: true,
        }
    }

    /// Skip lock file creation (simulation mode).
    pub fn without_lock(mut self) -> Self {
        self.create_lock = false;
        self
    }

    /// Skip header display.
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Execute the daemon with the configured settings.
    pub fn run(self) -> Result<()> {
        if self.show_headers {
            log_version!();
        }

        let config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                log_error_exit!("Configuration failed");
                eprintln!("{:?}", e);
                std::process::exit(EXIT_FAILURE);
            }
        };

        let clock = match ClockZone::from_config(&config) {
            Ok(clock) => clock,
            Err(e) => {
                log_error_exit!("Invalid timezone configuration");
                eprintln!("{:?}", e);
                std::process::exit(EXIT_FAILURE);
            }
        };
        // Simulation log lines carry both clock and local timestamps
        Log::set_clock_timezone(clock.tz());

        let lock_info = if self.create_lock {
            let (lock_file, lock_path) = lock::acquire_lock()?;
            log_block_start!("Lock acquired, starting adhanr...");
            Some((lock_file, lock_path))
        } else {
            None
        };

        let signal_state = setup_signal_handler(self.debug_enabled)?;

        // D-Bus monitors degrade gracefully without systemd or logind
        if let Err(e) =
            dbus::start_sleep_resume_monitor(signal_state.signal_sender.clone(), self.debug_enabled)
        {
            log_pipe!();
            log_warning!("D-Bus sleep/resume monitoring unavailable: {}", e);
            log_indented!("Sleep/resume detection will not work, but adhanr will continue normally");
        }
        if let Err(e) =
            dbus::start_session_lock_monitor(signal_state.signal_sender.clone(), self.debug_enabled)
        {
            log_pipe!();
            log_warning!("Session lock monitoring unavailable: {}", e);
            log_indented!("Countdown updates will keep the active cadence while locked");
        }

        config.log_config();

        let sink = self.select_sink(&config);
        let orchestrator = Orchestrator::new(
            sink,
            config.sound_prefs(),
            config.notifications_enabled() && !time_source::is_simulated(),
        );

        let core = Core::new(CoreParams {
            config,
            clock,
            orchestrator,
            signal_state,
            debug_enabled: self.debug_enabled,
            lock_info,
        });

        core.execute()?;

        Ok(())
    }

    /// Pick the notification backend for this run.
    ///
    /// Simulations and disabled notifications use the null sink; otherwise
    /// the desktop sink is attempted with graceful fallback.
    fn select_sink(&self, config: &Config) -> Box<dyn NotificationSink> {
        if !config.notifications_enabled() || time_source::is_simulated() {
            return Box::new(NullSink);
        }

        match DesktopSink::new() {
            Ok(sink) => Box::new(sink),
            Err(e) => {
                log_pipe!();
                log_warning!("Desktop notifications unavailable: {}", e);
                log_indented!("Prayer alerts will be logged only");
                Box::new(NullSink)
            }
        }
    }
}
