//! Core application logic and state management.
//!
//! This module encapsulates the daemon's main loop. Each tick it reads the
//! clock, tracks where now falls in the day's schedule, and feeds the
//! result to the notification orchestrator. It also handles:
//!
//! - Date rollover (recomputing the schedule after midnight)
//! - Signal processing (SIGUSR2 reload, shutdown signals)
//! - Sleep/resume and session lock events from D-Bus
//! - System time anomalies (suspend gaps, clock jumps)
//!
//! The `Core` struct owns all runtime state; `CoreParams` bundles the
//! dependencies needed to build one.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::sync::atomic::Ordering;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use crate::{
    clock::ClockZone,
    config::{self, Config},
    constants::{TICK_INTERVAL_MS, TIME_ANOMALY_THRESHOLD_SECS},
    hijri::HijriDate,
    lock,
    logger::Log,
    notify::{Cadence, Orchestrator},
    prayers::{Prayer, PrayerTimes, calculator, tracker},
    signals::{SignalMessage, SignalState},
    time_source,
};

/// Parameters for creating a Core instance.
pub(crate) struct CoreParams {
    pub config: Config,
    pub clock: ClockZone,
    pub orchestrator: Orchestrator,
    pub signal_state: SignalState,
    pub debug_enabled: bool,
    pub lock_info: Option<(File, String)>,
}

/// Core state machine managing the main application loop.
pub(crate) struct Core {
    config: Config,
    clock: ClockZone,
    orchestrator: Orchestrator,
    signal_state: SignalState,
    debug_enabled: bool,
    lock_info: Option<(File, String)>,
    // Main loop persistent state
    schedule: PrayerTimes,
    schedule_date: NaiveDate,
    last_check: Option<NaiveDateTime>,
    current: Option<Prayer>,
}

fn compute_schedule(config: &Config, clock: &ClockZone, date: NaiveDate) -> PrayerTimes {
    calculator::calculate(
        date,
        &config.coordinates(),
        config.madhab(),
        clock.utc_offset_hours(date),
    )
}

impl Core {
    /// Create a new Core instance with today's schedule computed.
    pub fn new(params: CoreParams) -> Self {
        let schedule_date = params.clock.today();
        let schedule = compute_schedule(&params.config, &params.clock, schedule_date);

        Self {
            config: params.config,
            clock: params.clock,
            orchestrator: params.orchestrator,
            signal_state: params.signal_state,
            debug_enabled: params.debug_enabled,
            lock_info: params.lock_info,
            schedule,
            schedule_date,
            last_check: None,
            current: None,
        }
    }

    /// Execute the core application logic.
    pub fn execute(mut self) -> Result<()> {
        if let Some(custom_dir) = config::get_custom_config_dir() {
            log_block_start!("Base directory: {}", custom_dir.display());
        }

        self.log_schedule();

        self.main_loop()?;

        log_block_start!("Shutting down adhanr...");
        self.orchestrator.dismiss();

        if let Some((lock_file, lock_path)) = self.lock_info.take() {
            lock::release_lock(lock_file, &lock_path);
            if self.debug_enabled {
                log_decorated!("Lock file released");
            }
        }
        log_end!();

        Ok(())
    }

    /// Log the day's schedule with its Hijri date.
    fn log_schedule(&self) {
        let hijri = HijriDate::from_gregorian(self.schedule_date, self.config.hijri_adjustment());
        log_block_start!(
            "Prayer times for {} ({})",
            self.schedule_date.format("%A, %-d %B %Y"),
            hijri.format()
        );
        for (prayer, time) in self.schedule.iter() {
            log_indented!("{}: {}", prayer, time);
        }
        if let Ok(sehri) = calculator::sehri_end(&self.schedule.fajr) {
            log_indented!("Sehri ends: {}", sehri);
        }
    }

    fn main_loop(&mut self) -> Result<()> {
        let tick = Duration::from_millis(TICK_INTERVAL_MS);

        while self.signal_state.running.load(Ordering::SeqCst) && !time_source::simulation_ended()
        {
            if self.signal_state.needs_reload.swap(false, Ordering::SeqCst) {
                self.reload_config();
            }

            let now = self.clock.now();
            self.check_time_anomaly(now);
            self.last_check = Some(now);

            if now.date() != self.schedule_date {
                self.schedule_date = now.date();
                self.schedule = compute_schedule(&self.config, &self.clock, self.schedule_date);
                log_pipe!();
                log_info!("New day started, recomputing schedule");
                self.log_schedule();
            }

            self.track_tick(now, time_source::now().timestamp_millis());

            // Sleep with signal awareness using recv_timeout. This blocks
            // until either a signal arrives or the tick expires.
            let recv_result = if time_source::is_simulated() {
                // The simulated sleep scales time itself, so run it on a
                // side thread and poll the channel while it runs
                let sleep_handle = std::thread::spawn(move || {
                    time_source::sleep(tick);
                });

                loop {
                    match self
                        .signal_state
                        .signal_receiver
                        .recv_timeout(Duration::from_millis(10))
                    {
                        Ok(msg) => break Ok(msg),
                        Err(RecvTimeoutError::Timeout) => {
                            if sleep_handle.is_finished() {
                                break Err(RecvTimeoutError::Timeout);
                            }
                        }
                        Err(e) => break Err(e),
                    }
                }
            } else {
                self.signal_state.signal_receiver.recv_timeout(tick)
            };

            match recv_result {
                Ok(signal_msg) => {
                    let going_to_sleep =
                        matches!(signal_msg, SignalMessage::Sleep { resuming: false });

                    self.handle_signal_message(signal_msg)?;

                    // Nothing to track while the system is suspending
                    if going_to_sleep {
                        continue;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    // Normal tick
                }
                Err(RecvTimeoutError::Disconnected) => {
                    if !self.signal_state.running.load(Ordering::SeqCst) {
                        // Expected during graceful shutdown
                    } else {
                        log_pipe!();
                        log_error!("Signal handler disconnected unexpectedly");
                        log_indented!("Signals will no longer be processed");
                    }
                }
            }
        }

        Ok(())
    }

    /// Track one tick and feed the orchestrator.
    ///
    /// A tracking failure is logged and the tick skipped; the daemon keeps
    /// running and retries from the next tick's clock reading.
    fn track_tick(&mut self, now: NaiveDateTime, epoch_ms: i64) {
        let tracked = match tracker::track(&self.schedule, now) {
            Ok(tracked) => tracked,
            Err(e) => {
                log_pipe!();
                log_warning!("Schedule tracking failed, skipping tick: {e}");
                return;
            }
        };

        if self.current != Some(tracked.current) {
            self.current = Some(tracked.current);
            log_block_start!("Entered {} period", tracked.current);
            log_indented!(
                "Next: {} at {}",
                tracked.next,
                self.schedule.get(tracked.next)
            );
        }

        self.orchestrator.observe(&tracked, epoch_ms);
    }

    /// Detect suspend gaps and backwards clock jumps between ticks.
    ///
    /// Either case invalidates the cached schedule: refresh it and let the
    /// next tick re-track from the new clock.
    fn check_time_anomaly(&mut self, now: NaiveDateTime) {
        let Some(last) = self.last_check else {
            return;
        };
        let elapsed = now - last;

        if elapsed < chrono::Duration::zero()
            || elapsed.num_seconds() > TIME_ANOMALY_THRESHOLD_SECS
        {
            log_pipe!();
            log_warning!(
                "System time jumped {} (suspend or clock change), refreshing schedule",
                tracker::format_remaining(elapsed.abs())
            );
            self.schedule_date = now.date();
            self.schedule = compute_schedule(&self.config, &self.clock, self.schedule_date);
        }
    }

    fn handle_signal_message(&mut self, signal_msg: SignalMessage) -> Result<()> {
        match signal_msg {
            SignalMessage::Shutdown => {
                self.signal_state.running.store(false, Ordering::SeqCst);
            }
            SignalMessage::Reload => {
                self.reload_config();
            }
            SignalMessage::Sleep { resuming } => {
                if resuming {
                    // Skip the anomaly warning, the gap is expected
                    self.last_check = None;
                    self.signal_state.needs_reload.store(true, Ordering::SeqCst);
                }
            }
            SignalMessage::SessionLock { locked } => {
                self.orchestrator.set_cadence(if locked {
                    Cadence::Locked
                } else {
                    Cadence::Active
                });
            }
        }
        Ok(())
    }

    /// Reload configuration from disk and apply any changes.
    fn reload_config(&mut self) {
        match Config::load() {
            Ok(new_config) => {
                if new_config == self.config {
                    log_indented!("Configuration unchanged");
                    // The schedule may still be stale after a resume
                    self.schedule = compute_schedule(&self.config, &self.clock, self.schedule_date);
                    return;
                }

                match ClockZone::from_config(&new_config).context("Invalid timezone in new config")
                {
                    Ok(clock) => {
                        self.clock = clock;
                        Log::set_clock_timezone(clock.tz());
                    }
                    Err(e) => {
                        log_pipe!();
                        log_error!("Failed to apply reloaded config: {e}");
                        return;
                    }
                }

                self.orchestrator.apply_config(
                    new_config.notifications_enabled(),
                    new_config.sound_prefs(),
                );
                self.config = new_config;

                log_indented!("Configuration changed, applying changes...");
                self.config.log_config();

                self.schedule_date = self.clock.today();
                self.schedule = compute_schedule(&self.config, &self.clock, self.schedule_date);
                self.log_schedule();
            }
            Err(e) => {
                log_pipe!();
                log_error!("Failed to reload config: {e}");
            }
        }
    }
}
