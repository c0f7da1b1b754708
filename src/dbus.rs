//! D-Bus system event monitoring.
//!
//! Two systemd-logind streams feed the main loop's signal channel:
//! - PrepareForSleep on the Manager interface (suspend/resume)
//! - Lock/Unlock on the caller's Session (countdown cadence switching)
//!
//! zbus's blocking API is used throughout; each stream runs in its own
//! thread and forwards events as [`SignalMessage`]s. Everything degrades
//! gracefully: without logind the daemon simply loses resume detection
//! and cadence switching.

use anyhow::{Context, Result};
use std::sync::mpsc::Sender;
use std::thread;
use zbus::blocking::Connection;

use crate::signals::SignalMessage;

const MAX_THREAD_RESTARTS: u8 = 3;
const RESTART_DELAY_MS: u64 = 2000;

/// D-Bus proxy trait for the systemd-logind Manager interface.
#[zbus::proxy(
    interface = "org.freedesktop.login1.Manager",
    default_service = "org.freedesktop.login1",
    default_path = "/org/freedesktop/login1"
)]
trait LogindManager {
    /// PrepareForSleep signal: `start` is true when suspending and false
    /// when resuming.
    #[zbus(signal)]
    fn prepare_for_sleep(&self, start: bool) -> zbus::Result<()>;
}

/// D-Bus proxy trait for the caller's logind Session.
///
/// logind resolves `session/auto` to the session of the calling process.
#[zbus::proxy(
    interface = "org.freedesktop.login1.Session",
    default_service = "org.freedesktop.login1",
    default_path = "/org/freedesktop/login1/session/auto"
)]
trait LogindSession {
    #[zbus(signal)]
    fn lock(&self) -> zbus::Result<()>;

    #[zbus(signal)]
    fn unlock(&self) -> zbus::Result<()>;
}

/// Start sleep/resume monitoring in a dedicated thread.
///
/// If the D-Bus connection drops, the monitor restarts up to
/// `MAX_THREAD_RESTARTS` times before giving up.
pub fn start_sleep_resume_monitor(
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
) -> Result<()> {
    spawn_sleep_monitor(signal_sender, debug_enabled, 0);
    Ok(())
}

fn spawn_sleep_monitor(signal_sender: Sender<SignalMessage>, debug_enabled: bool, restart_count: u8) {
    thread::spawn(move || {
        match monitor_sleep_signals(signal_sender.clone(), debug_enabled) {
            Ok(_) => {
                if debug_enabled {
                    log_pipe!();
                    log_debug!("Sleep monitor thread exiting normally");
                }
            }
            Err(e) => {
                log_pipe!();
                log_warning!("Sleep monitor error: {}", e);

                if restart_count < MAX_THREAD_RESTARTS {
                    log_indented!(
                        "Will restart D-Bus monitor (attempt {}/{})",
                        restart_count + 1,
                        MAX_THREAD_RESTARTS
                    );
                    thread::sleep(std::time::Duration::from_millis(RESTART_DELAY_MS));
                    spawn_sleep_monitor(signal_sender, debug_enabled, restart_count + 1);
                } else {
                    log_indented!("Maximum restart attempts reached for sleep monitor");
                    log_indented!("Sleep/resume detection will not be available");
                }
            }
        }
    });
}

/// Monitor PrepareForSleep signals on the system bus.
fn monitor_sleep_signals(signal_sender: Sender<SignalMessage>, debug_enabled: bool) -> Result<()> {
    let connection = Connection::system().context("Failed to connect to system D-Bus")?;

    if debug_enabled {
        log_debug!("Connected to system D-Bus successfully");
    }

    let logind_proxy =
        LogindManagerProxyBlocking::new(&connection).context("Failed to create logind proxy")?;

    let mut sleep_signals = logind_proxy
        .receive_prepare_for_sleep()
        .context("Failed to subscribe to PrepareForSleep signals")?;

    if debug_enabled {
        log_debug!("Subscribed to systemd-logind PrepareForSleep signals");
    }

    loop {
        match sleep_signals.next() {
            Some(signal) => match signal.args() {
                Ok(args) => {
                    let going_to_sleep: bool = args.start;

                    if going_to_sleep {
                        log_pipe!();
                        log_info!("System entering sleep/suspend mode");
                    } else {
                        log_pipe!();
                        log_info!("System resuming from sleep/suspend - refreshing schedule");
                    }

                    if signal_sender
                        .send(SignalMessage::Sleep {
                            resuming: !going_to_sleep,
                        })
                        .is_err()
                    {
                        // Channel disconnected, main thread is exiting
                        return Ok(());
                    }
                }
                Err(e) => {
                    log_pipe!();
                    log_warning!("Failed to parse PrepareForSleep signal args: {}", e);
                    log_indented!("Continuing to monitor for future signals...");
                }
            },
            None => {
                log_pipe!();
                return Err(anyhow::anyhow!(
                    "D-Bus connection lost - PrepareForSleep signal stream ended"
                ));
            }
        }
    }
}

/// Start session lock monitoring in dedicated threads.
///
/// Lock and Unlock are separate signals, so each stream gets its own
/// thread feeding the shared channel.
pub fn start_session_lock_monitor(
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
) -> Result<()> {
    let connection = Connection::system().context("Failed to connect to system D-Bus")?;
    let session_proxy =
        LogindSessionProxyBlocking::new(&connection).context("Failed to create session proxy")?;

    let mut lock_signals = session_proxy
        .receive_lock()
        .context("Failed to subscribe to session Lock signals")?;
    let mut unlock_signals = session_proxy
        .receive_unlock()
        .context("Failed to subscribe to session Unlock signals")?;

    if debug_enabled {
        log_debug!("Subscribed to logind session Lock/Unlock signals");
    }

    let lock_sender = signal_sender.clone();
    thread::spawn(move || {
        while lock_signals.next().is_some() {
            log_pipe!();
            log_info!("Session locked - slowing countdown updates");
            if lock_sender
                .send(SignalMessage::SessionLock { locked: true })
                .is_err()
            {
                break;
            }
        }
    });

    thread::spawn(move || {
        while unlock_signals.next().is_some() {
            log_pipe!();
            log_info!("Session unlocked - resuming countdown updates");
            if signal_sender
                .send(SignalMessage::SessionLock { locked: false })
                .is_err()
            {
                break;
            }
        }
    });

    Ok(())
}
