//! Signal handling and inter-process communication.
//!
//! A background thread turns Unix signals into [`SignalMessage`]s on an
//! mpsc channel drained by the main loop. The same channel carries events
//! from the D-Bus monitors (sleep/resume, session lock), so the main loop
//! has a single place to react to the outside world.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

/// Unified message type for all signal-based communication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMessage {
    /// Configuration reload signal (SIGUSR2)
    Reload,
    /// Shutdown signal (SIGTERM, SIGINT, SIGHUP)
    Shutdown,
    /// Sleep event from logind (going to sleep or resuming)
    Sleep { resuming: bool },
    /// Session lock state change from logind
    SessionLock { locked: bool },
}

/// Signal handling state shared between threads.
pub struct SignalState {
    /// Atomic flag indicating if the application should keep running
    pub running: Arc<AtomicBool>,
    /// Channel receiver for unified signal messages
    pub signal_receiver: std::sync::mpsc::Receiver<SignalMessage>,
    /// Channel sender for unified signal messages (for D-Bus integration)
    pub signal_sender: std::sync::mpsc::Sender<SignalMessage>,
    /// Flag indicating the schedule needs recomputing after a reload
    pub needs_reload: Arc<AtomicBool>,
}

/// Set up signal handling for the application.
///
/// Spawns a background thread that monitors for signals and sends the
/// corresponding messages via the channel.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (signal_sender, signal_receiver) = std::sync::mpsc::channel::<SignalMessage>();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running_clone = running.clone();
    let signal_sender_clone = signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGUSR2 => {
                    log_pipe!();
                    log_info!("Received configuration reload signal");

                    if signal_sender_clone.send(SignalMessage::Reload).is_err() {
                        // Receiver dropped, main thread is exiting
                        break;
                    }
                }
                _ => {
                    let user_message = match sig {
                        SIGINT => {
                            if debug_enabled {
                                "Received SIGINT (Ctrl+C), initiating graceful shutdown..."
                            } else {
                                "Received interrupt signal, initiating graceful shutdown..."
                            }
                        }
                        SIGTERM => "Received termination request, initiating graceful shutdown...",
                        SIGHUP => "Received hangup signal, initiating graceful shutdown...",
                        _ => "Received shutdown signal, initiating graceful shutdown...",
                    };

                    log_pipe!();
                    log_info!("{}", user_message);

                    if let Err(e) = signal_sender_clone.send(SignalMessage::Shutdown) {
                        log_pipe!();
                        log_warning!("Failed to send shutdown message: {e}");
                    }

                    running_clone.store(false, Ordering::SeqCst);

                    // Keep processing signals so repeated Ctrl+C stays quiet
                }
            }
        }
    });

    Ok(SignalState {
        running,
        signal_receiver,
        signal_sender,
        needs_reload: Arc::new(AtomicBool::new(false)),
    })
}
