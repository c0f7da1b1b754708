//! Implementation of the `--reload` command.
//!
//! Signals a running adhanr daemon (found via the lock file) to reload its
//! configuration with SIGUSR2.

use anyhow::Result;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use crate::lock;

/// Handle the `--reload` command.
pub fn handle_reload_command() -> Result<()> {
    log_version!();

    match lock::get_running_pid() {
        Some(pid) => {
            log_block_start!("Signaling running adhanr to reload...");
            match kill(Pid::from_raw(pid as i32), Signal::SIGUSR2) {
                Ok(_) => {
                    log_decorated!("Sent reload signal to adhanr (PID: {pid})");
                    log_indented!("Running instance will reload its configuration");
                }
                Err(e) => {
                    log_pipe!();
                    log_error!("Failed to signal running instance: {e}");
                }
            }
        }
        None => {
            log_pipe!();
            log_warning!("No running adhanr instance found");
            log_indented!("Start one with: adhanr");
        }
    }

    log_end!();
    Ok(())
}
