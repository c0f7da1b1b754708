//! Lock file management for single-instance enforcement.
//!
//! A lock file in the runtime directory ensures only one daemon runs at a
//! time. The file holds the owning PID (and custom config dir, if any) so
//! `--reload` can find the running instance and stale locks from crashed
//! processes can be cleaned up.

use anyhow::Result;
use fs2::FileExt;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

use crate::config;

fn lock_path() -> String {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    format!("{runtime_dir}/adhanr.lock")
}

/// Whether a process with this PID exists.
fn is_process_running(pid: u32) -> bool {
    // Signal 0 probes for existence without delivering anything
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

fn write_lock_info(mut lock_file: &File) -> Result<()> {
    lock_file.set_len(0)?;
    lock_file.seek(SeekFrom::Start(0))?;

    writeln!(lock_file, "{}", std::process::id())?;
    // Config directory on the second line, empty when using the default
    if let Some(ref dir) = config::get_custom_config_dir() {
        writeln!(lock_file, "{}", dir.display())?;
    } else {
        writeln!(lock_file)?;
    }
    lock_file.flush()?;
    Ok(())
}

/// Acquire an exclusive lock on the lock file.
///
/// # Returns
/// - `Ok((lock_file, lock_path))` if the lock was acquired
/// - `Err(_)` on I/O failure
/// - Never returns if another live instance holds the lock (exits with a
///   suggestion to use `adhanr --reload`)
pub fn acquire_lock() -> Result<(File, String)> {
    let lock_path = lock_path();

    // Open without truncating so a holder's content survives a failed probe
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)?;

    match lock_file.try_lock_exclusive() {
        Ok(()) => {
            write_lock_info(&lock_file)?;
            Ok((lock_file, lock_path))
        }
        Err(_) => {
            // handle_lock_conflict returns only when the lock was stale
            handle_lock_conflict(&lock_path)?;

            let retry_lock_file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(&lock_path)?;

            match retry_lock_file.try_lock_exclusive() {
                Ok(()) => {
                    write_lock_info(&retry_lock_file)?;
                    Ok((retry_lock_file, lock_path))
                }
                Err(e) => {
                    log_error_exit!("Failed to acquire lock after cleanup attempt: {}", e);
                    std::process::exit(crate::constants::EXIT_FAILURE);
                }
            }
        }
    }
}

/// Handle lock file conflicts.
///
/// Removes stale lock files whose owner is gone; exits with guidance when
/// a live instance is running.
fn handle_lock_conflict(lock_path: &str) -> Result<()> {
    let lock_content = match std::fs::read_to_string(lock_path) {
        Ok(content) => content,
        // Lock file vanished or is unreadable, assume cleaned up
        Err(_) => return Ok(()),
    };

    let pid = match lock_content.lines().next().and_then(|l| l.trim().parse::<u32>().ok()) {
        Some(pid) => pid,
        None => {
            log_warning!("Lock file contains invalid PID, removing stale lock");
            let _ = std::fs::remove_file(lock_path);
            return Ok(());
        }
    };

    if !is_process_running(pid) {
        log_warning!("Removing stale lock file (process {pid} no longer running)");
        let _ = std::fs::remove_file(lock_path);
        return Ok(());
    }

    log_pipe!();
    log_error!("adhanr is already running (PID: {pid})");
    log_block_start!("Did you mean to:");
    log_indented!("• Reload configuration: adhanr --reload");
    log_indented!("• Show today's times: adhanr --times");
    log_block_start!("Cannot start - another adhanr instance is running");
    log_end!();
    std::process::exit(crate::constants::EXIT_FAILURE)
}

/// PID of the running daemon, read from the lock file.
///
/// Returns `None` if no lock file exists or its owner is gone.
pub fn get_running_pid() -> Option<u32> {
    let content = std::fs::read_to_string(lock_path()).ok()?;
    let pid = content.lines().next()?.trim().parse::<u32>().ok()?;
    is_process_running(pid).then_some(pid)
}

/// Release the lock file on shutdown.
pub fn release_lock(lock_file: File, lock_path: &str) {
    drop(lock_file);
    let _ = std::fs::remove_file(lock_path);
}
