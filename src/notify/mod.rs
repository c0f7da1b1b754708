//! Desktop notification delivery.
//!
//! The orchestrator decides *when* to notify (period-entry alerts, the
//! persistent countdown) and a [`NotificationSink`] decides *how*. The
//! desktop sink talks to org.freedesktop.Notifications over the session
//! bus; the null sink swallows everything and backs disabled or headless
//! runs.

pub mod desktop;
pub mod orchestrator;

pub use desktop::DesktopSink;
pub use orchestrator::{Cadence, Orchestrator, SoundChoice, SoundPrefs};

use anyhow::Result;

use crate::prayers::Prayer;

/// Delivery backend for alerts and the countdown notification.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink {
    /// One-shot alert announcing that `prayer` has begun.
    ///
    /// `sound` is the freedesktop sound-name hint; `None` suppresses audio.
    /// The lifetime is named so automock can generate the mock.
    fn send_alert<'a>(&mut self, prayer: Prayer, sound: Option<&'a str>) -> Result<()>;

    /// Update the persistent countdown toward `next`, replacing any
    /// countdown shown previously.
    fn update_countdown(&mut self, next: Prayer, remaining: &str) -> Result<()>;

    /// Remove the countdown notification if one is showing.
    fn dismiss_countdown(&mut self) -> Result<()>;
}

/// Sink that discards everything. Used when notifications are disabled
/// and during simulations.
#[derive(Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn send_alert(&mut self, _prayer: Prayer, _sound: Option<&str>) -> Result<()> {
        Ok(())
    }

    fn update_countdown(&mut self, _next: Prayer, _remaining: &str) -> Result<()> {
        Ok(())
    }

    fn dismiss_countdown(&mut self) -> Result<()> {
        Ok(())
    }
}
