//! Session-bus notification sink.
//!
//! Speaks org.freedesktop.Notifications directly over zbus rather than
//! shelling out to notify-send, so the countdown can reuse one
//! notification id and replace itself in place instead of stacking.

use std::collections::HashMap;

use anyhow::{Context, Result};
use zbus::blocking::Connection;
use zbus::zvariant::Value;

use super::NotificationSink;
use crate::prayers::Prayer;

/// Milliseconds an alert stays on screen.
const ALERT_EXPIRE_MS: i32 = 10_000;
/// Countdown notifications never expire; they are replaced or dismissed.
const COUNTDOWN_EXPIRE_MS: i32 = 0;

const APP_NAME: &str = "adhanr";
const APP_ICON: &str = "appointment-soon";

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;

    fn close_notification(&self, id: u32) -> zbus::Result<()>;

    fn get_server_information(&self) -> zbus::Result<(String, String, String, String)>;
}

/// Sink backed by the session notification daemon.
pub struct DesktopSink {
    connection: Connection,
    /// Id of the live countdown notification, 0 when none is showing.
    countdown_id: u32,
}

impl DesktopSink {
    /// Connect to the session bus and verify a notification server is up.
    pub fn new() -> Result<Self> {
        let connection =
            Connection::session().context("Failed to connect to the session D-Bus")?;
        let proxy = NotificationsProxyBlocking::new(&connection)
            .context("Failed to create notifications proxy")?;
        let (name, _, version, _) = proxy
            .get_server_information()
            .context("No notification server is running")?;
        log_debug!("Notification server: {} v{}", name, version);

        Ok(Self {
            connection,
            countdown_id: 0,
        })
    }

    fn proxy(&self) -> Result<NotificationsProxyBlocking<'_>> {
        NotificationsProxyBlocking::new(&self.connection)
            .context("Failed to create notifications proxy")
    }
}

impl NotificationSink for DesktopSink {
    fn send_alert(&mut self, prayer: Prayer, sound: Option<&str>) -> Result<()> {
        let mut hints: HashMap<&str, Value<'_>> = HashMap::new();
        hints.insert("urgency", Value::from(1u8));
        match sound {
            Some(name) => {
                hints.insert("sound-name", Value::from(name));
            }
            None => {
                hints.insert("suppress-sound", Value::from(true));
            }
        }

        self.proxy()?
            .notify(
                APP_NAME,
                0,
                APP_ICON,
                &format!("{prayer} Prayer"),
                &format!("It is time for {prayer} prayer"),
                &[],
                hints,
                ALERT_EXPIRE_MS,
            )
            .with_context(|| format!("Failed to send {prayer} alert"))?;
        Ok(())
    }

    fn update_countdown(&mut self, next: Prayer, remaining: &str) -> Result<()> {
        let mut hints: HashMap<&str, Value<'_>> = HashMap::new();
        hints.insert("urgency", Value::from(0u8));
        hints.insert("suppress-sound", Value::from(true));
        hints.insert("transient", Value::from(true));

        let id = self
            .proxy()?
            .notify(
                APP_NAME,
                self.countdown_id,
                APP_ICON,
                &format!("{next} in {remaining}"),
                "",
                &[],
                hints,
                COUNTDOWN_EXPIRE_MS,
            )
            .context("Failed to update countdown notification")?;
        self.countdown_id = id;
        Ok(())
    }

    fn dismiss_countdown(&mut self) -> Result<()> {
        if self.countdown_id != 0 {
            self.proxy()?
                .close_notification(self.countdown_id)
                .context("Failed to dismiss countdown notification")?;
            self.countdown_id = 0;
        }
        Ok(())
    }
}
