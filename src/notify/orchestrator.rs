//! Notification scheduling over tracked schedule state.
//!
//! On entering a new period the orchestrator fires a one-shot alert (for
//! the five announcing prayers) and immediately seeds the countdown, then
//! refreshes the countdown on a cadence. The cadence slows while the
//! session is locked so a hidden notification is not redrawn every second.

use std::collections::HashMap;

use super::NotificationSink;
use crate::constants::{
    COUNTDOWN_ACTIVE_INTERVAL_MS, COUNTDOWN_LOCKED_INTERVAL_MS, DEFAULT_ALERT_SOUND,
};
use crate::prayers::Prayer;
use crate::prayers::tracker::TrackedPrayer;

/// Countdown refresh rate, keyed to session lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Active,
    Locked,
}

impl Cadence {
    pub fn interval_ms(self) -> i64 {
        match self {
            Cadence::Active => COUNTDOWN_ACTIVE_INTERVAL_MS,
            Cadence::Locked => COUNTDOWN_LOCKED_INTERVAL_MS,
        }
    }
}

/// Per-prayer alert sound selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundChoice {
    pub enabled: bool,
    pub sound: Option<String>,
}

/// Resolved sound preferences: a default sound name plus per-prayer
/// overrides. A disabled entry silences that prayer's alert audio; the
/// alert itself still shows.
#[derive(Debug, Clone)]
pub struct SoundPrefs {
    default_sound: String,
    overrides: HashMap<Prayer, SoundChoice>,
}

impl Default for SoundPrefs {
    fn default() -> Self {
        Self {
            default_sound: DEFAULT_ALERT_SOUND.to_string(),
            overrides: HashMap::new(),
        }
    }
}

impl SoundPrefs {
    pub fn new(default_sound: impl Into<String>) -> Self {
        Self {
            default_sound: default_sound.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn set(&mut self, prayer: Prayer, choice: SoundChoice) {
        self.overrides.insert(prayer, choice);
    }

    /// Sound-name hint for a prayer's alert, or `None` for a silent alert.
    pub fn resolve(&self, prayer: Prayer) -> Option<String> {
        match self.overrides.get(&prayer) {
            Some(choice) if !choice.enabled => None,
            Some(choice) => Some(
                choice
                    .sound
                    .clone()
                    .unwrap_or_else(|| self.default_sound.clone()),
            ),
            None => Some(self.default_sound.clone()),
        }
    }
}

/// Drives alerts and the countdown from successive tracker snapshots.
pub struct Orchestrator {
    sink: Box<dyn NotificationSink>,
    sounds: SoundPrefs,
    enabled: bool,
    cadence: Cadence,
    current: Option<Prayer>,
    alert_sent: bool,
    countdown_active: bool,
    last_countdown_ms: Option<i64>,
}

impl Orchestrator {
    pub fn new(sink: Box<dyn NotificationSink>, sounds: SoundPrefs, enabled: bool) -> Self {
        Self {
            sink,
            sounds,
            enabled,
            cadence: Cadence::Active,
            current: None,
            alert_sent: false,
            countdown_active: false,
            last_countdown_ms: None,
        }
    }

    /// Feed one tracker snapshot, taken at `epoch_ms`.
    ///
    /// Alerts fire once per period entry; a failed alert is retried on the
    /// next snapshot. The first countdown after a successful alert is
    /// pushed immediately rather than waiting out a cadence interval.
    pub fn observe(&mut self, tracked: &TrackedPrayer, epoch_ms: i64) {
        if self.current != Some(tracked.current) {
            self.current = Some(tracked.current);
            // Drop the previous period's countdown so a failed alert
            // cannot leave a stale one on screen
            self.dismiss();
            // Markers like Sunrise and Zawal enter silently
            self.alert_sent = !tracked.current.announces();
        }

        if !self.enabled {
            return;
        }

        if !self.alert_sent {
            let prayer = tracked.current;
            match self
                .sink
                .send_alert(prayer, self.sounds.resolve(prayer).as_deref())
            {
                Ok(()) => {
                    self.alert_sent = true;
                    self.push_countdown(tracked, epoch_ms);
                }
                Err(e) => log_warning!("Failed to send {} alert: {}", prayer, e),
            }
            return;
        }

        let due = match self.last_countdown_ms {
            None => true,
            Some(last) => epoch_ms - last >= self.cadence.interval_ms(),
        };
        if due {
            self.push_countdown(tracked, epoch_ms);
        }
    }

    fn push_countdown(&mut self, tracked: &TrackedPrayer, epoch_ms: i64) {
        // Keep the cadence even on failure so a dead server is not hammered
        self.last_countdown_ms = Some(epoch_ms);
        match self
            .sink
            .update_countdown(tracked.next, &tracked.remaining_clock())
        {
            Ok(()) => self.countdown_active = true,
            Err(e) => log_debug!("Countdown update failed: {}", e),
        }
    }

    /// Switch countdown refresh rate. Returning to the active cadence
    /// pushes a fresh countdown on the next snapshot.
    pub fn set_cadence(&mut self, cadence: Cadence) {
        if self.cadence != cadence {
            self.cadence = cadence;
            if cadence == Cadence::Active {
                self.last_countdown_ms = None;
            }
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Apply a reloaded configuration.
    pub fn apply_config(&mut self, enabled: bool, sounds: SoundPrefs) {
        self.sounds = sounds;
        if self.enabled && !enabled {
            self.dismiss();
        }
        self.enabled = enabled;
    }

    /// Remove the countdown notification, if any. Called at shutdown.
    pub fn dismiss(&mut self) {
        if self.countdown_active {
            if let Err(e) = self.sink.dismiss_countdown() {
                log_debug!("Failed to dismiss countdown: {}", e);
            }
            self.countdown_active = false;
        }
        self.last_countdown_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MockNotificationSink;
    use anyhow::anyhow;
    use chrono::{Duration, NaiveDate};

    fn snapshot(current: Prayer, next: Prayer, remaining_secs: i64) -> TrackedPrayer {
        let next_at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap();
        TrackedPrayer {
            current,
            next,
            next_at,
            remaining: Duration::seconds(remaining_secs),
            percentage_remaining: 50.0,
        }
    }

    #[test]
    fn alert_fires_once_per_period_with_immediate_countdown() {
        let mut sink = MockNotificationSink::new();
        sink.expect_send_alert()
            .withf(|p, s| *p == Prayer::Asr && *s == Some(DEFAULT_ALERT_SOUND))
            .times(1)
            .returning(|_, _| Ok(()));
        sink.expect_update_countdown()
            .withf(|p, r| *p == Prayer::Maghrib && r == "01:00:00")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut orch = Orchestrator::new(Box::new(sink), SoundPrefs::default(), true);
        let tracked = snapshot(Prayer::Asr, Prayer::Maghrib, 3600);
        orch.observe(&tracked, 0);
        // Same period, within the cadence interval: nothing new
        orch.observe(&tracked, 500);
    }

    #[test]
    fn countdown_refreshes_on_the_cadence() {
        let mut sink = MockNotificationSink::new();
        sink.expect_send_alert().times(1).returning(|_, _| Ok(()));
        sink.expect_update_countdown()
            .times(3)
            .returning(|_, _| Ok(()));

        let mut orch = Orchestrator::new(Box::new(sink), SoundPrefs::default(), true);
        let tracked = snapshot(Prayer::Asr, Prayer::Maghrib, 3600);
        orch.observe(&tracked, 0); // alert + seed countdown
        orch.observe(&tracked, 999); // not due
        orch.observe(&tracked, 1000); // due
        orch.observe(&tracked, 1500); // not due
        orch.observe(&tracked, 2100); // due
    }

    #[test]
    fn locked_cadence_slows_the_countdown() {
        let mut sink = MockNotificationSink::new();
        sink.expect_send_alert().times(1).returning(|_, _| Ok(()));
        sink.expect_update_countdown()
            .times(2)
            .returning(|_, _| Ok(()));

        let mut orch = Orchestrator::new(Box::new(sink), SoundPrefs::default(), true);
        let tracked = snapshot(Prayer::Asr, Prayer::Maghrib, 3600);
        orch.observe(&tracked, 0);
        orch.set_cadence(Cadence::Locked);
        orch.observe(&tracked, 5_000); // below the locked interval
        orch.observe(&tracked, 14_999);
        orch.observe(&tracked, 15_000); // due
    }

    #[test]
    fn unlock_pushes_a_prompt_refresh() {
        let mut sink = MockNotificationSink::new();
        sink.expect_send_alert().times(1).returning(|_, _| Ok(()));
        sink.expect_update_countdown()
            .times(2)
            .returning(|_, _| Ok(()));

        let mut orch = Orchestrator::new(Box::new(sink), SoundPrefs::default(), true);
        let tracked = snapshot(Prayer::Asr, Prayer::Maghrib, 3600);
        orch.observe(&tracked, 0);
        orch.set_cadence(Cadence::Locked);
        orch.observe(&tracked, 2_000); // locked, not due
        orch.set_cadence(Cadence::Active);
        orch.observe(&tracked, 2_500); // refresh immediately after unlock
    }

    #[test]
    fn markers_enter_without_an_alert() {
        let mut sink = MockNotificationSink::new();
        sink.expect_send_alert().times(0);
        sink.expect_update_countdown()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut orch = Orchestrator::new(Box::new(sink), SoundPrefs::default(), true);
        let tracked = snapshot(Prayer::Sunrise, Prayer::Zawal, 600);
        orch.observe(&tracked, 0);
    }

    #[test]
    fn failed_alert_is_retried_next_snapshot() {
        let mut sink = MockNotificationSink::new();
        let mut attempts = 0;
        sink.expect_send_alert().times(2).returning(move |_, _| {
            attempts += 1;
            if attempts == 1 {
                Err(anyhow!("bus gone"))
            } else {
                Ok(())
            }
        });
        sink.expect_update_countdown()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut orch = Orchestrator::new(Box::new(sink), SoundPrefs::default(), true);
        let tracked = snapshot(Prayer::Fajr, Prayer::Sunrise, 4800);
        orch.observe(&tracked, 0); // alert fails, no countdown yet
        orch.observe(&tracked, 1000); // alert retried, countdown seeded
    }

    #[test]
    fn period_change_dismisses_the_stale_countdown() {
        let mut sink = MockNotificationSink::new();
        sink.expect_send_alert()
            .withf(|p, _| *p == Prayer::Asr)
            .times(1)
            .returning(|_, _| Ok(()));
        sink.expect_update_countdown()
            .times(1)
            .returning(|_, _| Ok(()));
        // Entering Maghrib must dismiss the Asr-period countdown even
        // though the new alert fails and no fresh countdown replaces it
        sink.expect_dismiss_countdown()
            .times(1)
            .returning(|| Ok(()));
        sink.expect_send_alert()
            .withf(|p, _| *p == Prayer::Maghrib)
            .times(1)
            .returning(|_, _| Err(anyhow!("bus gone")));

        let mut orch = Orchestrator::new(Box::new(sink), SoundPrefs::default(), true);
        orch.observe(&snapshot(Prayer::Asr, Prayer::Maghrib, 3600), 0);
        orch.observe(&snapshot(Prayer::Maghrib, Prayer::Isha, 5400), 1000);
    }

    #[test]
    fn disabled_orchestrator_stays_silent() {
        let mut sink = MockNotificationSink::new();
        sink.expect_send_alert().times(0);
        sink.expect_update_countdown().times(0);

        let mut orch = Orchestrator::new(Box::new(sink), SoundPrefs::default(), false);
        let tracked = snapshot(Prayer::Asr, Prayer::Maghrib, 3600);
        orch.observe(&tracked, 0);
        orch.observe(&tracked, 5_000);
    }

    #[test]
    fn disabling_via_reload_dismisses_the_countdown() {
        let mut sink = MockNotificationSink::new();
        sink.expect_send_alert().times(1).returning(|_, _| Ok(()));
        sink.expect_update_countdown()
            .times(1)
            .returning(|_, _| Ok(()));
        sink.expect_dismiss_countdown()
            .times(1)
            .returning(|| Ok(()));

        let mut orch = Orchestrator::new(Box::new(sink), SoundPrefs::default(), true);
        let tracked = snapshot(Prayer::Asr, Prayer::Maghrib, 3600);
        orch.observe(&tracked, 0);
        orch.apply_config(false, SoundPrefs::default());
        orch.observe(&tracked, 5_000);
    }

    #[test]
    fn sound_prefs_resolve_overrides_and_silence() {
        let mut prefs = SoundPrefs::default();
        prefs.set(
            Prayer::Fajr,
            SoundChoice {
                enabled: true,
                sound: Some("bell".into()),
            },
        );
        prefs.set(
            Prayer::Isha,
            SoundChoice {
                enabled: false,
                sound: None,
            },
        );

        assert_eq!(prefs.resolve(Prayer::Fajr).as_deref(), Some("bell"));
        assert_eq!(
            prefs.resolve(Prayer::Dhuhr).as_deref(),
            Some(DEFAULT_ALERT_SOUND)
        );
        assert_eq!(prefs.resolve(Prayer::Isha), None);
    }
}
