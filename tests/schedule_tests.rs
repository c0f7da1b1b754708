use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use adhanr::notify::{Cadence, NotificationSink, Orchestrator, SoundChoice, SoundPrefs};
use adhanr::prayers::{Coordinates, Madhab, Prayer, calculator, tracker};
use adhanr::prayers::tracker::TrackedPrayer;

fn mecca() -> Coordinates {
    Coordinates {
        latitude: 21.4225,
        longitude: 39.8262,
        altitude: 277.0,
    }
}

fn june_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Walk a full day at Mecca and check the tracked period sequence.
#[test]
fn full_day_period_sequence_at_mecca() {
    let schedule = calculator::calculate(june_first(), &mecca(), Madhab::Hanafi, 3.0);

    // Parse each announced instant and probe one minute after it
    let expected = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Zawal,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    for prayer in expected {
        let time = calculator::parse_time(schedule.get(prayer)).unwrap();
        let probe = june_first().and_time(time) + Duration::minutes(1);
        let tracked = tracker::track(&schedule, probe).unwrap();
        assert_eq!(
            tracked.current, prayer,
            "one minute after {prayer} the period should be {prayer}"
        );
    }
}

/// Just before Fajr the current period is still yesterday's Isha.
#[test]
fn pre_dawn_belongs_to_isha() {
    let schedule = calculator::calculate(june_first(), &mecca(), Madhab::Hanafi, 3.0);
    let fajr = calculator::parse_time(&schedule.fajr).unwrap();
    let probe = june_first().and_time(fajr) - Duration::minutes(10);

    let tracked = tracker::track(&schedule, probe).unwrap();
    assert_eq!(tracked.current, Prayer::Isha);
    assert_eq!(tracked.next, Prayer::Fajr);
    assert_eq!(tracked.remaining, Duration::minutes(10));
}

/// The countdown clock string shrinks monotonically within a period.
#[test]
fn countdown_shrinks_through_a_period() {
    let schedule = calculator::calculate(june_first(), &mecca(), Madhab::Shafi, 3.0);
    let dhuhr = calculator::parse_time(&schedule.dhuhr).unwrap();
    let base = june_first().and_time(dhuhr);

    let mut previous = Duration::hours(25);
    for minutes in [1, 30, 60, 90] {
        let tracked = tracker::track(&schedule, base + Duration::minutes(minutes)).unwrap();
        assert_eq!(tracked.current, Prayer::Dhuhr);
        assert!(tracked.remaining < previous);
        previous = tracked.remaining;
    }
}

// Recording sink for observing the orchestrator from outside the crate.

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Alert(Prayer, Option<String>),
    Countdown(Prayer, String),
    Dismiss,
}

#[derive(Clone, Default)]
struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<Event> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}

impl NotificationSink for RecordingSink {
    fn send_alert(&mut self, prayer: Prayer, sound: Option<&str>) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(Event::Alert(prayer, sound.map(str::to_string)));
        Ok(())
    }

    fn update_countdown(&mut self, next: Prayer, remaining: &str) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(Event::Countdown(next, remaining.to_string()));
        Ok(())
    }

    fn dismiss_countdown(&mut self) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(Event::Dismiss);
        Ok(())
    }
}

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

/// Entering an announced period fires one alert plus an immediate
/// countdown, then refreshes the countdown on the active cadence.
#[test]
fn orchestrator_alert_and_cadence_flow() {
    let sink = RecordingSink::default();
    let mut orchestrator = Orchestrator::new(
        Box::new(sink.clone()),
        SoundPrefs::default(),
        true,
    );

    orchestrator.observe(&snapshot(Prayer::Maghrib, Prayer::Isha, 5400), 0);
    assert_eq!(
        sink.take(),
        vec![
            Event::Alert(Prayer::Maghrib, Some("alarm-clock-elapsed".to_string())),
            Event::Countdown(Prayer::Isha, "01:30:00".to_string()),
        ]
    );

    // Within the active interval nothing new is pushed
    orchestrator.observe(&snapshot(Prayer::Maghrib, Prayer::Isha, 5399), 500);
    assert_eq!(sink.take(), vec![]);

    // After the interval the countdown refreshes, without a second alert
    orchestrator.observe(&snapshot(Prayer::Maghrib, Prayer::Isha, 5398), 1100);
    assert_eq!(
        sink.take(),
        vec![Event::Countdown(Prayer::Isha, "01:29:58".to_string())]
    );
}

/// Markers enter silently; a locked session slows the countdown cadence.
#[test]
fn orchestrator_markers_and_lock_cadence() {
    let sink = RecordingSink::default();
    let mut orchestrator = Orchestrator::new(
        Box::new(sink.clone()),
        SoundPrefs::default(),
        true,
    );

    // Sunrise is a marker, so no alert, but the countdown still runs
    orchestrator.observe(&snapshot(Prayer::Sunrise, Prayer::Zawal, 7200), 0);
    assert_eq!(
        sink.take(),
        vec![Event::Countdown(Prayer::Zawal, "02:00:00".to_string())]
    );

    orchestrator.set_cadence(Cadence::Locked);
    assert_eq!(orchestrator.cadence(), Cadence::Locked);

    // Locked cadence skips the one-second refresh entirely
    orchestrator.observe(&snapshot(Prayer::Sunrise, Prayer::Zawal, 7195), 5_000);
    orchestrator.observe(&snapshot(Prayer::Sunrise, Prayer::Zawal, 7190), 10_000);
    assert_eq!(sink.take(), vec![]);

    orchestrator.observe(&snapshot(Prayer::Sunrise, Prayer::Zawal, 7184), 16_000);
    assert_eq!(
        sink.take(),
        vec![Event::Countdown(Prayer::Zawal, "01:59:44".to_string())]
    );
}

/// Per-prayer sound overrides and silencing flow through to the alert.
#[test]
fn orchestrator_respects_sound_overrides() {
    let sink = RecordingSink::default();
    let mut sounds = SoundPrefs::new("bell");
    sounds.set(
        Prayer::Fajr,
        SoundChoice {
            enabled: true,
            sound: Some("dawn-chime".to_string()),
        },
    );
    sounds.set(
        Prayer::Isha,
        SoundChoice {
            enabled: false,
            sound: None,
        },
    );
    let mut orchestrator = Orchestrator::new(Box::new(sink.clone()), sounds, true);

    orchestrator.observe(&snapshot(Prayer::Fajr, Prayer::Sunrise, 3600), 0);
    orchestrator.observe(&snapshot(Prayer::Isha, Prayer::Fajr, 3600), 1_000);

    let events = sink.take();
    assert_eq!(
        events[0],
        Event::Alert(Prayer::Fajr, Some("dawn-chime".to_string()))
    );
    assert!(events.contains(&Event::Alert(Prayer::Isha, None)));
}

/// Disabling notifications through a reload dismisses the countdown.
#[test]
fn orchestrator_reload_can_silence_everything() {
    let sink = RecordingSink::default();
    let mut orchestrator = Orchestrator::new(
        Box::new(sink.clone()),
        SoundPrefs::default(),
        true,
    );

    orchestrator.observe(&snapshot(Prayer::Asr, Prayer::Maghrib, 1800), 0);
    sink.take();

    orchestrator.apply_config(false, SoundPrefs::default());
    assert_eq!(sink.take(), vec![Event::Dismiss]);

    // New periods stay silent while disabled
    orchestrator.observe(&snapshot(Prayer::Maghrib, Prayer::Isha, 5400), 10_000);
    assert_eq!(sink.take(), vec![]);
}
