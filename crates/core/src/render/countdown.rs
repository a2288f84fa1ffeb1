//! Countdown arithmetic and the once-per-second ticker.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::types::Timestamp;

/// Interval between countdown recomputations.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Remaining time split into display units. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    pub fn is_zero(&self) -> bool {
        *self == TimeRemaining::default()
    }
}

/// Time left until `target`, clamped at zero once `target` has passed.
pub fn time_remaining(target: Timestamp, now: Timestamp) -> TimeRemaining {
    let total = (target - now).num_seconds().max(0);
    TimeRemaining {
        days: total / 86_400,
        hours: (total % 86_400) / 3_600,
        minutes: (total % 3_600) / 60,
        seconds: total % 60,
    }
}

/// Parse a stored target date.
///
/// Accepts RFC 3339, or a zone-less `datetime-local` / date value which is
/// read as UTC.
pub fn parse_target(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// ---------------------------------------------------------------------------
// Ticker
// ---------------------------------------------------------------------------

/// Background task publishing [`TimeRemaining`] on every tick.
///
/// The task stops on its own after publishing zero, and is aborted when the
/// ticker is dropped, so a countdown never outlives its owner.
pub struct CountdownTicker {
    rx: watch::Receiver<TimeRemaining>,
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    /// Start ticking towards `target` against the wall clock.
    pub fn start(target: Timestamp) -> Self {
        Self::start_with_clock(target, TICK_INTERVAL, Utc::now)
    }

    /// Start with an explicit period and clock source.
    pub fn start_with_clock<C>(target: Timestamp, period: Duration, clock: C) -> Self
    where
        C: Fn() -> Timestamp + Send + 'static,
    {
        let (tx, rx) = watch::channel(time_remaining(target, clock()));

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);

            loop {
                interval.tick().await;
                let remaining = time_remaining(target, clock());
                tx.send_replace(remaining);
                if remaining.is_zero() {
                    tracing::debug!(%target, "Countdown reached zero");
                    break;
                }
            }
        });

        CountdownTicker { rx, handle }
    }

    pub fn current(&self) -> TimeRemaining {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimeRemaining> {
        self.rx.clone()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
