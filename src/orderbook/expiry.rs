//! Background expiry of good-for-day orders.
//!
//! A single long-lived worker waits until the configured daily cutoff,
//! then cancels every good-for-day order present at scan time in one
//! critical section. The wait is interruptible: shutdown notifies the
//! condition variable and the worker exits immediately.

use super::book::BookShared;
use chrono::{Local, NaiveDateTime, NaiveTime};
use std::sync::atomic::Ordering;
use std::sync::PoisonError;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// How far past the computed cutoff wait a scan may start before the
/// delay is worth flagging.
const LATE_SCAN_WARN: Duration = Duration::from_secs(5);

/// Book-level configuration: when the trading day ends for good-for-day
/// orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookConfig {
    /// Local time of day at which good-for-day orders expire.
    pub expiry_cutoff: NaiveTime,
    /// Extra delay added to the wait so the scan runs strictly after the
    /// cutoff has passed.
    pub expiry_slack: Duration,
}

impl Default for BookConfig {
    /// 16:00 local with 100 ms of slack.
    fn default() -> Self {
        Self {
            expiry_cutoff: NaiveTime::from_hms_opt(16, 0, 0).expect("16:00:00 is a valid time"),
            expiry_slack: Duration::from_millis(100),
        }
    }
}

impl BookConfig {
    /// A configuration expiring at the given local time of day, keeping
    /// the default slack.
    #[must_use]
    pub fn with_cutoff(expiry_cutoff: NaiveTime) -> Self {
        Self {
            expiry_cutoff,
            ..Self::default()
        }
    }
}

/// Worker loop. Runs on its own thread for the lifetime of the book.
///
/// Each iteration waits on the shutdown condition variable with a timeout
/// reaching to the next cutoff. Three outcomes:
/// - shutdown flagged: exit.
/// - woken without timeout (spurious or raced notification): recompute
///   the wait and sleep again.
/// - timed out: the cutoff passed, scan and cancel all good-for-day
///   orders while still holding the lock, then wait for the next day's
///   cutoff.
pub(crate) fn run(shared: &BookShared, config: BookConfig) {
    loop {
        let wait = duration_until_cutoff(Local::now().naive_local(), config.expiry_cutoff)
            + config.expiry_slack;
        trace!(?wait, "expiry worker waiting for next cutoff");

        let started = Instant::now();
        let core = shared.core.lock().unwrap_or_else(PoisonError::into_inner);
        // Shutdown stores the flag while holding this lock, so checking
        // here before waiting cannot miss a notification.
        if shared.shutdown.load(Ordering::Acquire) {
            debug!("expiry worker shutting down");
            return;
        }
        let (mut core, result) = shared
            .shutdown_cv
            .wait_timeout(core, wait)
            .unwrap_or_else(PoisonError::into_inner);

        if shared.shutdown.load(Ordering::Acquire) {
            debug!("expiry worker shutting down");
            return;
        }
        if !result.timed_out() {
            continue;
        }

        let overshoot = started.elapsed().saturating_sub(wait);
        if overshoot > LATE_SCAN_WARN {
            warn!(?overshoot, "expiry scan starting well past the cutoff");
        }

        let cancelled = core.cancel_good_for_day();
        if cancelled > 0 {
            info!(cancelled, "good-for-day orders expired at daily cutoff");
        }
    }
}

/// Time remaining until the next occurrence of `cutoff`, from `now`. If
/// today's cutoff already passed, the next one is tomorrow's.
fn duration_until_cutoff(now: NaiveDateTime, cutoff: NaiveTime) -> Duration {
    let today = now.date().and_time(cutoff);
    let next = if now < today {
        today
    } else {
        today + chrono::Duration::days(1)
    };
    (next - now).to_std().unwrap_or(Duration::ZERO)
}
