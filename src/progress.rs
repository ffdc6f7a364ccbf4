use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, Utc};

/// Attachment period the dashboard progress bar is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ProgressWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window from midnight UTC of `start` to midnight UTC of `end`
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: end.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }

    pub fn progress_at(&self, now: DateTime<Utc>) -> u8 {
        compute_progress(now, self.start, self.end)
    }
}

/// Percentage of `start..end` elapsed at `now`, clamped to 0..=100.
///
/// Measured in milliseconds and rounded half up. A zero-length window reads
/// 100 at or after its instant.
pub fn compute_progress(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> u8 {
    if now < start {
        return 0;
    }
    if now >= end {
        return 100;
    }

    let elapsed = (now - start).num_milliseconds() as i128;
    let total = (end - start).num_milliseconds() as i128;
    if total <= 0 {
        return 100;
    }

    let percent = (200 * elapsed + total) / (2 * total);
    percent.clamp(0, 100) as u8
}

/// Keeps the progress percentage fresh on a fixed refresh period.
///
/// The owner calls `tick` from its loop; `next_deadline` tells it how long
/// it may sleep. A stopped tracker never reports a deadline.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    window: ProgressWindow,
    refresh: Duration,
    next_tick: Option<Instant>,
    percent: u8,
}

impl ProgressTracker {
    pub fn new(window: ProgressWindow, refresh: Duration) -> Self {
        Self {
            window,
            refresh,
            next_tick: None,
            percent: 0,
        }
    }

    /// Compute immediately and schedule the next refresh
    pub fn start(&mut self, now: Instant, wall: DateTime<Utc>) -> u8 {
        self.percent = self.window.progress_at(wall);
        self.next_tick = Some(now + self.refresh);
        self.percent
    }

    /// Recompute when the refresh period has elapsed.
    /// Returns the new percentage when a refresh happened.
    pub fn tick(&mut self, now: Instant, wall: DateTime<Utc>) -> Option<u8> {
        match self.next_tick {
            Some(due) if now >= due => {
                self.percent = self.window.progress_at(wall);
                self.next_tick = Some(now + self.refresh);
                Some(self.percent)
            }
            _ => None,
        }
    }

    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn window(&self) -> ProgressWindow {
        self.window
    }
}
