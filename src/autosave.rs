use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::api::{ApiError, SnapshotSink};

#[derive(Debug, Error)]
#[error("Autosave failed: {0}")]
pub struct PersistError(#[from] pub ApiError);

#[derive(Debug, Clone)]
struct PendingSave<T> {
    snapshot: T,
    fire_at: Instant,
}

/// Coalesces bursts of edits into one delayed persist.
///
/// At most one save is pending. Every change replaces it and pushes the
/// deadline back by the quiet period, so only the latest snapshot is ever
/// written.
#[derive(Debug)]
pub struct DebouncedAutosave<T> {
    quiet_period: Duration,
    pending: Option<PendingSave<T>>,
    last_saved: Option<DateTime<Local>>,
    last_error: Option<String>,
    closed: bool,
}

impl<T: Clone> DebouncedAutosave<T> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            last_saved: None,
            last_error: None,
            closed: false,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn on_change(&mut self, snapshot: T, now: Instant) {
        if self.closed {
            return;
        }
        self.pending = Some(PendingSave {
            snapshot,
            fire_at: now + self.quiet_period,
        });
    }

    /// Persist the pending snapshot if its deadline has passed.
    ///
    /// `None` when nothing was due, otherwise the outcome of the save. A
    /// failed save is not retried; the next change schedules a new one.
    pub fn poll<S: SnapshotSink<T> + ?Sized>(&mut self, now: Instant, sink: &mut S) -> Option<Result<(), PersistError>> {
        if self.closed {
            return None;
        }
        let pending = self.pending.take_if(|p| now >= p.fire_at)?;
        Some(self.persist(&pending.snapshot, sink))
    }

    /// Drop any pending save and write `snapshot` right away
    pub fn flush_now<S: SnapshotSink<T> + ?Sized>(&mut self, snapshot: &T, sink: &mut S) -> Result<(), PersistError> {
        self.pending = None;
        if self.closed {
            return Ok(());
        }
        self.persist(snapshot, sink)
    }

    /// Write the pending snapshot now, regardless of its deadline
    pub fn flush_pending<S: SnapshotSink<T> + ?Sized>(&mut self, sink: &mut S) -> Result<bool, PersistError> {
        if self.closed {
            return Ok(false);
        }
        match self.pending.take() {
            Some(pending) => self.persist(&pending.snapshot, sink).map(|_| true),
            None => Ok(false),
        }
    }

    /// Release the pending slot. Nothing fires after this.
    pub fn close(&mut self) {
        self.pending = None;
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.fire_at)
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn persist<S: SnapshotSink<T> + ?Sized>(&mut self, snapshot: &T, sink: &mut S) -> Result<(), PersistError> {
        match sink.persist(snapshot) {
            Ok(()) => {
                self.last_saved = Some(Local::now());
                self.last_error = None;
                log::debug!("Autosave persisted");
                Ok(())
            }
            Err(err) => {
                let err = PersistError(err);
                log::warn!("{}", err);
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
