//! Logging to the systemd journal (`journalctl --user -t intern-track -f`).
//!
//! The TUI owns the terminal, so nothing is written to stderr. Crate records
//! pass at Info (Debug when enabled), everything else at Warn.

use log::{LevelFilter, Log, Metadata, Record};

use crate::utils::Profile;

/// Target filter in front of the real sink
struct FilteredLog<L> {
    inner: L,
    debug: bool,
}

fn is_crate_target(target: &str) -> bool {
    target.starts_with("intern_track") || target.starts_with("intern-track")
}

fn max_level_for(target: &str, debug: bool) -> LevelFilter {
    if is_crate_target(target) {
        if debug { LevelFilter::Debug } else { LevelFilter::Info }
    } else {
        LevelFilter::Warn
    }
}

impl<L: Log> Log for FilteredLog<L> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level_for(metadata.target(), self.debug)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

fn install<L: Log + 'static>(inner: L, debug: bool) {
    if log::set_boxed_logger(Box::new(FilteredLog { inner, debug })).is_ok() {
        // Global max must be Debug so crate debug logs can pass through when enabled
        log::set_max_level(LevelFilter::Debug);
    }
}

/// Install the journal logger, tagged with the profile's app name.
///
/// Only the first call installs a logger; later calls are ignored by `log`.
#[cfg(target_os = "linux")]
pub fn init(profile: Profile, debug: bool) -> std::io::Result<()> {
    let journal =
        systemd_journal_logger::JournalLog::new()?.with_syslog_identifier(profile.app_name().to_string());
    install(journal, debug);
    Ok(())
}

/// There is no journal here, so records are dropped.
#[cfg(not(target_os = "linux"))]
pub fn init(_profile: Profile, _debug: bool) -> std::io::Result<()> {
    Ok(())
}
