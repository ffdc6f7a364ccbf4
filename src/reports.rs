use chrono::{DateTime, Datelike, Local};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("Please fill in the weekly brief before submitting.")]
    EmptyBrief,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Weekly,
}

/// Entry in the "submitted reports" list on the Reports tab
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedReport {
    pub id: u64,
    pub kind: ReportKind,
    pub title: String,
    pub week_label: String,
    pub submitted_at: DateTime<Local>,
    pub summary: String,
}

impl SubmittedReport {
    /// Submission time as shown in the list, e.g. "14:05HRS"
    pub fn time_label(&self) -> String {
        format!("{}HRS", self.submitted_at.format("%H:%M"))
    }
}

/// Week of the month a date falls in (days 1-7 are week 1)
pub fn week_of_month(date: DateTime<Local>) -> u32 {
    date.day().div_ceil(7)
}

/// Reports submitted during this session, newest first
#[derive(Debug, Clone, Default)]
pub struct ReportLog {
    reports: Vec<SubmittedReport>,
    next_id: u64,
}

impl ReportLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[SubmittedReport] {
        &self.reports
    }

    /// Record a weekly brief. Blank briefs are rejected.
    pub fn submit_weekly(&mut self, brief: &str, now: DateTime<Local>) -> Result<&SubmittedReport, ReportError> {
        let brief = brief.trim();
        if brief.is_empty() {
            return Err(ReportError::EmptyBrief);
        }
        Ok(self.push(ReportKind::Weekly, "Weekly Report", brief, now))
    }

    /// Record a daily task that the backend accepted
    pub fn record_daily(&mut self, description: &str, now: DateTime<Local>) -> &SubmittedReport {
        self.push(ReportKind::Daily, "Daily Report", description, now)
    }

    fn push(&mut self, kind: ReportKind, title: &str, summary: &str, now: DateTime<Local>) -> &SubmittedReport {
        self.next_id += 1;
        let report = SubmittedReport {
            id: self.next_id,
            kind,
            title: title.to_string(),
            week_label: format!("Week {}", week_of_month(now)),
            submitted_at: now,
            summary: summary.to_string(),
        };
        self.reports.insert(0, report);
        &self.reports[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, day, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_week_of_month() {
        assert_eq!(week_of_month(at(1)), 1);
        assert_eq!(week_of_month(at(7)), 1);
        assert_eq!(week_of_month(at(8)), 2);
        assert_eq!(week_of_month(at(30)), 5);
    }

    #[test]
    fn test_blank_weekly_brief_rejected() {
        let mut log = ReportLog::new();
        assert_eq!(log.submit_weekly("   ", at(3)).unwrap_err(), ReportError::EmptyBrief);
        assert!(log.reports().is_empty());
    }

    #[test]
    fn test_reports_are_newest_first() {
        let mut log = ReportLog::new();
        log.submit_weekly("Finished onboarding", at(3)).unwrap();
        log.record_daily("Fixed login bug", at(10));

        let reports = log.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].kind, ReportKind::Daily);
        assert_eq!(reports[0].week_label, "Week 2");
        assert_eq!(reports[1].title, "Weekly Report");
        assert_eq!(reports[1].time_label(), "14:05HRS");
    }
}
