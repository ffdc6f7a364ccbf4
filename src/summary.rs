use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::DailyTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryPeriod {
    Week { week_number: u32, iso_year: i32 },
    Month { month: u32, year: i32 },
}

impl SummaryPeriod {
    pub fn contains(&self, task: &DailyTask) -> bool {
        match *self {
            SummaryPeriod::Week { week_number, iso_year } => {
                task.week_number == week_number && task.iso_year == iso_year
            }
            SummaryPeriod::Month { month, year } => {
                task.date.month() == month && task.date.year() == year
            }
        }
    }

    pub fn label(&self) -> String {
        match *self {
            SummaryPeriod::Week { week_number, iso_year } => format!("Week {} of {}", week_number, iso_year),
            SummaryPeriod::Month { month, year } => format!("{:04}-{:02}", year, month),
        }
    }
}

/// Hours and task counts over a week or month, as served by the
/// `weekly-summary` and `monthly-summary` endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total_hours: f64,
    pub total_tasks: usize,
    pub approved_tasks: usize,
    pub categories: BTreeMap<String, usize>, // category name -> task count
    #[serde(flatten)]
    pub period: SummaryPeriod,
}

impl TaskSummary {
    pub fn compute(tasks: &[DailyTask], period: SummaryPeriod) -> Self {
        let mut summary = Self {
            total_hours: 0.0,
            total_tasks: 0,
            approved_tasks: 0,
            categories: BTreeMap::new(),
            period,
        };

        for task in tasks.iter().filter(|t| period.contains(t)) {
            summary.total_hours += task.hours_spent;
            summary.total_tasks += 1;
            if task.approved {
                summary.approved_tasks += 1;
            }
            *summary
                .categories
                .entry(task.task_category.name.clone())
                .or_insert(0) += 1;
        }

        summary
    }

    pub fn weekly(tasks: &[DailyTask], week_number: u32, iso_year: i32) -> Self {
        Self::compute(tasks, SummaryPeriod::Week { week_number, iso_year })
    }

    pub fn monthly(tasks: &[DailyTask], month: u32, year: i32) -> Self {
        Self::compute(tasks, SummaryPeriod::Month { month, year })
    }
}
