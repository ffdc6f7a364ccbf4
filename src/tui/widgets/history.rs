use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::models::DailyTask;
use crate::reports::{ReportKind, SubmittedReport};
use crate::summary::TaskSummary;
use crate::tui::app::ReportsState;
use crate::tui::widgets::color::{category_color, Palette};
use crate::tui::widgets::tags::format_tags_brackets;

pub fn render_history(f: &mut Frame, area: Rect, reports: &ReportsState) {
    let session_height = (reports.log.reports().len() as u16 * 2 + 2).clamp(3, 10);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(session_height),
        ])
        .split(area);

    render_summary(f, rows[0], reports.summary.as_ref());
    render_task_list(f, rows[1], &reports.history);
    render_submitted_reports(f, rows[2], reports.log.reports());
}

fn render_summary(f: &mut Frame, area: Rect, summary: Option<&TaskSummary>) {
    let block = Block::default().borders(Borders::ALL).title("This Week");
    let lines = match summary {
        Some(summary) => {
            let categories = summary
                .categories
                .iter()
                .map(|(name, count)| format!("{} {}", name, count))
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                Line::from(summary.period.label()),
                Line::from(format!(
                    "{} tasks, {} approved, {:.1} h",
                    summary.total_tasks, summary.approved_tasks, summary.total_hours
                )),
                Line::from(Span::styled(categories, Style::default().fg(Palette::MUTED))),
            ]
        }
        None => vec![Line::from(Span::styled(
            "Summary unavailable",
            Style::default().fg(Palette::MUTED),
        ))],
    };
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// One history row: date, category badge, hours and approval mark
pub fn task_lines(task: &DailyTask) -> Vec<Line<'static>> {
    let (mark, mark_style) = if task.approved {
        ("✓", Style::default().fg(Palette::SUCCESS))
    } else {
        ("…", Style::default().fg(Palette::WARNING))
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(mark, mark_style),
            Span::raw(" "),
            Span::raw(task.date.format("%Y-%m-%d").to_string()),
            Span::raw(" "),
            Span::styled(
                task.task_category.name.clone(),
                Style::default().fg(category_color(&task.task_category)),
            ),
            Span::raw(format!(" {:.1}h", task.hours_spent)),
        ]),
        Line::from(format!("  {}", task.description)),
    ];
    let tags: Vec<String> = task.tools_used.iter().chain(&task.skills_applied).cloned().collect();
    if !tags.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", format_tags_brackets(&tags)),
            Style::default().fg(Palette::MUTED),
        )));
    }
    lines
}

fn render_task_list(f: &mut Frame, area: Rect, tasks: &[DailyTask]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Recent Tasks ({})", tasks.len()));
    if tasks.is_empty() {
        let empty = Paragraph::new(Span::styled("No tasks yet", Style::default().fg(Palette::MUTED))).block(block);
        f.render_widget(empty, area);
        return;
    }
    let items: Vec<ListItem> = tasks.iter().map(|t| ListItem::new(task_lines(t))).collect();
    f.render_widget(List::new(items).block(block), area);
}

fn render_submitted_reports(f: &mut Frame, area: Rect, reports: &[SubmittedReport]) {
    let block = Block::default().borders(Borders::ALL).title("Submitted This Session");
    if reports.is_empty() {
        let empty = Paragraph::new(Span::styled("Nothing submitted yet", Style::default().fg(Palette::MUTED)))
            .block(block);
        f.render_widget(empty, area);
        return;
    }
    let items: Vec<ListItem> = reports
        .iter()
        .map(|report| {
            let color = match report.kind {
                ReportKind::Daily => Palette::ACCENT,
                ReportKind::Weekly => Palette::SUCCESS,
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(report.title.clone(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw(format!("  {}  {}", report.week_label, report.time_label())),
                ]),
                Line::from(Span::styled(
                    format!("  {}", report.summary.lines().next().unwrap_or_default()),
                    Style::default().fg(Palette::MUTED),
                )),
            ])
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::sample_history;

    #[test]
    fn test_task_lines_include_tags_row_when_present() {
        let tasks = sample_history();
        let lines = task_lines(&tasks[0]);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].spans.iter().any(|s| s.content == "✓"));

        let mut bare = tasks[0].clone();
        bare.tools_used.clear();
        bare.skills_applied.clear();
        assert_eq!(task_lines(&bare).len(), 2);
    }
}
