use chrono::{DateTime, Local};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

use crate::models::DetailsField;
use crate::tui::app::{App, DashboardStats, EditTarget, Tab};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::form::{editor_for, render_text_field, FieldView};

pub fn render_dashboard(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stat cards
            Constraint::Length(3), // Progress
            Constraint::Min(11),   // Attachment details
            Constraint::Length(1), // Autosave status
        ])
        .split(area);

    render_stat_cards(f, rows[0], &app.dashboard_stats());
    render_progress(f, rows[1], app);
    render_details(f, rows[2], app);

    let autosave = autosave_line(
        app.autosave.is_pending(),
        app.autosave.last_saved(),
        app.autosave.last_error(),
    );
    f.render_widget(Paragraph::new(autosave), rows[3]);
}

fn render_stat_cards(f: &mut Frame, area: Rect, stats: &DashboardStats) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let values = [
        ("Reports Submitted", stats.reports_submitted.to_string(), Palette::ACCENT),
        ("Hours Logged", format!("{:.1}", stats.hours_logged), Palette::SUCCESS),
        ("Approved", stats.approved.to_string(), Palette::SUCCESS),
        ("Days Remaining", stats.days_remaining.to_string(), Palette::WARNING),
    ];
    for ((title, value, color), card) in values.into_iter().zip(cards.iter()) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(paragraph, *card);
    }
}

fn render_progress(f: &mut Frame, area: Rect, app: &App) {
    let window = app.progress.window();
    let percent = app.progress.percent();
    let label = format!(
        "{}%  ({} to {})",
        percent,
        window.start.format("%b %d, %Y"),
        window.end.format("%b %d, %Y")
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Attachment Progress"))
        .gauge_style(Style::default().fg(Palette::ACCENT))
        .percent(percent as u16)
        .label(label);
    f.render_widget(gauge, area);
}

fn render_details(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default().borders(Borders::ALL).title("Attachment Details");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3); 3])
        .split(inner);

    let focused_field = (app.ui.current_tab == Tab::Dashboard).then(|| app.dashboard_field());
    for (i, field) in DetailsField::ALL.iter().copied().enumerate() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[i / 2]);
        render_text_field(
            f,
            columns[i % 2],
            FieldView {
                title: field.label(),
                value: app.dashboard.details.get(field),
                placeholder: field.placeholder(),
                focused: focused_field == Some(field),
            },
            editor_for(&mut app.ui, EditTarget::Detail(field)),
        );
    }
}

/// "Saving..." while a save is pending, otherwise the last outcome
pub fn autosave_line(pending: bool, last_saved: Option<DateTime<Local>>, last_error: Option<&str>) -> Line<'static> {
    if let Some(err) = last_error {
        return Line::from(Span::styled(err.to_string(), Style::default().fg(Palette::ERROR)));
    }
    if pending {
        return Line::from(Span::styled("Saving...", Style::default().fg(Palette::WARNING)));
    }
    match last_saved {
        Some(at) => Line::from(Span::styled(
            format!("Saved at {}", at.format("%H:%M:%S")),
            Style::default().fg(Palette::SUCCESS),
        )),
        None => Line::from(Span::styled(
            "Changes are saved automatically",
            Style::default().fg(Palette::MUTED),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_autosave_line_precedence() {
        let at = Local.with_ymd_and_hms(2024, 7, 1, 9, 5, 0).unwrap();
        assert_eq!(text(&autosave_line(false, Some(at), None)), "Saved at 09:05:00");
        assert_eq!(text(&autosave_line(true, Some(at), None)), "Saving...");
        assert_eq!(
            text(&autosave_line(true, Some(at), Some("Autosave failed: offline"))),
            "Autosave failed: offline"
        );
        assert_eq!(text(&autosave_line(false, None, None)), "Changes are saved automatically");
    }
}
