use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::tui::app::App;
use crate::tui::app::Tab;
use crate::tui::widgets::color::{contrast_text_color, Palette};

pub fn render_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Student
            Constraint::Min(6),    // Navigation
            Constraint::Length(3), // Progress
        ])
        .split(area);

    let profile = &app.config.profile;
    let name = if profile.name.is_empty() { "Student" } else { profile.name.as_str() };
    let student = Paragraph::new(vec![
        Line::from(Span::styled(name.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(profile.registration.clone(), Style::default().fg(Palette::MUTED))),
    ])
    .block(Block::default().borders(Borders::ALL).title("Intern Track"));
    f.render_widget(student, rows[0]);

    let items: Vec<ListItem> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let style = if *tab == app.ui.current_tab {
                Style::default()
                    .fg(contrast_text_color(Palette::HIGHLIGHT_BG))
                    .bg(Palette::HIGHLIGHT_BG)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Palette::FG)
            };
            ListItem::new(Line::from(Span::styled(format!(" {} {}", i + 1, tab.title()), style)))
        })
        .collect();
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title("Navigation")),
        rows[1],
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Palette::ACCENT))
        .percent(app.progress.percent() as u16);
    f.render_widget(gauge, rows[2]);
}
