use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::feedback::{FeedbackStats, MAX_RATING};
use crate::models::SupervisorFeedback;
use crate::tui::app::{EditTarget, FeedbackField, FeedbackState, Tab, UiState};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::form::{editor_for, field_block, render_text_field, FieldView};

pub fn render_feedback_tab(f: &mut Frame, area: Rect, feedback: &FeedbackState, ui: &mut UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stats
            Constraint::Min(5),    // Feedback text
            Constraint::Length(3), // Rating
            Constraint::Min(6),    // Supervisor feedback
        ])
        .split(area);

    render_stats(f, rows[0], &feedback.stats);

    let on_tab = ui.current_tab == Tab::Feedback;
    let current = feedback.field();
    render_text_field(
        f,
        rows[1],
        FieldView {
            title: "Your Feedback",
            value: &feedback.form.text,
            placeholder: "How is the attachment going?",
            focused: on_tab && current == FeedbackField::Text,
        },
        editor_for(ui, EditTarget::FeedbackText),
    );

    let rating_block = field_block("Rating", on_tab && current == FeedbackField::Rating, false);
    f.render_widget(Paragraph::new(stars(feedback.form.rating())).block(rating_block), rows[2]);

    render_supervisor_feedback(f, rows[3], &feedback.supervisor);
}

/// Filled and empty stars, e.g. "★★★☆☆"
pub fn stars(rating: u8) -> Line<'static> {
    let rating = rating.min(MAX_RATING) as usize;
    Line::from(vec![
        Span::styled("★".repeat(rating), Style::default().fg(Palette::STAR)),
        Span::styled("☆".repeat(MAX_RATING as usize - rating), Style::default().fg(Palette::MUTED)),
    ])
}

fn render_stats(f: &mut Frame, area: Rect, stats: &FeedbackStats) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);
    let values = [
        ("Total Feedback", stats.total_feedback.to_string()),
        ("Average Rating", format!("{:.1}", stats.average_rating)),
        ("Response Rate", format!("{}%", stats.response_rate)),
    ];
    for ((title, value), card) in values.into_iter().zip(cards.iter()) {
        let paragraph = Paragraph::new(Span::styled(value, Style::default().add_modifier(Modifier::BOLD)))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(paragraph, *card);
    }
}

fn render_supervisor_feedback(f: &mut Frame, area: Rect, items: &[SupervisorFeedback]) {
    let block = Block::default().borders(Borders::ALL).title("Supervisor Feedback");
    if items.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No feedback from your supervisor yet",
            Style::default().fg(Palette::MUTED),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let list_items: Vec<ListItem> = items
        .iter()
        .map(|item| {
            let mut header = vec![
                Span::styled(item.supervisor.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("  {}", item.date.format("%Y-%m-%d"))),
            ];
            if let Some(week) = item.week_number {
                header.push(Span::styled(format!("  Week {}", week), Style::default().fg(Palette::MUTED)));
            }
            if let Some(rating) = item.rating {
                header.push(Span::raw("  "));
                header.extend(stars(rating).spans);
            }
            ListItem::new(vec![Line::from(header), Line::from(format!("  {}", item.feedback))])
        })
        .collect();
    f.render_widget(List::new(list_items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        let line = stars(3);
        assert_eq!(line.spans[0].content, "★★★");
        assert_eq!(line.spans[1].content, "☆☆");
        assert_eq!(stars(9).spans[1].content, "");
    }
}
