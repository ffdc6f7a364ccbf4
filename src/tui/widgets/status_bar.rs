use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::app::StatusState;
use crate::tui::widgets::color::{contrast_text_color, Palette};

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

pub fn render_status_bar(f: &mut Frame, area: Rect, status: &StatusState, backend_label: &str, key_hints: &[String]) {
    let max_width = area.width as usize;

    let (content, style) = match status.message {
        Some(ref message) => {
            let bg = if status.is_error { Palette::ERROR } else { Palette::HIGHLIGHT_BG };
            let style = Style::default()
                .fg(contrast_text_color(bg))
                .bg(bg)
                .add_modifier(Modifier::BOLD);
            (truncate(message, max_width), style)
        }
        None => {
            let label = format!("[{}] ", backend_label);
            let hints = fit_hints(key_hints, max_width.saturating_sub(label.chars().count()));
            (label + &hints, Style::default().fg(Palette::FG).bg(Palette::BG))
        }
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_width.saturating_sub(ELLIPSIS.len())).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Join as many hints as fit in `max_width`, ending with "..." when some
/// had to be dropped
pub fn fit_hints(hints: &[String], max_width: usize) -> String {
    let separator_len = SEPARATOR.chars().count();
    let mut text = String::new();
    let mut len = 0;

    for (i, hint) in hints.iter().enumerate() {
        let hint_len = hint.chars().count();
        let would_be = if i == 0 { hint_len } else { len + separator_len + hint_len };

        if would_be > max_width {
            if i == 0 {
                return truncate(hint, max_width);
            }
            if len + ELLIPSIS.len() <= max_width {
                text.push_str(ELLIPSIS);
            } else {
                text = truncate(&text, max_width);
            }
            return text;
        }

        if i > 0 {
            text.push_str(SEPARATOR);
        }
        text.push_str(hint);
        len = would_be;
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints() -> Vec<String> {
        vec!["q: Quit".to_string(), "F1: Help".to_string(), "Ctrl+s: Save".to_string()]
    }

    #[test]
    fn test_all_hints_fit() {
        assert_eq!(fit_hints(&hints(), 80), "q: Quit • F1: Help • Ctrl+s: Save");
    }

    #[test]
    fn test_overflow_adds_ellipsis() {
        assert_eq!(fit_hints(&hints(), 22), "q: Quit • F1: Help...");
    }

    #[test]
    fn test_first_hint_too_long() {
        assert_eq!(fit_hints(&hints(), 5), "q:...");
    }
}
