use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::tui::widgets::color::{contrast_text_color, Palette};

/// Format tags with brackets: [tag1] [tag2] [tag3]
pub fn format_tags_brackets(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("[{}]", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tags as chips; the selected one is highlighted when the list has focus
pub fn tag_chips(tags: &[String], selected: Option<usize>) -> Vec<Span<'static>> {
    if tags.is_empty() {
        return vec![Span::styled("(none)", Style::default().fg(Palette::MUTED))];
    }

    let mut spans = Vec::with_capacity(tags.len() * 2);
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if selected == Some(i) {
            Style::default()
                .fg(contrast_text_color(Palette::HIGHLIGHT_BG))
                .bg(Palette::HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Palette::ACCENT)
        };
        spans.push(Span::styled(format!("[{} ×]", tag), style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tags_brackets() {
        let tags = vec!["Git".to_string(), "Docker".to_string()];
        assert_eq!(format_tags_brackets(&tags), "[Git] [Docker]");
        assert_eq!(format_tags_brackets(&[]), "");
    }

    #[test]
    fn test_tag_chips_highlight_selected() {
        let tags = vec!["Git".to_string(), "Docker".to_string()];
        let spans = tag_chips(&tags, Some(1));
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[2].content, "[Docker ×]");
        assert_eq!(spans[2].style.bg, Some(Palette::HIGHLIGHT_BG));
        assert_eq!(spans[0].style.bg, None);
    }
}
