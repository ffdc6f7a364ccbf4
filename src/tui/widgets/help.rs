use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::config::KeyBindings;
use crate::tui::widgets::color::Palette;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, bindings: &KeyBindings) {
    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(bindings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center),
        )
        .style(Style::default().fg(Palette::FG).bg(Palette::BG))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

/// Centered rect taking the given percentage of `area`
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

pub fn build_help_text(kb: &KeyBindings) -> String {
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!("  {} / {}: Switch tabs\n", key(&kb.tab_left), key(&kb.tab_right)));
    text.push_str(&format!(
        "  {} / {} / {} / {}: Dashboard, Reports, Feedback, Settings\n",
        key(&kb.tab_1),
        key(&kb.tab_2),
        key(&kb.tab_3),
        key(&kb.tab_4)
    ));
    text.push_str(&format!("  {} / {} or Tab: Move between fields\n", key(&kb.list_up), key(&kb.list_down)));
    text.push_str(&format!("  {}: Edit field / open list / toggle\n", key(&kb.select)));
    text.push_str(&format!("  {}: Toggle sidebar\n", key(&kb.toggle_sidebar)));
    text.push('\n');

    text.push_str("Reports:\n");
    text.push_str(&format!("  {}: Suggestions for category, tools or skills\n", key(&kb.suggest)));
    text.push_str(&format!("  {} / {}: Select tag\n", key(&kb.tag_prev), key(&kb.tag_next)));
    text.push_str(&format!("  {}: Remove selected tag\n", key(&kb.remove_tag)));
    text.push_str("  Enter in Tools/Skills input: Add tag\n");
    text.push_str(&format!("  {}: Submit daily report (or weekly brief)\n", key(&kb.save)));
    text.push_str(&format!("  {}: Clear form\n", key(&kb.clear_form)));
    text.push('\n');

    text.push_str("Feedback:\n");
    text.push_str(&format!("  {} / {}: Change rating\n", key(&kb.rating_up), key(&kb.rating_down)));
    text.push_str(&format!("  {}: Submit feedback\n", key(&kb.save)));
    text.push('\n');

    text.push_str("Editing:\n");
    text.push_str("  Arrow keys, Home/End: Move cursor\n");
    text.push_str("  Enter: New line in long text fields\n");
    text.push_str("  Esc: Stop editing\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Save attachment details / profile\n", key(&kb.save)));
    text.push_str(&format!("  {}: Reload history and feedback\n", key(&kb.refresh)));
    text.push_str(&format!("  {}: Show/hide help\n", key(&kb.help)));
    text.push_str(&format!("  {}: Quit\n", key(&kb.quit)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_configured_keys() {
        let mut kb = KeyBindings::default();
        kb.suggest = "Ctrl+t".to_string();
        let text = build_help_text(&kb);
        assert!(text.contains(&format!("{}: Suggestions", key("Ctrl+t"))));
        assert!(text.contains("F1: Show/hide help"));
    }

    #[test]
    fn test_popup_area_is_centered() {
        let area = popup_area(Rect::new(0, 0, 100, 50), 60, 70);
        assert_eq!((area.x, area.width, area.height), (20, 60, 35));
    }
}
