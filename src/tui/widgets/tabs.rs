use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;
use ratatui::Frame;

use crate::tui::app::Tab;
use crate::tui::widgets::color::{contrast_text_color, Palette};

pub fn render_tabs(f: &mut Frame, area: Rect, current_tab: Tab) {
    let tab_fg = contrast_text_color(Palette::TAB_BG);

    // Padded spans on a background give each tab a box look
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            Line::from(vec![
                Span::styled("  ", Style::default().bg(Palette::TAB_BG)),
                Span::styled(tab.title(), Style::default().fg(tab_fg).bg(Palette::TAB_BG)),
                Span::styled("  ", Style::default().bg(Palette::TAB_BG)),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(current_tab.index())
        .style(Style::default().fg(Palette::FG).bg(Palette::BG))
        .highlight_style(
            Style::default()
                .fg(contrast_text_color(Palette::HIGHLIGHT_BG))
                .bg(Palette::HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .divider("  ")
        .padding("", "");

    f.render_widget(tabs, area);
}
