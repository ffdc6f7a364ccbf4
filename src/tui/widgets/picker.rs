use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};
use ratatui::Frame;

use crate::tui::app::PickerState;
use crate::tui::widgets::color::{contrast_text_color, Palette};
use crate::tui::widgets::help::popup_area;

pub fn render_picker(f: &mut Frame, area: Rect, picker: &PickerState) {
    // Tall enough for every item when the terminal allows
    let wanted = picker.items.len() as u16 + 2;
    let percent_y = ((wanted * 100) / area.height.max(1)).clamp(20, 80);
    let popup = popup_area(area, 40, percent_y);
    f.render_widget(Clear, popup);

    let items: Vec<ListItem> = picker
        .items
        .iter()
        .map(|item| ListItem::new(item.label.clone()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(picker.title())
                .title_alignment(Alignment::Center),
        )
        .style(Style::default().fg(Palette::FG).bg(Palette::BG))
        .highlight_style(
            Style::default()
                .fg(contrast_text_color(Palette::HIGHLIGHT_BG))
                .bg(Palette::HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(picker.selected));
    f.render_stateful_widget(list, popup, &mut state);
}
