use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::config::Config;
use crate::tui::app::{EditTarget, ProfileField, SettingsState, Tab, UiState};
use crate::tui::widgets::color::{contrast_text_color, Palette};
use crate::tui::widgets::form::editor_for;
use crate::utils::format_key_binding_for_display;

const LABEL_WIDTH: u16 = 22;

pub fn render_settings_view(f: &mut Frame, area: Rect, config: &Config, settings: &SettingsState, ui: &mut UiState) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(ProfileField::ALL.len() as u16 + 2),
            Constraint::Min(5),
        ])
        .split(area);

    let title = if settings.dirty {
        format!("Profile (unsaved, {} to save)", format_key_binding_for_display(&config.key_bindings.save))
    } else {
        "Profile".to_string()
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(rows[0]);
    f.render_widget(block, rows[0]);

    let on_tab = ui.current_tab == Tab::Settings;
    for (i, field) in ProfileField::ALL.iter().copied().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let row = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        let focused = on_tab && settings.field() == field;
        render_profile_row(f, row, config, field, focused, ui);
    }

    render_app_settings(f, rows[1], config);
}

fn render_profile_row(f: &mut Frame, row: Rect, config: &Config, field: ProfileField, focused: bool, ui: &mut UiState) {
    let label_style = if focused {
        Style::default()
            .fg(contrast_text_color(Palette::HIGHLIGHT_BG))
            .bg(Palette::HIGHLIGHT_BG)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Palette::MUTED)
    };
    let label_area = Rect::new(row.x, row.y, LABEL_WIDTH.min(row.width), 1);
    let value_area = Rect::new(
        row.x + label_area.width,
        row.y,
        row.width.saturating_sub(label_area.width),
        1,
    );
    f.render_widget(
        Paragraph::new(Span::styled(format!(" {:<width$}", field.label(), width = LABEL_WIDTH as usize - 1), label_style)),
        label_area,
    );

    if let Some(editor) = editor_for(ui, EditTarget::Profile(field)) {
        editor.update_horizontal_scroll(value_area.width as usize);
        let text = editor
            .visible_lines(1, value_area.width as usize)
            .into_iter()
            .next()
            .unwrap_or_default();
        f.render_widget(Paragraph::new(text), value_area);
        if let Some(pos) = editor.cursor_screen_pos(value_area) {
            f.set_cursor_position(pos);
        }
        return;
    }

    let value = match field.flag(&config.profile) {
        Some(true) => Line::from(Span::styled("● On", Style::default().fg(Palette::SUCCESS))),
        Some(false) => Line::from(Span::styled("○ Off", Style::default().fg(Palette::MUTED))),
        None => {
            let text = field.text(&config.profile);
            if text.is_empty() {
                Line::from(Span::styled("-", Style::default().fg(Palette::MUTED)))
            } else {
                Line::from(text.to_string())
            }
        }
    };
    f.render_widget(Paragraph::new(value), value_area);
}

fn render_app_settings(f: &mut Frame, area: Rect, config: &Config) {
    let api = config.api_base_url.as_deref().unwrap_or("(in-memory)");
    let lines = vec![
        Line::from(format!("API base URL:     {}", api)),
        Line::from(format!("Attachment:       {} to {}", config.progress_start, config.progress_end)),
        Line::from(format!("Autosave delay:   {} ms", config.autosave_quiet_ms)),
        Line::from(format!("Request timeout:  {} s", config.request_timeout_secs)),
        Line::from(Span::styled(
            "Edit the config file to change these",
            Style::default().fg(Palette::MUTED),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Application")),
        area,
    );
}
