use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::daily_task::SubmitState;
use crate::tui::app::{EditTarget, ReportField, ReportsState, Tab, UiState};
use crate::tui::widgets::color::{category_color, contrast_text_color, Palette};
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::history::render_history;
use crate::tui::widgets::tags::tag_chips;

/// Static description of an input box
pub struct FieldView<'a> {
    pub title: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub focused: bool,
}

pub fn field_block(title: &str, focused: bool, editing: bool) -> Block<'_> {
    let border = if editing {
        Style::default().fg(Palette::HIGHLIGHT_BG)
    } else if focused {
        Style::default().fg(Palette::ACCENT)
    } else {
        Style::default().fg(Palette::MUTED)
    };
    let title_style = if focused || editing {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, title_style))
}

/// The shared editor, if it is currently writing into `target`
pub fn editor_for(ui: &mut UiState, target: EditTarget) -> Option<&mut Editor> {
    if ui.edit_target == Some(target) {
        Some(&mut ui.editor)
    } else {
        None
    }
}

/// Draw a text input. While `editor` is Some the live buffer is shown with a
/// cursor; otherwise the stored value (or the placeholder) is shown.
pub fn render_text_field(f: &mut Frame, area: Rect, field: FieldView<'_>, editor: Option<&mut Editor>) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    let editing = editor.is_some();
    let block = field_block(field.title, field.focused, editing);
    let inner = block.inner(area);

    match editor {
        Some(editor) => {
            editor.update_scroll(inner.height as usize);
            editor.update_horizontal_scroll(inner.width as usize);
            let lines: Vec<Line> = editor
                .visible_lines(inner.height as usize, inner.width as usize)
                .into_iter()
                .map(Line::from)
                .collect();
            f.render_widget(Paragraph::new(lines).block(block), area);
            if let Some(pos) = editor.cursor_screen_pos(inner) {
                f.set_cursor_position(pos);
            }
        }
        None => {
            let paragraph = if field.value.is_empty() {
                Paragraph::new(Span::styled(field.placeholder, Style::default().fg(Palette::MUTED)))
            } else {
                Paragraph::new(field.value)
            };
            f.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);
        }
    }
}

pub fn render_reports_tab(f: &mut Frame, area: Rect, reports: &ReportsState, ui: &mut UiState) {
    // History column only when there is room for both
    if area.width >= 100 {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        render_report_form(f, columns[0], reports, ui);
        render_history(f, columns[1], reports);
    } else {
        render_report_form(f, area, reports, ui);
    }
}

pub fn render_report_form(f: &mut Frame, area: Rect, reports: &ReportsState, ui: &mut UiState) {
    if area.width < 4 || area.height < 4 {
        return;
    }
    let on_tab = ui.current_tab == Tab::Reports;
    let current = reports.field();
    let focused = |field: ReportField| on_tab && current == field;
    let form = reports.controller.form();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Submission state
            Constraint::Min(5),    // Description
            Constraint::Length(3), // Category
            Constraint::Length(3), // Hours
            Constraint::Length(4), // Tools
            Constraint::Length(4), // Skills
            Constraint::Min(4),    // Weekly brief
        ])
        .split(area);

    f.render_widget(Paragraph::new(submit_state_line(reports.controller.state())), rows[0]);

    let description_focused = focused(ReportField::Description);
    render_text_field(
        f,
        rows[1],
        FieldView {
            title: ReportField::Description.label(),
            value: &form.description,
            placeholder: "Describe what you worked on today...",
            focused: description_focused,
        },
        editor_for(ui, EditTarget::Description),
    );

    render_category_field(f, rows[2], reports, focused(ReportField::Category));

    let hours_focused = focused(ReportField::Hours);
    render_text_field(
        f,
        rows[3],
        FieldView {
            title: ReportField::Hours.label(),
            value: &reports.hours_input,
            placeholder: "0.0 - 24.0",
            focused: hours_focused,
        },
        editor_for(ui, EditTarget::Hours),
    );

    let tools_focused = focused(ReportField::Tools);
    render_tag_field(
        f,
        rows[4],
        ReportField::Tools.label(),
        form.tools.as_slice(),
        tools_focused.then_some(reports.tool_cursor),
        &reports.tool_input,
        editor_for(ui, EditTarget::ToolInput),
    );

    let skills_focused = focused(ReportField::Skills);
    render_tag_field(
        f,
        rows[5],
        ReportField::Skills.label(),
        form.skills.as_slice(),
        skills_focused.then_some(reports.skill_cursor),
        &reports.skill_input,
        editor_for(ui, EditTarget::SkillInput),
    );

    let brief_focused = focused(ReportField::WeeklyBrief);
    render_text_field(
        f,
        rows[6],
        FieldView {
            title: ReportField::WeeklyBrief.label(),
            value: &reports.weekly_brief,
            placeholder: "Summarize your week...",
            focused: brief_focused,
        },
        editor_for(ui, EditTarget::WeeklyBrief),
    );
}

fn submit_state_line(state: &SubmitState) -> Line<'static> {
    match state {
        SubmitState::Editing => Line::from(Span::styled(
            "Daily Task Report",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        SubmitState::Submitting => Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(Palette::WARNING).add_modifier(Modifier::BOLD),
        )),
        SubmitState::SubmittedSuccess(task) => Line::from(Span::styled(
            format!("Submitted report #{} ({} h)", task.id, task.hours_spent),
            Style::default().fg(Palette::SUCCESS),
        )),
        SubmitState::SubmittedError(message) => {
            Line::from(Span::styled(message.clone(), Style::default().fg(Palette::ERROR)))
        }
    }
}

fn render_category_field(f: &mut Frame, area: Rect, reports: &ReportsState, focused: bool) {
    let block = field_block(ReportField::Category.label(), focused, false);
    let form = reports.controller.form();
    let line = match reports.controller.catalog().category(&form.category) {
        Some(category) => {
            let bg = category_color(category);
            Line::from(vec![
                Span::styled(
                    format!(" {} ", category.name),
                    Style::default().fg(contrast_text_color(bg)).bg(bg),
                ),
                Span::raw(" "),
                Span::styled(
                    category.description.clone().unwrap_or_default(),
                    Style::default().fg(Palette::MUTED),
                ),
            ])
        }
        None => Line::from(Span::styled(
            "Select a category (Enter)",
            Style::default().fg(Palette::MUTED),
        )),
    };
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_tag_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    tags: &[String],
    selected: Option<usize>,
    input: &str,
    editor: Option<&mut Editor>,
) {
    let focused = selected.is_some();
    let editing = editor.is_some();
    let block = field_block(title, focused, editing);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let chips = Rect::new(inner.x, inner.y, inner.width, 1);
    f.render_widget(Paragraph::new(Line::from(tag_chips(tags, selected))), chips);

    if inner.height < 2 {
        return;
    }
    let prompt = "+ ";
    let input_area = Rect::new(
        inner.x + prompt.len() as u16,
        inner.y + 1,
        inner.width.saturating_sub(prompt.len() as u16),
        1,
    );
    f.render_widget(
        Paragraph::new(Span::styled(prompt, Style::default().fg(Palette::MUTED))),
        Rect::new(inner.x, inner.y + 1, inner.width.min(prompt.len() as u16), 1),
    );

    match editor {
        Some(editor) => {
            editor.update_horizontal_scroll(input_area.width as usize);
            let text = editor
                .visible_lines(1, input_area.width as usize)
                .into_iter()
                .next()
                .unwrap_or_default();
            f.render_widget(Paragraph::new(text), input_area);
            if let Some(pos) = editor.cursor_screen_pos(input_area) {
                f.set_cursor_position(pos);
            }
        }
        None if input.is_empty() => {
            let hint = if focused { "Enter to type, s for suggestions" } else { "" };
            f.render_widget(
                Paragraph::new(Span::styled(hint, Style::default().fg(Palette::MUTED))),
                input_area,
            );
        }
        None => f.render_widget(Paragraph::new(input), input_area),
    }
}
