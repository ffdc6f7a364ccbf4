use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::tui::app::{App, Mode, SidebarState, Tab};
use crate::tui::layout::Layout;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::dashboard::render_dashboard;
use crate::tui::widgets::feedback_view::render_feedback_tab;
use crate::tui::widgets::form::render_reports_tab;
use crate::tui::widgets::help::render_help;
use crate::tui::widgets::picker::render_picker;
use crate::tui::widgets::settings_view::render_settings_view;
use crate::tui::widgets::sidebar::render_sidebar;
use crate::tui::widgets::status_bar::render_status_bar;
use crate::tui::widgets::tabs::render_tabs;
use crate::utils::format_key_binding_for_display as key;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Intern Track")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Palette::FG).bg(Palette::BG));
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab);

    if app.ui.sidebar_state == SidebarState::Expanded && layout.sidebar_area.width > 0 {
        render_sidebar(f, layout.sidebar_area, app);
    }

    match app.ui.current_tab {
        Tab::Dashboard => render_dashboard(f, layout.main_area, app),
        Tab::Reports => render_reports_tab(f, layout.main_area, &app.reports, &mut app.ui),
        Tab::Feedback => render_feedback_tab(f, layout.main_area, &app.feedback, &mut app.ui),
        Tab::Settings => render_settings_view(f, layout.main_area, &app.config, &app.settings, &mut app.ui),
    }

    // Overlays go after the normal content
    match app.ui.mode {
        Mode::Picker => {
            if let Some(ref picker) = app.ui.picker {
                render_picker(f, f.area(), picker);
            }
        }
        Mode::Help => render_help(f, f.area(), &app.config.key_bindings),
        Mode::Browse | Mode::Edit => {}
    }

    let key_hints = get_key_hints(app);
    let backend_label = app.backend.describe();
    render_status_bar(f, layout.status_area, &app.status, &backend_label, &key_hints);
}

pub fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    match app.ui.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", key(&kb.help))],
        Mode::Picker => vec![
            "↑/↓: Move".to_string(),
            format!("{}: Choose", key(&kb.select)),
            "Esc: Cancel".to_string(),
        ],
        Mode::Edit => {
            let mut hints = vec!["Esc: Done".to_string(), "Tab: Next field".to_string()];
            if app.ui.editor.is_multi_line() {
                hints.push("Enter: New line".to_string());
            }
            hints.push(format!("{}: Save", key(&kb.save)));
            hints
        }
        Mode::Browse => {
            let mut hints = vec![
                format!("{}: Quit", key(&kb.quit)),
                format!("{}: Edit", key(&kb.select)),
            ];
            match app.ui.current_tab {
                Tab::Dashboard => hints.push(format!("{}: Save now", key(&kb.save))),
                Tab::Reports => {
                    hints.push(format!("{}: Submit", key(&kb.save)));
                    hints.push(format!("{}: Suggestions", key(&kb.suggest)));
                    hints.push(format!("{}: Remove tag", key(&kb.remove_tag)));
                    hints.push(format!("{}: Clear", key(&kb.clear_form)));
                }
                Tab::Feedback => {
                    hints.push(format!("{}/{}: Rating", key(&kb.rating_up), key(&kb.rating_down)));
                    hints.push(format!("{}: Submit", key(&kb.save)));
                }
                Tab::Settings => hints.push(format!("{}: Save profile", key(&kb.save))),
            }
            hints.push(format!("{}: Toggle sidebar", key(&kb.toggle_sidebar)));
            hints.push(format!("{}: Help", key(&kb.help)));
            hints
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryBackend;
    use crate::config::Config;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App {
        let config = Config::default();
        let backend = InMemoryBackend::with_sample_history(config.catalog());
        App::new(config, dir.path().join("config.toml"), Box::new(backend))
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|f| {
                let layout = Layout::calculate(Rect::new(0, 0, 140, 40), app.config.sidebar_width_percent, false);
                render(f, app, &layout);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_every_tab_renders() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        for tab in Tab::ALL {
            app.switch_tab(tab);
            let screen = draw(&mut app);
            assert!(screen.contains("Intern Track"));
            assert!(screen.contains(tab.title()));
        }
    }

    #[test]
    fn test_reports_tab_shows_history() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.switch_tab(Tab::Reports);
        let screen = draw(&mut app);
        assert!(screen.contains("Recent Tasks (3)"));
        assert!(screen.contains("Task Description"));
    }

    #[test]
    fn test_picker_overlay() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.switch_tab(Tab::Reports);
        app.reports.field_index = 1;
        app.activate_focused();
        let screen = draw(&mut app);
        assert!(screen.contains("Select Category"));
        assert!(screen.contains("Documentation"));
    }

    #[test]
    fn test_hints_follow_mode() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        assert!(get_key_hints(&app).contains(&"q: Quit".to_string()));
        app.toggle_help();
        assert_eq!(get_key_hints(&app), vec!["Esc or F1: Exit help".to_string()]);
    }
}
