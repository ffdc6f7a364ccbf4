use std::io;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use crate::config::KeyBindings;
use crate::tui::app::{Mode, SidebarState, Tab};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::App;
use crate::utils::{has_primary_modifier, parse_key_binding, ParsedKeyBinding};

/// Upper bound on how long the loop blocks waiting for input
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Guard that ensures terminal state is restored even on panic
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; the guard does nothing on drop afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors in drop - we're already in a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

/// Key bindings from the config, parsed once per session
pub struct KeyMap {
    quit: ParsedKeyBinding,
    toggle_sidebar: ParsedKeyBinding,
    save: ParsedKeyBinding,
    clear_form: ParsedKeyBinding,
    select: ParsedKeyBinding,
    list_up: ParsedKeyBinding,
    list_down: ParsedKeyBinding,
    tab_left: ParsedKeyBinding,
    tab_right: ParsedKeyBinding,
    tabs: [ParsedKeyBinding; 4],
    help: ParsedKeyBinding,
    suggest: ParsedKeyBinding,
    remove_tag: ParsedKeyBinding,
    tag_prev: ParsedKeyBinding,
    tag_next: ParsedKeyBinding,
    rating_up: ParsedKeyBinding,
    rating_down: ParsedKeyBinding,
    refresh: ParsedKeyBinding,
}

impl KeyMap {
    pub fn from_config(bindings: &KeyBindings) -> Result<Self, TuiError> {
        let parse = |s: &str| parse_key_binding(s).map_err(TuiError::KeyBindingError);
        Ok(Self {
            quit: parse(&bindings.quit)?,
            toggle_sidebar: parse(&bindings.toggle_sidebar)?,
            save: parse(&bindings.save)?,
            clear_form: parse(&bindings.clear_form)?,
            select: parse(&bindings.select)?,
            list_up: parse(&bindings.list_up)?,
            list_down: parse(&bindings.list_down)?,
            tab_left: parse(&bindings.tab_left)?,
            tab_right: parse(&bindings.tab_right)?,
            tabs: [
                parse(&bindings.tab_1)?,
                parse(&bindings.tab_2)?,
                parse(&bindings.tab_3)?,
                parse(&bindings.tab_4)?,
            ],
            help: parse(&bindings.help)?,
            suggest: parse(&bindings.suggest)?,
            remove_tag: parse(&bindings.remove_tag)?,
            tag_prev: parse(&bindings.tag_prev)?,
            tag_next: parse(&bindings.tag_next)?,
            rating_up: parse(&bindings.rating_up)?,
            rating_down: parse(&bindings.rating_down)?,
            refresh: parse(&bindings.refresh)?,
        })
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering alternate screen so the message
    // lands in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;
    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let keys = KeyMap::from_config(&app.config.key_bindings)?;

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut app, &keys, &mut terminal);

    // Timers are released on every exit path, errors included
    app.shutdown();
    guard.restore()?;
    result
}

fn run_loop(
    app: &mut App,
    keys: &KeyMap,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), TuiError> {
    loop {
        let now = Instant::now();
        app.tick(now, Utc::now());

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(
                terminal_rect,
                app.config.sidebar_width_percent,
                app.ui.sidebar_state == SidebarState::Collapsed,
            );
            crate::tui::render::render(f, app, &layout);
        })?;

        // The Submitting state is on screen now; the blocking call can run
        if app.has_pending_submission() {
            app.run_pending_submission();
            continue;
        }

        let timeout = app
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(MAX_POLL_INTERVAL)
            .min(MAX_POLL_INTERVAL);

        if event::poll(timeout)? {
            match event::read()? {
                // Only Press events, Windows also reports Release
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if handle_key_event(app, keys, key_event, Instant::now()) {
                        return Ok(());
                    }
                }
                // Resize is picked up by terminal.size() on the next draw
                _ => {}
            }
        }
    }
}

/// Dispatch a key press. Returns true when the user asked to quit.
pub fn handle_key_event(app: &mut App, keys: &KeyMap, key_event: KeyEvent, now: Instant) -> bool {
    match app.ui.mode {
        Mode::Help => {
            handle_help_mode(app, keys, key_event);
            false
        }
        Mode::Picker => {
            handle_picker_mode(app, keys, key_event);
            false
        }
        Mode::Edit => {
            handle_edit_mode(app, keys, key_event, now);
            false
        }
        Mode::Browse => handle_browse_mode(app, keys, key_event),
    }
}

fn handle_help_mode(app: &mut App, keys: &KeyMap, key_event: KeyEvent) {
    if key_event.code == KeyCode::Esc || keys.help.matches(&key_event) {
        app.toggle_help();
    }
}

fn handle_picker_mode(app: &mut App, keys: &KeyMap, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => app.picker_cancel(),
        KeyCode::Up => app.picker_move(false),
        KeyCode::Down | KeyCode::Tab => app.picker_move(true),
        KeyCode::BackTab => app.picker_move(false),
        _ if keys.select.matches(&key_event) => app.picker_confirm(),
        _ if keys.list_up.matches(&key_event) => app.picker_move(false),
        _ if keys.list_down.matches(&key_event) => app.picker_move(true),
        _ => {}
    }
}

fn handle_edit_mode(app: &mut App, keys: &KeyMap, key_event: KeyEvent, now: Instant) {
    if keys.save.matches(&key_event) {
        app.save();
        return;
    }
    if keys.clear_form.matches(&key_event) {
        app.clear_form();
        return;
    }
    if keys.help.matches(&key_event) {
        app.toggle_help();
        return;
    }

    match key_event.code {
        KeyCode::Esc => app.exit_edit_mode(),
        KeyCode::Tab => {
            app.exit_edit_mode();
            app.focus_next();
        }
        KeyCode::BackTab => {
            app.exit_edit_mode();
            app.focus_prev();
        }
        KeyCode::Enter => app.edit_enter(now),
        KeyCode::Backspace => app.edit_backspace(now),
        KeyCode::Delete => app.edit_delete(now),
        KeyCode::Left => app.ui.editor.move_cursor_left(),
        KeyCode::Right => app.ui.editor.move_cursor_right(),
        KeyCode::Up => app.ui.editor.move_cursor_up(),
        KeyCode::Down => app.ui.editor.move_cursor_down(),
        KeyCode::Home => app.ui.editor.move_cursor_home(),
        KeyCode::End => app.ui.editor.move_cursor_end(),
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => app.edit_insert_char(c, now),
        _ => {}
    }
}

fn handle_browse_mode(app: &mut App, keys: &KeyMap, key_event: KeyEvent) -> bool {
    if keys.quit.matches(&key_event) {
        return true;
    }
    if keys.help.matches(&key_event) {
        app.toggle_help();
    } else if keys.toggle_sidebar.matches(&key_event) {
        app.toggle_sidebar();
    } else if keys.tab_left.matches(&key_event) {
        let index = app.ui.current_tab.index();
        if index > 0 {
            app.switch_tab(Tab::ALL[index - 1]);
        }
    } else if keys.tab_right.matches(&key_event) {
        let index = app.ui.current_tab.index();
        if index + 1 < Tab::ALL.len() {
            app.switch_tab(Tab::ALL[index + 1]);
        }
    } else if let Some(tab) = keys.tabs.iter().position(|b| b.matches(&key_event)) {
        app.switch_tab(Tab::ALL[tab]);
    } else if keys.save.matches(&key_event) {
        app.save();
    } else if keys.clear_form.matches(&key_event) {
        app.clear_form();
    } else if keys.refresh.matches(&key_event) {
        app.refresh_remote_data();
        app.set_status_message("Refreshed".to_string());
    } else if keys.select.matches(&key_event) {
        app.activate_focused();
    } else if keys.suggest.matches(&key_event) {
        app.open_suggestions();
    } else if keys.remove_tag.matches(&key_event) {
        app.remove_selected_tag();
    } else if keys.tag_prev.matches(&key_event) {
        app.move_tag_cursor(false);
    } else if keys.tag_next.matches(&key_event) {
        app.move_tag_cursor(true);
    } else if keys.rating_up.matches(&key_event) {
        app.adjust_rating(true);
    } else if keys.rating_down.matches(&key_event) {
        app.adjust_rating(false);
    } else if keys.list_down.matches(&key_event) {
        app.focus_next();
    } else if keys.list_up.matches(&key_event) {
        app.focus_prev();
    } else {
        match key_event.code {
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
            _ => {}
        }
    }
    false
}
