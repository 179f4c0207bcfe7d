use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, AppMode};
use crate::components::help::HelpOverlay;

/// Lines moved by a half-page content scroll.
const CONTENT_PAGE: usize = 10;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode {
        AppMode::Help => handle_help_key(app, key),
        AppMode::Query => handle_query_key(app, key),
        AppMode::Normal => handle_normal_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => {
            app.help_scroll = 0;
            app.mode = AppMode::Help;
        }
        KeyCode::Char('/') => app.enter_query_mode(),
        KeyCode::Esc if !app.query.is_empty() => app.query_clear(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_view(),

        KeyCode::Char('r') if ctrl => app.reload(),
        KeyCode::Char('r') => app.reset(),

        KeyCode::Char(']') => app.jump_to_match(true),
        KeyCode::Char('[') => app.jump_to_match(false),
        KeyCode::Char('n') => app.next_file(),
        KeyCode::Char('p') => app.previous_file(),

        KeyCode::Char('d') if ctrl => app.content.scroll_down(CONTENT_PAGE),
        KeyCode::Char('u') if ctrl => app.content.scroll_up(CONTENT_PAGE),
        KeyCode::PageDown => app.content.scroll_down(CONTENT_PAGE),
        KeyCode::PageUp => app.content.scroll_up(CONTENT_PAGE),

        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.move_first(),
        KeyCode::Char('G') | KeyCode::End => app.move_last(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate(),
        KeyCode::Char('l') | KeyCode::Right => app.expand(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => app.collapse(),
        _ => {}
    }
}

fn handle_query_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_query(),
        KeyCode::Esc => app.cancel_query(),
        KeyCode::Backspace => app.query_pop(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.query_clear(),
        KeyCode::Char(c) => app.query_push(c),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    let max = HelpOverlay::total_lines().saturating_sub(1);
    match key.code {
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => app.mode = AppMode::Normal,
        KeyCode::Char('j') | KeyCode::Down => app.help_scroll = (app.help_scroll + 1).min(max),
        KeyCode::Char('k') | KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
        KeyCode::Char('g') | KeyCode::Home => app.help_scroll = 0,
        KeyCode::Char('G') | KeyCode::End => app.help_scroll = max,
        _ => {}
    }
}

/// Handle a mouse event.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != AppMode::Normal {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.click(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.scroll(mouse.column, mouse.row, true),
        MouseEventKind::ScrollUp => app.scroll(mouse.column, mouse.row, false),
        _ => {}
    }
}
