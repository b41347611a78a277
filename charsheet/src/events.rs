//! Event handling for the character builder TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use charsheet_core::Delta;

use crate::app::App;
use crate::ui::Overlay;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    match key.code {
        KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),
        KeyCode::Char('q') | KeyCode::Esc => return EventResult::Quit,

        // Navigation
        KeyCode::Tab | KeyCode::BackTab => app.cycle_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Char(']') => app.next_character(),
        KeyCode::Char('[') => app.previous_character(),

        // Changes
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') | KeyCode::Right => {
            app.change_focused(Delta::Increase)
        }
        KeyCode::Char('-') | KeyCode::Char('h') | KeyCode::Left => {
            app.change_focused(Delta::Decrease)
        }
        KeyCode::Char('n') => app.add_character(),
        KeyCode::Char('x') => app.remove_character(),

        // Skill checks
        KeyCode::Char('c') => app.roll_check(),
        KeyCode::Char('p') => app.roll_party_check(),
        KeyCode::Char('d') => app.lower_dc(),
        KeyCode::Char('D') => app.raise_dc(),
        KeyCode::Char('a') => app.cycle_advantage(),

        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Notices close on any key; help only on its own keys.
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    let help_open = matches!(app.overlay(), Some(Overlay::Help));
    let closes = !help_open
        || matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter
        );
    if closes {
        app.close_overlay();
        EventResult::NeedsRedraw
    } else {
        EventResult::Continue
    }
}
