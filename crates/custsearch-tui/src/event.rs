//! Semantic application events: crossterm events mapped to a widget-agnostic
//! vocabulary so widgets never touch crossterm directly.
//!
//! # Usage
//!
//! In the main event loop, call [`to_app_event_insert`] while the search box
//! has focus and [`to_app_event`] otherwise, then match on the returned
//! [`AppEvent`].
//!
//! # Keybindings
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `q` (unfocused), `Ctrl+c` | `Quit`                   |
//! | `Tab`                   | `FocusNext`                |
//! | `/`  (unfocused)        | `SearchFocus`              |
//! | `↑` / `↓`               | `Nav(Up)` / `Nav(Down)`    |
//! | `←` / `→`               | `Nav(Left)` / `Nav(Right)` |
//! | `Ctrl+u`                | `Clear`                    |
//! | `F1`, `?` (unfocused)   | `Help`                     |
//! | printable char          | `Char(c)`                  |
//! | `Backspace`             | `Backspace`                |
//! | `Enter`                 | `Enter`                    |
//! | `Esc`                   | `Escape`                   |
//! | left click              | `Click { column, row }`    |
//! | mouse move              | `Hover { column, row }`    |
//! | terminal focus change   | `FocusGained` / `FocusLost`|
//! | terminal resize         | `Resize(w, h)`             |

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};

/// Arrow direction; up/down move the highlight, left/right the text cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Toggle keyboard focus between the search box and the status pane.
    FocusNext,
    /// Move focus into the search box.
    SearchFocus,
    Nav(Direction),
    Char(char),
    Backspace,
    Enter,
    Escape,
    /// Empty the search box.
    Clear,
    Help,
    Click { column: u16, row: u16 },
    Hover { column: u16, row: u16 },
    /// The terminal window itself gained or lost focus.
    FocusGained,
    FocusLost,
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] while the search box is *not* focused.
///
/// Returns `None` for events that carry no meaning for the application
/// (key-release events, unbound keys, scroll wheel).
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) => map_key(key),
        other => map_non_key(other),
    }
}

/// Map a raw crossterm [`Event`] while the search box has focus.
///
/// Every printable character types itself, including `q`, `/` and `?`.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) => map_key_insert(key),
        other => map_non_key(other),
    }
}

fn map_non_key(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::FocusGained => Some(AppEvent::FocusGained),
        Event::FocusLost => Some(AppEvent::FocusLost),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(AppEvent::Click {
                column: mouse.column,
                row: mouse.row,
            }),
            MouseEventKind::Moved => Some(AppEvent::Hover {
                column: mouse.column,
                row: mouse.row,
            }),
            _ => None,
        },
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),
        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),
        Char('/') if key.modifiers == Mod::NONE => Some(AppEvent::SearchFocus),
        Char('?') | F(1) => Some(AppEvent::Help),
        Esc => Some(AppEvent::Escape),
        _ => None,
    }
}

fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        // Ctrl+c always quits, even while typing
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),
        Char('u') if key.modifiers == Mod::CONTROL => Some(AppEvent::Clear),

        Up => Some(AppEvent::Nav(Direction::Up)),
        Down => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),
        F(1) => Some(AppEvent::Help),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn press(code: KeyCode) -> Event {
        key(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> Event {
        key(code, KeyModifiers::CONTROL)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn quit_keys() {
        assert_eq!(to_app_event(press(KeyCode::Char('q'))), Some(AppEvent::Quit));
        assert_eq!(to_app_event(ctrl(KeyCode::Char('c'))), Some(AppEvent::Quit));
        assert_eq!(to_app_event_insert(ctrl(KeyCode::Char('c'))), Some(AppEvent::Quit));
    }

    #[test]
    fn search_focus_and_help_when_unfocused() {
        assert_eq!(to_app_event(press(KeyCode::Char('/'))), Some(AppEvent::SearchFocus));
        assert_eq!(to_app_event(press(KeyCode::Char('?'))), Some(AppEvent::Help));
        assert_eq!(to_app_event(press(KeyCode::F(1))), Some(AppEvent::Help));
    }

    #[test]
    fn insert_mode_shortcut_letters_are_chars() {
        for ch in ['q', '/', '?', 'j', 'k'] {
            assert_eq!(
                to_app_event_insert(press(KeyCode::Char(ch))),
                Some(AppEvent::Char(ch)),
                "insert mode: '{ch}' should type itself"
            );
        }
        assert_eq!(
            to_app_event_insert(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(AppEvent::Char('A'))
        );
    }

    #[test]
    fn insert_mode_arrows_navigate() {
        assert_eq!(
            to_app_event_insert(press(KeyCode::Down)),
            Some(AppEvent::Nav(Direction::Down))
        );
        assert_eq!(
            to_app_event_insert(press(KeyCode::Up)),
            Some(AppEvent::Nav(Direction::Up))
        );
        assert_eq!(
            to_app_event_insert(press(KeyCode::Left)),
            Some(AppEvent::Nav(Direction::Left))
        );
    }

    #[test]
    fn insert_mode_editing_keys() {
        assert_eq!(to_app_event_insert(press(KeyCode::Backspace)), Some(AppEvent::Backspace));
        assert_eq!(to_app_event_insert(press(KeyCode::Enter)), Some(AppEvent::Enter));
        assert_eq!(to_app_event_insert(press(KeyCode::Esc)), Some(AppEvent::Escape));
        assert_eq!(to_app_event_insert(ctrl(KeyCode::Char('u'))), Some(AppEvent::Clear));
        assert_eq!(to_app_event_insert(press(KeyCode::Tab)), Some(AppEvent::FocusNext));
    }

    #[test]
    fn mouse_and_focus_events() {
        assert_eq!(
            to_app_event(mouse(MouseEventKind::Down(MouseButton::Left), 4, 7)),
            Some(AppEvent::Click { column: 4, row: 7 })
        );
        assert_eq!(
            to_app_event_insert(mouse(MouseEventKind::Moved, 1, 2)),
            Some(AppEvent::Hover { column: 1, row: 2 })
        );
        assert_eq!(to_app_event(mouse(MouseEventKind::ScrollDown, 0, 0)), None);
        assert_eq!(to_app_event(Event::FocusLost), Some(AppEvent::FocusLost));
        assert_eq!(to_app_event_insert(Event::FocusGained), Some(AppEvent::FocusGained));
    }

    #[test]
    fn resize_event() {
        assert_eq!(to_app_event(Event::Resize(120, 40)), Some(AppEvent::Resize(120, 40)));
    }

    #[test]
    fn unbound_key_returns_none() {
        assert_eq!(to_app_event(press(KeyCode::F(5))), None);
        assert_eq!(to_app_event(press(KeyCode::Char('x'))), None);
    }
}
