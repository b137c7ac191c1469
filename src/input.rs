use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::grid::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    TogglePause,
    Restart,
    BoardMenu,
    Help,
    /// A digit, used to pick a board preset (1-based).
    Digit(u8),
    Confirm,
    Quit,
    None,
}

pub fn map_key(key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Move(Direction::Top),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            KeyAction::Move(Direction::Bottom)
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            KeyAction::Move(Direction::Left)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            KeyAction::Move(Direction::Right)
        }

        KeyCode::Esc | KeyCode::Char(' ') => KeyAction::TogglePause,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
        KeyCode::Char('b') | KeyCode::Char('B') => KeyAction::BoardMenu,
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => KeyAction::Help,
        KeyCode::Char(c @ '1'..='9') => KeyAction::Digit(c as u8 - b'0'),
        KeyCode::Enter => KeyAction::Confirm,
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(map_key(key(KeyCode::Up)), KeyAction::Move(Direction::Top));
        assert_eq!(map_key(key(KeyCode::Down)), KeyAction::Move(Direction::Bottom));
        assert_eq!(map_key(key(KeyCode::Left)), KeyAction::Move(Direction::Left));
        assert_eq!(map_key(key(KeyCode::Right)), KeyAction::Move(Direction::Right));
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(map_key(key(KeyCode::Char('w'))), KeyAction::Move(Direction::Top));
        assert_eq!(map_key(key(KeyCode::Char('s'))), KeyAction::Move(Direction::Bottom));
        assert_eq!(map_key(key(KeyCode::Char('a'))), KeyAction::Move(Direction::Left));
        assert_eq!(map_key(key(KeyCode::Char('D'))), KeyAction::Move(Direction::Right));
    }

    #[test]
    fn test_pause_keys() {
        assert_eq!(map_key(key(KeyCode::Esc)), KeyAction::TogglePause);
        assert_eq!(map_key(key(KeyCode::Char(' '))), KeyAction::TogglePause);
    }

    #[test]
    fn test_menu_keys() {
        assert_eq!(map_key(key(KeyCode::Char('r'))), KeyAction::Restart);
        assert_eq!(map_key(key(KeyCode::Char('b'))), KeyAction::BoardMenu);
        assert_eq!(map_key(key(KeyCode::Char('?'))), KeyAction::Help);
        assert_eq!(map_key(key(KeyCode::Char('3'))), KeyAction::Digit(3));
        assert_eq!(map_key(key(KeyCode::Enter)), KeyAction::Confirm);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), KeyAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(map_key(key(KeyCode::Char('x'))), KeyAction::None);
        assert_eq!(map_key(key(KeyCode::Tab)), KeyAction::None);
    }
}
