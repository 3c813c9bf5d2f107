//! Key mapping from terminal events to console commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::{Button, CartridgeKind};

/// What a key does on the handheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Button(Button),
    Power,
    Insert(CartridgeKind),
    Eject,
    VolumeUp,
    VolumeDown,
    Quit,
}

/// The console button a key stands for, if any.
pub fn button_for_key(code: KeyCode) -> Option<Button> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Button::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Button::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Button::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Button::Right),
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Char('k') | KeyCode::Char('K') => {
            Some(Button::A)
        }
        KeyCode::Char('z') | KeyCode::Char('Z') | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(Button::B)
        }
        KeyCode::Enter => Some(Button::Start),
        KeyCode::Backspace | KeyCode::Tab => Some(Button::Select),
        _ => None,
    }
}

/// Map keyboard input to a console command.
pub fn map_key_event(key: KeyEvent) -> Option<ConsoleCommand> {
    if should_quit(key) {
        return Some(ConsoleCommand::Quit);
    }
    if let Some(button) = button_for_key(key.code) {
        return Some(ConsoleCommand::Button(button));
    }
    match key.code {
        KeyCode::Char('p') | KeyCode::Char('P') => Some(ConsoleCommand::Power),
        KeyCode::Char('1') => Some(ConsoleCommand::Insert(CartridgeKind::Tetris)),
        KeyCode::Char('2') => Some(ConsoleCommand::Insert(CartridgeKind::SpaceInvaders)),
        KeyCode::Char('3') => Some(ConsoleCommand::Insert(CartridgeKind::Zelda)),
        KeyCode::Char('0') => Some(ConsoleCommand::Eject),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(ConsoleCommand::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(ConsoleCommand::VolumeDown),
        _ => None,
    }
}

/// Check if key should quit the program.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(code: KeyCode) -> Option<ConsoleCommand> {
        map_key_event(KeyEvent::from(code))
    }

    #[test]
    fn test_dpad_keys() {
        assert_eq!(cmd(KeyCode::Left), Some(ConsoleCommand::Button(Button::Left)));
        assert_eq!(cmd(KeyCode::Char('D')), Some(ConsoleCommand::Button(Button::Right)));
        assert_eq!(cmd(KeyCode::Up), Some(ConsoleCommand::Button(Button::Up)));
        assert_eq!(cmd(KeyCode::Char('s')), Some(ConsoleCommand::Button(Button::Down)));
    }

    #[test]
    fn test_face_buttons() {
        assert_eq!(cmd(KeyCode::Char('x')), Some(ConsoleCommand::Button(Button::A)));
        assert_eq!(cmd(KeyCode::Char('J')), Some(ConsoleCommand::Button(Button::B)));
        assert_eq!(cmd(KeyCode::Enter), Some(ConsoleCommand::Button(Button::Start)));
        assert_eq!(cmd(KeyCode::Tab), Some(ConsoleCommand::Button(Button::Select)));
    }

    #[test]
    fn test_console_keys() {
        assert_eq!(cmd(KeyCode::Char('p')), Some(ConsoleCommand::Power));
        assert_eq!(
            cmd(KeyCode::Char('2')),
            Some(ConsoleCommand::Insert(CartridgeKind::SpaceInvaders))
        );
        assert_eq!(cmd(KeyCode::Char('0')), Some(ConsoleCommand::Eject));
        assert_eq!(cmd(KeyCode::Char('+')), Some(ConsoleCommand::VolumeUp));
        assert_eq!(cmd(KeyCode::Char('-')), Some(ConsoleCommand::VolumeDown));
        assert_eq!(cmd(KeyCode::Char('m')), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert_eq!(cmd(KeyCode::Char('Q')), Some(ConsoleCommand::Quit));
    }
}
