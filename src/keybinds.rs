use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use quadfall_engine::Command;

/// Which gameplay command a key chord triggers while a round is running.
/// Menu screens keep their own fixed navigation keys.
pub type Keybinds = HashMap<(KeyCode, KeyModifiers), Command>;

pub fn normalize((mut code, modifiers): (KeyCode, KeyModifiers)) -> (KeyCode, KeyModifiers) {
    // Normalize character keycodes to lowercase so Shift or Caps Lock does
    // not silently unbind a key.
    if let KeyCode::Char(ref mut char) = code {
        *char = char.to_ascii_lowercase();
    }

    (code, modifiers)
}

pub fn default_keybinds() -> Keybinds {
    let keybinds: [((KeyCode, KeyModifiers), Command); 6] = [
        (KeyCode::Left, Command::MoveLeft),
        (KeyCode::Right, Command::MoveRight),
        (KeyCode::Down, Command::SoftDrop),
        (KeyCode::Char('z'), Command::Rotate),
        (KeyCode::Up, Command::Rotate),
        (KeyCode::Char('x'), Command::HardDrop),
    ]
    .map(|(k, c)| ((k, KeyModifiers::NONE), c));
    HashMap::from(keybinds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_characters() {
        assert_eq!(
            normalize((KeyCode::Char('Z'), KeyModifiers::SHIFT)),
            (KeyCode::Char('z'), KeyModifiers::SHIFT)
        );
        assert_eq!(
            normalize((KeyCode::Left, KeyModifiers::NONE)),
            (KeyCode::Left, KeyModifiers::NONE)
        );
    }

    #[test]
    fn default_binds_cover_all_gameplay_commands() {
        let binds = default_keybinds();
        for command in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::Rotate,
            Command::HardDrop,
        ] {
            assert!(
                binds.values().any(|&c| c == command),
                "{command:?} unbound"
            );
        }
    }
}
