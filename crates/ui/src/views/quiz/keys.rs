use dioxus::prelude::{Key, Modifiers};

use quiz_core::input::{KeyCode, KeyCombo};

/// Translate a webview key event into the combination the input policy checks.
///
/// Cmd counts as the primary modifier so macOS shortcuts map like Ctrl ones.
pub(super) fn combo_from_key(key: &Key, modifiers: Modifiers) -> Option<KeyCombo> {
    let key = match key {
        Key::Character(text) => {
            let mut chars = text.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(c.to_ascii_lowercase())
        }
        other => KeyCode::Function(function_number(other)?),
    };

    Some(KeyCombo {
        key,
        primary: modifiers.contains(Modifiers::CONTROL) || modifiers.contains(Modifiers::META),
        shift: modifiers.contains(Modifiers::SHIFT),
        alt: modifiers.contains(Modifiers::ALT),
    })
}

fn function_number(key: &Key) -> Option<u8> {
    Some(match key {
        Key::F1 => 1,
        Key::F2 => 2,
        Key::F3 => 3,
        Key::F4 => 4,
        Key::F5 => 5,
        Key::F6 => 6,
        Key::F7 => 7,
        Key::F8 => 8,
        Key::F9 => 9,
        Key::F10 => 10,
        Key::F11 => 11,
        Key::F12 => 12,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::combo_from_key;
    use dioxus::prelude::{Key, Modifiers};
    use quiz_core::input::{BlockReason, InputPolicy, InputVerdict, KeyCode, KeyCombo};

    fn verdict(key: Key, modifiers: Modifiers) -> InputVerdict {
        let combo = combo_from_key(&key, modifiers).expect("mappable key");
        InputPolicy::proctored().check(&combo)
    }

    #[test]
    fn ctrl_and_cmd_both_count_as_primary() {
        let ctrl = combo_from_key(&Key::Character("c".into()), Modifiers::CONTROL);
        let cmd = combo_from_key(&Key::Character("c".into()), Modifiers::META);
        assert_eq!(ctrl, Some(KeyCombo::primary('c')));
        assert_eq!(cmd, ctrl);
    }

    #[test]
    fn shifted_letters_are_normalized() {
        assert_eq!(
            verdict(
                Key::Character("I".into()),
                Modifiers::CONTROL | Modifiers::SHIFT
            ),
            InputVerdict::Block(BlockReason::DevTools)
        );
        assert_eq!(
            verdict(Key::Character("V".into()), Modifiers::CONTROL),
            InputVerdict::Block(BlockReason::Paste)
        );
    }

    #[test]
    fn function_keys_map_and_others_are_ignored() {
        assert_eq!(
            combo_from_key(&Key::F12, Modifiers::empty()),
            Some(KeyCombo::plain(KeyCode::Function(12)))
        );
        assert_eq!(
            verdict(Key::F5, Modifiers::empty()),
            InputVerdict::Allow
        );
        assert_eq!(combo_from_key(&Key::Enter, Modifiers::empty()), None);
        assert_eq!(
            combo_from_key(&Key::Character("ab".into()), Modifiers::CONTROL),
            None
        );
    }

    #[test]
    fn plain_typing_is_allowed() {
        assert_eq!(
            verdict(Key::Character("c".into()), Modifiers::empty()),
            InputVerdict::Allow
        );
    }
}
