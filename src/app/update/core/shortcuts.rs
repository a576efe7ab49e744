use super::super::super::messages::Message;
use super::super::super::state::App;
use iced::keyboard::{Key, Modifiers, key};

impl App {
    pub(super) fn shortcut_message_for_key(
        &self,
        key: Key,
        modifiers: Modifiers,
    ) -> Option<Message> {
        let pressed = Self::pressed_token(&key)?;

        if Self::shortcut_matches(&self.config.key_play, "space", &pressed, modifiers) {
            Some(Message::PlayRequested)
        } else if Self::shortcut_matches(
            &self.config.key_close_practice,
            "escape",
            &pressed,
            modifiers,
        ) {
            Some(Message::ModalDismissed)
        } else if Self::shortcut_matches(&self.config.key_safe_quit, "q", &pressed, modifiers) {
            Some(Message::SafeQuit)
        } else {
            None
        }
    }

    fn pressed_token(key: &Key) -> Option<String> {
        match key.as_ref() {
            Key::Named(key::Named::Space) => Some("space".to_string()),
            Key::Named(key::Named::Escape) => Some("escape".to_string()),
            Key::Named(key::Named::Enter) => Some("enter".to_string()),
            Key::Character(ch) => Some(ch.to_ascii_lowercase()),
            _ => None,
        }
    }

    pub(super) fn shortcut_matches(
        raw: &str,
        fallback: &str,
        pressed: &str,
        modifiers: Modifiers,
    ) -> bool {
        let normalized = Self::normalize_shortcut_token(raw, fallback);

        let mut required_ctrl = false;
        let mut required_alt = false;
        let mut required_shift = false;
        let mut required_key: Option<&str> = None;

        for token in normalized
            .split('+')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            match token {
                "ctrl" | "control" => required_ctrl = true,
                "alt" => required_alt = true,
                "shift" => required_shift = true,
                key => required_key = Some(key),
            }
        }

        if pressed != required_key.unwrap_or(fallback) {
            return false;
        }

        modifiers.control() == required_ctrl
            && modifiers.alt() == required_alt
            && modifiers.shift() == required_shift
    }

    pub(super) fn normalize_shortcut_token(raw: &str, fallback: &str) -> String {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            fallback.to_string()
        } else {
            normalized
                .split('+')
                .map(|token| match token.trim() {
                    "spacebar" => "space",
                    "esc" => "escape",
                    other => other,
                })
                .collect::<Vec<_>>()
                .join("+")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_normalized() {
        assert_eq!(App::normalize_shortcut_token(" SpaceBar ", "x"), "space");
        assert_eq!(App::normalize_shortcut_token("Esc", "x"), "escape");
        assert_eq!(App::normalize_shortcut_token("escape", "x"), "escape");
        assert_eq!(App::normalize_shortcut_token("  ", "q"), "q");
    }

    #[test]
    fn plain_key_requires_no_modifiers() {
        assert!(App::shortcut_matches("q", "q", "q", Modifiers::empty()));
        assert!(!App::shortcut_matches("q", "q", "q", Modifiers::CTRL));
    }

    #[test]
    fn modifier_shortcut_matches() {
        assert!(App::shortcut_matches("ctrl+q", "q", "q", Modifiers::CTRL));
        assert!(!App::shortcut_matches(
            "ctrl+q",
            "q",
            "q",
            Modifiers::CTRL | Modifiers::SHIFT,
        ));
    }

    #[test]
    fn named_keys_have_tokens() {
        assert_eq!(
            App::pressed_token(&Key::Named(key::Named::Escape)).as_deref(),
            Some("escape")
        );
        assert_eq!(App::pressed_token(&Key::Named(key::Named::Tab)), None);
    }
}
