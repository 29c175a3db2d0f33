use std::fmt::Display;

use winit::event::KeyEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::{LoopEvent, Radio};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shortcut {
    Quit,
    ToggleMount,
}

impl Shortcut {
    fn event(self) -> LoopEvent {
        match self {
            Shortcut::Quit => LoopEvent::Quit,
            Shortcut::ToggleMount => LoopEvent::ToggleMount,
        }
    }
}

struct KeyAction {
    code: KeyCode,
    description: &'static str,
    shortcut: Shortcut,
}

impl Display for KeyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description)
    }
}

pub struct Keyboard {
    radio: Radio,
    actions: Vec<KeyAction>,
}

impl Keyboard {
    pub fn new(radio: Radio) -> Self {
        Self {
            radio,
            actions: Default::default(),
        }
    }

    pub fn with_actions(mut self) -> Self {
        self.add_action(KeyCode::Escape, "ESC to quit", Shortcut::Quit);
        self.add_action(KeyCode::KeyM, "M to mount or unmount", Shortcut::ToggleMount);
        self
    }

    fn add_action(&mut self, code: KeyCode, description: &'static str, shortcut: Shortcut) {
        self.actions.push(KeyAction {
            code,
            description,
            shortcut,
        });
    }

    pub fn legend(&self) -> String {
        self.actions
            .iter()
            .map(|action| action.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn handle_key_event(&self, key_event: &KeyEvent) {
        if !key_event.state.is_pressed() || key_event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = key_event.physical_key else {
            return;
        };
        if let Some(shortcut) = lookup(&self.actions, code) {
            shortcut.event().send(&self.radio);
        }
    }
}

fn lookup(actions: &[KeyAction], code: KeyCode) -> Option<Shortcut> {
    actions
        .iter()
        .find(|action| action.code == code)
        .map(|action| action.shortcut)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions() -> Vec<KeyAction> {
        vec![
            KeyAction {
                code: KeyCode::Escape,
                description: "ESC to quit",
                shortcut: Shortcut::Quit,
            },
            KeyAction {
                code: KeyCode::KeyM,
                description: "M to mount or unmount",
                shortcut: Shortcut::ToggleMount,
            },
        ]
    }

    #[test]
    fn shortcuts_by_key() {
        let actions = actions();
        assert_eq!(lookup(&actions, KeyCode::Escape), Some(Shortcut::Quit));
        assert_eq!(lookup(&actions, KeyCode::KeyM), Some(Shortcut::ToggleMount));
        assert_eq!(lookup(&actions, KeyCode::Space), None);
    }
}
