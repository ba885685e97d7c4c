//! Input surface: key bindings, raw input events and the held-key state the
//! locomotion controller reads each frame.

use serde::{Deserialize, Serialize};

/// Mouse-look radians per pixel at sensitivity 5 (the settings default).
pub const BASE_MOUSE_SENSITIVITY: f32 = 0.003;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Sprint,
    Jump,
    Interact,
    Chest,
}

impl Action {
    /// Actions that fire once on key-down instead of being held.
    pub fn is_trigger(&self) -> bool {
        matches!(self, Action::Jump | Action::Interact | Action::Chest)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Binding {
    /// Key code as reported by the window system (`KeyW`, `ShiftLeft`, …).
    pub code: String,
    pub action: Action,
}

/// Key code to action table. Stored as a list so codes survive config
/// layers that normalise map keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyBindings(pub Vec<Binding>);

impl KeyBindings {
    pub fn action_for(&self, code: &str) -> Option<Action> {
        self.0.iter().find(|b| b.code == code).map(|b| b.action)
    }

    /// Bind `code` to `action`, replacing any earlier binding of that code.
    pub fn bind(&mut self, code: impl Into<String>, action: Action) {
        let code = code.into();
        self.0.retain(|b| b.code != code);
        self.0.push(Binding { code, action });
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let pairs = [
            ("KeyW", Action::Forward),
            ("ArrowUp", Action::Forward),
            ("KeyS", Action::Backward),
            ("ArrowDown", Action::Backward),
            ("KeyA", Action::Left),
            ("ArrowLeft", Action::Left),
            ("KeyD", Action::Right),
            ("ArrowRight", Action::Right),
            ("ShiftLeft", Action::Sprint),
            ("ShiftRight", Action::Sprint),
            ("Space", Action::Jump),
            ("KeyE", Action::Interact),
            ("KeyF", Action::Chest),
        ];
        Self(
            pairs
                .into_iter()
                .map(|(code, action)| Binding {
                    code: code.to_string(),
                    action,
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    KeyDown { code: String },
    KeyUp { code: String },
    /// Raw pointer movement in pixels.
    MouseMove { dx: f32, dy: f32 },
    /// Exclusive pointer capture gained or lost.
    PointerLock { locked: bool },
}

/// Movement keys currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub pointer_locked: bool,
}

impl InputState {
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    pub fn release_all(&mut self) {
        let locked = self.pointer_locked;
        *self = Self {
            pointer_locked: locked,
            ..Self::default()
        };
    }

    /// Apply a key transition for a held action. Trigger actions are
    /// ignored here; the caller dispatches them on key-down.
    pub fn set(&mut self, action: Action, down: bool) {
        match action {
            Action::Forward => self.forward = down,
            Action::Backward => self.backward = down,
            Action::Left => self.left = down,
            Action::Right => self.right = down,
            Action::Sprint => self.sprint = down,
            Action::Jump | Action::Interact | Action::Chest => {}
        }
    }
}
