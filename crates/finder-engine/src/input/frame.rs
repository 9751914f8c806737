use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{Key, MouseButton};

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys/buttons, pointer position).
/// `InputFrame` provides presses and accumulated motion for the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys pressed this frame (repeats excluded).
    pub keys_pressed: HashSet<Key>,

    /// Mouse buttons pressed this frame.
    pub buttons_pressed: HashSet<MouseButton>,

    /// Accumulated vertical wheel motion in lines.
    pub scroll_delta: f32,

    /// Accumulated pointer motion in logical pixels.
    pub pointer_delta: Vec2,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
        self.scroll_delta = 0.0;
        self.pointer_delta = Vec2::zero();
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn button_pressed(&self, btn: MouseButton) -> bool {
        self.buttons_pressed.contains(&btn)
    }
}
