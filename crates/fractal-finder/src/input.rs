//! Per-tick input snapshot.

use finder_engine::coords::{Rect, Vec2};
use finder_engine::input::{InputFrame, InputState, Key, MouseButton};

use crate::config::TARGETS_PER_LEVEL;

/// Everything one exploration tick reads, captured up front so the state
/// machine never touches the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct TickInput {
    pub escape_pressed: bool,
    /// Wheel motion in lines; positive zooms in.
    pub scroll_lines: f32,
    /// Target index requested by a digit key (1-4 map to 0-3).
    pub jump_to: Option<usize>,
    pub reset_held: bool,
    pub pan_held: bool,
    /// Pointer motion this frame in logical pixels.
    pub pointer_delta: Vec2,
    /// Window position of a primary click this frame.
    pub click: Option<Vec2>,
    /// Live view rectangle in window coordinates.
    pub view: Rect,
}

impl TickInput {
    /// An idle frame over `view`.
    pub fn idle(view: Rect) -> Self {
        Self {
            escape_pressed: false,
            scroll_lines: 0.0,
            jump_to: None,
            reset_held: false,
            pan_held: false,
            pointer_delta: Vec2::zero(),
            click: None,
            view,
        }
    }

    pub fn capture(state: &InputState, frame: &InputFrame, view: Rect) -> Self {
        let click = if frame.button_pressed(MouseButton::Left) {
            state.pointer_pos
        } else {
            None
        };

        Self {
            escape_pressed: frame.key_pressed(Key::Escape),
            scroll_lines: frame.scroll_delta,
            jump_to: jump_target(frame),
            reset_held: state.button_down(MouseButton::Middle),
            pan_held: state.button_down(MouseButton::Right),
            pointer_delta: frame.pointer_delta,
            click,
            view,
        }
    }
}

/// Highest digit 1-4 pressed this frame wins.
fn jump_target(frame: &InputFrame) -> Option<usize> {
    frame
        .keys_pressed
        .iter()
        .filter_map(|k| k.digit())
        .map(usize::from)
        .filter(|d| (1..=TARGETS_PER_LEVEL).contains(d))
        .max()
        .map(|d| d - 1)
}
