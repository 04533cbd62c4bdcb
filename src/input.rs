use macroquad::input::{is_key_down, KeyCode};

/// Directional signals for one simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    /// Move up (+Y).
    pub up: bool,
    /// Move down (-Y).
    pub down: bool,
    /// Move left (-X).
    pub left: bool,
    /// Move right (+X).
    pub right: bool,
}

impl InputState {
    /// W/S/A/D as currently held. Needs a running macroquad context.
    pub fn from_keyboard() -> Self {
        Self {
            up: is_key_down(KeyCode::W),
            down: is_key_down(KeyCode::S),
            left: is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::D),
        }
    }

    /// Whether any direction is held.
    #[inline]
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}
