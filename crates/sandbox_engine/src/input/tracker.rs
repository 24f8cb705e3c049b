//! Per-frame edge detection over level-sampled input

use super::codes::{KeyCode, MouseButton};
use super::shared::RawInput;

/// Edge-detected state of one key or button for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Went down this frame
    pub pressed: bool,
    /// Went up this frame
    pub released: bool,
    /// Currently down
    pub held: bool,
}

impl ButtonState {
    /// Derive this frame's state from the previous raw level and the current one
    fn step(&mut self, was_down: bool, is_down: bool) {
        self.pressed = false;
        self.released = false;

        if was_down == is_down {
            return;
        }

        if is_down {
            self.pressed = true;
            self.held = true;
        } else {
            self.released = true;
            self.held = false;
        }
    }
}

/// Direction of a one-frame scroll pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Wheel moved away from the user
    Up,
    /// Wheel moved toward the user
    Down,
    /// No vertical scroll this frame
    None,
}

/// Input state tracker
///
/// Call [`InputTracker::update`] once per frame before anything reads it.
/// `pressed` and `released` hold for exactly the frame of the transition;
/// `held` follows the raw level.
#[derive(Debug, Clone)]
pub struct InputTracker {
    keys: Vec<ButtonState>,
    previous_keys: Vec<bool>,
    buttons: Vec<ButtonState>,
    previous_buttons: Vec<bool>,
    cursor: Option<(f32, f32)>,
    scroll: (f32, f32),
}

impl InputTracker {
    /// Create a tracker with everything released
    pub fn new() -> Self {
        Self {
            keys: vec![ButtonState::default(); KeyCode::COUNT],
            previous_keys: vec![false; KeyCode::COUNT],
            buttons: vec![ButtonState::default(); MouseButton::COUNT],
            previous_buttons: vec![false; MouseButton::COUNT],
            cursor: None,
            scroll: (0.0, 0.0),
        }
    }

    /// Sample the raw devices and derive this frame's edges
    pub fn update(&mut self, raw: &impl RawInput) {
        for &key in KeyCode::ALL {
            let i = key.index();
            let down = raw.is_key_down(key);
            self.keys[i].step(self.previous_keys[i], down);
            self.previous_keys[i] = down;
        }

        for &button in MouseButton::ALL {
            let i = button.index();
            let down = raw.is_button_down(button);
            self.buttons[i].step(self.previous_buttons[i], down);
            self.previous_buttons[i] = down;
        }

        if let Some(position) = raw.cursor_position() {
            self.cursor = Some(position);
        }
        self.scroll = raw.take_scroll();
    }

    /// State of a key this frame
    pub fn key(&self, key: KeyCode) -> ButtonState {
        self.keys[key.index()]
    }

    /// State of a mouse button this frame
    pub fn mouse_button(&self, button: MouseButton) -> ButtonState {
        self.buttons[button.index()]
    }

    /// Cursor position, `None` until the cursor has reported a position
    pub fn cursor_position(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Scroll delta for this frame only
    pub fn scroll_delta(&self) -> (f32, f32) {
        self.scroll
    }

    /// Vertical scroll of this frame as a direction
    pub fn scroll_direction(&self) -> ScrollDirection {
        let (_, dy) = self.scroll;
        if dy > 0.0 {
            ScrollDirection::Up
        } else if dy < 0.0 {
            ScrollDirection::Down
        } else {
            ScrollDirection::None
        }
    }
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}
