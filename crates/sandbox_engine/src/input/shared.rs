//! Raw input state shared between the event thread and the render thread
//!
//! The controller writes here from window events; the renderer samples it once
//! per frame through [`RawInput`]. Every field is an atomic, so there is no
//! torn read of the cursor position and no lock on either side.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::codes::{KeyCode, MouseButton};

/// Level-sampled view of the raw input devices
pub trait RawInput {
    /// Whether the key is physically down right now
    fn is_key_down(&self, key: KeyCode) -> bool;

    /// Whether the mouse button is physically down right now
    fn is_button_down(&self, button: MouseButton) -> bool;

    /// Last reported cursor position, `None` until the cursor has moved once
    fn cursor_position(&self) -> Option<(f32, f32)>;

    /// Scroll accumulated since the previous call; resets to zero
    fn take_scroll(&self) -> (f32, f32);
}

/// Atomic raw input table
#[derive(Debug)]
pub struct SharedInput {
    keys: Vec<AtomicBool>,
    buttons: Vec<AtomicBool>,
    cursor_x: AtomicU32,
    cursor_y: AtomicU32,
    cursor_moved: AtomicBool,
    scroll_x: AtomicU32,
    scroll_y: AtomicU32,
}

impl SharedInput {
    /// Create a table with every key up and the cursor unseen
    pub fn new() -> Self {
        Self {
            keys: (0..KeyCode::COUNT).map(|_| AtomicBool::new(false)).collect(),
            buttons: (0..MouseButton::COUNT).map(|_| AtomicBool::new(false)).collect(),
            cursor_x: AtomicU32::new(0),
            cursor_y: AtomicU32::new(0),
            cursor_moved: AtomicBool::new(false),
            scroll_x: AtomicU32::new(0),
            scroll_y: AtomicU32::new(0),
        }
    }

    /// Record a key going down or up
    pub fn set_key(&self, key: KeyCode, down: bool) {
        self.keys[key.index()].store(down, Ordering::Relaxed);
    }

    /// Record a mouse button going down or up
    pub fn set_button(&self, button: MouseButton, down: bool) {
        self.buttons[button.index()].store(down, Ordering::Relaxed);
    }

    /// Record a cursor move
    pub fn set_cursor(&self, x: f32, y: f32) {
        self.cursor_x.store(x.to_bits(), Ordering::Relaxed);
        self.cursor_y.store(y.to_bits(), Ordering::Relaxed);
        // Release pairs with the Acquire in cursor_position so both coordinates are visible
        self.cursor_moved.store(true, Ordering::Release);
    }

    /// Add a scroll offset to the pending total
    pub fn add_scroll(&self, dx: f32, dy: f32) {
        accumulate(&self.scroll_x, dx);
        accumulate(&self.scroll_y, dy);
    }

    /// Mark every key and button as released
    ///
    /// Used when the window loses focus and release events may never arrive.
    pub fn release_all(&self) {
        for state in self.keys.iter().chain(self.buttons.iter()) {
            state.store(false, Ordering::Relaxed);
        }
    }
}

impl Default for SharedInput {
    fn default() -> Self {
        Self::new()
    }
}

impl RawInput for SharedInput {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys[key.index()].load(Ordering::Relaxed)
    }

    fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons[button.index()].load(Ordering::Relaxed)
    }

    fn cursor_position(&self) -> Option<(f32, f32)> {
        if !self.cursor_moved.load(Ordering::Acquire) {
            return None;
        }
        Some((
            f32::from_bits(self.cursor_x.load(Ordering::Relaxed)),
            f32::from_bits(self.cursor_y.load(Ordering::Relaxed)),
        ))
    }

    fn take_scroll(&self) -> (f32, f32) {
        (
            f32::from_bits(self.scroll_x.swap(0, Ordering::AcqRel)),
            f32::from_bits(self.scroll_y.swap(0, Ordering::AcqRel)),
        )
    }
}

fn accumulate(slot: &AtomicU32, delta: f32) {
    // Closure always returns Some, so the update cannot fail
    let _ = slot.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
        Some((f32::from_bits(bits) + delta).to_bits())
    });
}
