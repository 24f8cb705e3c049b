//! Loop state shared between the event thread and the render thread

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of one render loop run
///
/// States only ever move forward in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LoopState {
    /// Created, setup not finished
    NotStarted = 0,
    /// Frames are being rendered
    Running = 1,
    /// A stop was requested; the renderer finishes its frame and exits
    Stopping = 2,
    /// The renderer has exited
    Stopped = 3,
}

impl LoopState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::NotStarted,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

/// Cancellation token for a render loop
///
/// Writes use `Release` and reads `Acquire`, so whatever a thread did before
/// changing the state is visible to the thread that observes the change.
#[derive(Debug)]
pub struct LoopToken {
    state: AtomicU8,
}

impl LoopToken {
    /// A token in [`LoopState::NotStarted`]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(LoopState::NotStarted as u8),
        }
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        LoopState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether frames should keep being rendered
    pub fn is_running(&self) -> bool {
        self.state() == LoopState::Running
    }

    /// Whether a stop has been requested or completed
    pub fn is_stopping(&self) -> bool {
        self.state() >= LoopState::Stopping
    }

    fn transition(&self, from: LoopState, to: LoopState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn advance_to(&self, to: LoopState) -> bool {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current < to as u8).then_some(to as u8)
            })
            .is_ok()
    }

    /// NotStarted → Running, after a successful setup
    ///
    /// Fails if a stop was requested while setup ran.
    pub fn start(&self) -> bool {
        self.transition(LoopState::NotStarted, LoopState::Running)
    }

    /// NotStarted → Stopped, when setup fails
    pub fn abort(&self) -> bool {
        self.transition(LoopState::NotStarted, LoopState::Stopped)
    }

    /// Ask the loop to stop; returns true if this call made the change
    pub fn request_stop(&self) -> bool {
        self.advance_to(LoopState::Stopping)
    }

    /// Mark the loop as fully stopped
    pub fn finish(&self) {
        self.advance_to(LoopState::Stopped);
    }
}

impl Default for LoopToken {
    fn default() -> Self {
        Self::new()
    }
}
