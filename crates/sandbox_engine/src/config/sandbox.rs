//! Sandbox settings
//!
//! Every field has a default so partial files are accepted.

use serde::{Deserialize, Serialize};

use super::Config;

/// Top-level sandbox configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Window creation parameters
    pub window: WindowSettings,
    /// Initial camera placement and movement tuning
    pub camera: CameraSettings,
    /// Free-fly control tuning
    pub controls: ControlSettings,
    /// Render loop behaviour
    pub render_loop: LoopSettings,
}

impl Config for SandboxConfig {}

/// Window creation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Application name, also the prefix of the FPS title
    pub title: String,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
    /// Initial screen position of the window
    pub position: (i32, i32),
    /// Wait for vertical blank on swap
    pub vsync: bool,
    /// Hide and lock the cursor for mouse look
    pub capture_cursor: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "OpenGL Sandbox".to_string(),
            width: 1280,
            height: 720,
            position: (360, 75),
            vsync: false,
            capture_cursor: true,
        }
    }
}

/// Initial camera placement and movement tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Start (and Home-reset) position
    pub position: [f32; 3],
    /// Start (and Home-reset) look direction
    pub front: [f32; 3],
    /// Units per second while walking
    pub normal_speed: f32,
    /// Units per second while sprinting
    pub fast_speed: f32,
    /// Degrees of rotation per pixel of mouse travel
    pub sensitivity: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            front: [0.0, 0.0, -1.0],
            normal_speed: 5.0,
            fast_speed: 20.0,
            sensitivity: 0.2,
            fov: 80.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Free-fly control tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Degrees of field of view removed per second while zooming
    pub zoom_rate: f32,
    /// Zoom stops once the field of view drops to this many degrees
    pub min_zoom_fov: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            zoom_rate: 200.0,
            min_zoom_fov: 10.0,
        }
    }
}

/// Render loop behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopSettings {
    /// Seconds of frame time accumulated between FPS title updates
    pub title_refresh_interval: f32,
    /// Longest the controller blocks waiting for window events, in seconds
    pub event_wait_timeout: f64,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            title_refresh_interval: 0.5,
            event_wait_timeout: 0.05,
        }
    }
}
