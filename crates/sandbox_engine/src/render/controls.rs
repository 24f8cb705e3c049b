//! Default free-fly controls
//!
//! | Input            | Effect                                   |
//! |------------------|------------------------------------------|
//! | W / S            | forward / backward                       |
//! | A / D            | strafe left / right                      |
//! | Space / L-Shift  | up / down                                |
//! | C (held)         | zoom in by narrowing the field of view   |
//! | C (released)     | restore the field of view                |
//! | L-Control (held) | fast movement                            |
//! | Home             | reset the camera                         |
//! | Mouse            | look around                              |
//!
//! Opposing keys held together cancel out.

use crate::config::{CameraSettings, ControlSettings};
use crate::foundation::math::Vec3;
use crate::input::{InputTracker, KeyCode};

use super::camera::{Camera, CameraMovement, Projection};

/// Tuning for [`FreeFlyControls`]
#[derive(Debug, Clone)]
pub struct FreeFlyControls {
    /// Speed while L-Control is up
    pub normal_speed: f32,
    /// Speed while L-Control is held
    pub fast_speed: f32,
    /// Field of view restored when zoom is released
    pub default_fov: f32,
    /// Degrees of field of view removed per second while zooming
    pub zoom_rate: f32,
    /// Zoom stops once the field of view reaches this
    pub min_zoom_fov: f32,
    /// Home-reset position
    pub home_position: Vec3,
    /// Home-reset look direction
    pub home_front: Vec3,
}

impl FreeFlyControls {
    /// Build controls from the loaded settings
    pub fn from_settings(camera: &CameraSettings, controls: &ControlSettings) -> Self {
        Self {
            normal_speed: camera.normal_speed,
            fast_speed: camera.fast_speed,
            default_fov: camera.fov,
            zoom_rate: controls.zoom_rate,
            min_zoom_fov: controls.min_zoom_fov,
            home_position: Vec3::from(camera.position),
            home_front: Vec3::from(camera.front),
        }
    }

    /// Apply one frame of keyboard and mouse input
    ///
    /// Until the cursor has reported a position every look sample counts as
    /// the first one. The first known position is only recorded as the
    /// reference; see [`Camera::apply_look`].
    pub fn apply(
        &self,
        input: &InputTracker,
        camera: &mut Camera,
        projection: &mut Projection,
        viewport: (u32, u32),
        delta_time: f32,
    ) {
        // Speed first so this frame's movement uses it
        camera.speed = if input.key(KeyCode::LeftControl).held {
            self.fast_speed
        } else {
            self.normal_speed
        };

        let axes = [
            (KeyCode::W, KeyCode::S, CameraMovement::Forward, CameraMovement::Backward),
            (KeyCode::A, KeyCode::D, CameraMovement::Left, CameraMovement::Right),
            (KeyCode::Space, KeyCode::LeftShift, CameraMovement::Up, CameraMovement::Down),
        ];
        for (positive, negative, towards, away) in axes {
            match (input.key(positive).held, input.key(negative).held) {
                (true, false) => camera.apply_movement(towards, delta_time),
                (false, true) => camera.apply_movement(away, delta_time),
                _ => {}
            }
        }

        let zoom = input.key(KeyCode::C);
        if zoom.held {
            if projection.fov() > self.min_zoom_fov {
                let narrowed = projection.fov() - delta_time * self.zoom_rate;
                projection.set_fov(narrowed.max(self.min_zoom_fov));
            }
        } else if zoom.released {
            projection.set_fov(self.default_fov);
        }

        if input.key(KeyCode::Home).pressed {
            camera.reset(self.home_position, self.home_front);
        }

        let (width, height) = viewport;
        match input.cursor_position() {
            Some((x, y)) => camera.apply_look(x, y, width, height, false),
            None => camera.apply_look(0.0, 0.0, width, height, true),
        }
    }
}

impl Default for FreeFlyControls {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default(), &ControlSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MouseButton, RawInput};
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Held {
        keys: HashSet<KeyCode>,
        cursor: Option<(f32, f32)>,
    }

    impl RawInput for Held {
        fn is_key_down(&self, key: KeyCode) -> bool {
            self.keys.contains(&key)
        }
        fn is_button_down(&self, _button: MouseButton) -> bool {
            false
        }
        fn cursor_position(&self) -> Option<(f32, f32)> {
            self.cursor
        }
        fn take_scroll(&self) -> (f32, f32) {
            (0.0, 0.0)
        }
    }

    fn frame(keys: &[KeyCode], tracker: &mut InputTracker) {
        let raw = Held {
            keys: keys.iter().copied().collect(),
            cursor: None,
        };
        tracker.update(&raw);
    }

    fn look(cursor: (f32, f32), tracker: &mut InputTracker) {
        let raw = Held {
            keys: HashSet::new(),
            cursor: Some(cursor),
        };
        tracker.update(&raw);
    }

    fn setup() -> (FreeFlyControls, InputTracker, Camera, Projection) {
        let controls = FreeFlyControls::default();
        let projection = Projection::for_viewport(controls.default_fov, 800, 600, 0.1, 1000.0);
        (controls, InputTracker::new(), Camera::default(), projection)
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let (controls, mut tracker, mut camera, mut projection) = setup();
        let start = camera.position();

        frame(&[KeyCode::W, KeyCode::S, KeyCode::A, KeyCode::D], &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 1.0);

        assert_relative_eq!(camera.position(), start);
    }

    #[test]
    fn test_control_selects_fast_speed() {
        let (controls, mut tracker, mut camera, mut projection) = setup();
        let start = camera.position();

        frame(&[KeyCode::W, KeyCode::LeftControl], &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.5);

        assert_relative_eq!(camera.position(), start + camera.front() * 10.0, epsilon = 1e-5);
        assert_relative_eq!(camera.speed, controls.fast_speed);
    }

    #[test]
    fn test_zoom_narrows_then_restores() {
        let (controls, mut tracker, mut camera, mut projection) = setup();

        frame(&[KeyCode::C], &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.1);
        assert_relative_eq!(projection.fov(), controls.default_fov - 20.0, epsilon = 1e-4);

        // Held long enough to reach the floor
        for _ in 0..10 {
            frame(&[KeyCode::C], &mut tracker);
            controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.1);
        }
        assert_relative_eq!(projection.fov(), controls.min_zoom_fov);

        frame(&[], &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.1);
        assert_relative_eq!(projection.fov(), controls.default_fov);
    }

    #[test]
    fn test_home_resets_on_press_only() {
        let (controls, mut tracker, mut camera, mut projection) = setup();
        camera.set_position(Vec3::new(9.0, 9.0, 9.0));

        frame(&[KeyCode::Home], &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.0);
        assert_relative_eq!(camera.position(), controls.home_position);

        camera.set_position(Vec3::new(1.0, 1.0, 1.0));
        frame(&[KeyCode::Home], &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.0);
        assert_relative_eq!(camera.position(), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_first_known_cursor_does_not_turn() {
        let (controls, mut tracker, mut camera, mut projection) = setup();
        let front = camera.front();

        // Cursor moved during setup, so the first frame already has a position
        look((700.0, 100.0), &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.016);

        assert_relative_eq!(camera.front(), front, epsilon = 1e-5);
        assert_relative_eq!(camera.yaw(), -90.0, epsilon = 1e-5);
        assert_relative_eq!(camera.pitch(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_cursor_offset_turns_by_sensitivity() {
        let (controls, mut tracker, mut camera, mut projection) = setup();

        look((700.0, 100.0), &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.016);
        look((710.0, 95.0), &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.016);

        assert_relative_eq!(camera.yaw(), -90.0 + 10.0 * camera.sensitivity, epsilon = 1e-4);
        assert_relative_eq!(camera.pitch(), 5.0 * camera.sensitivity, epsilon = 1e-4);
    }

    #[test]
    fn test_centre_reference_before_cursor_is_known() {
        let (controls, mut tracker, mut camera, mut projection) = setup();

        frame(&[], &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.016);
        look((420.0, 300.0), &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.016);

        assert_relative_eq!(camera.yaw(), -90.0 + 20.0 * camera.sensitivity, epsilon = 1e-4);
    }

    #[test]
    fn test_pitch_stays_clamped_through_controls() {
        let (controls, mut tracker, mut camera, mut projection) = setup();

        look((400.0, 300.0), &mut tracker);
        controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.016);
        for step in 1..5 {
            look((400.0, 300.0 - step as f32 * 10_000.0), &mut tracker);
            controls.apply(&tracker, &mut camera, &mut projection, (800, 600), 0.016);
            assert!(camera.pitch() <= 89.0);
        }
        assert_relative_eq!(camera.pitch(), 89.0);
    }
}
