//! # Free-fly Camera
//!
//! First-person camera driven by keyboard movement and mouse look, plus the
//! perspective projection that goes with it.
//!
//! ## Design Principles
//! - **Eager matrices**: every mutation recomputes the cached matrix, reads are free
//! - **Library-agnostic**: no GPU calls here, the uniform block uploads the results
//! - **Degrees at the edges**: yaw, pitch and field of view are stored in degrees

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Pitch limit in degrees, short of straight up/down so `front × up` never vanishes
pub const PITCH_LIMIT: f32 = 89.0;

/// Direction of a keyboard-driven camera move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    /// Along the view direction
    Forward,
    /// Against the view direction
    Backward,
    /// Strafe left
    Left,
    /// Strafe right
    Right,
    /// Along world up
    Up,
    /// Against world up
    Down,
}

/// First-person camera
///
/// # Coordinate System
/// Right-handed, Y-up. Yaw is measured from +X toward +Z, so the default yaw of
/// -90° looks down -Z.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,

    /// Units per second for [`Camera::apply_movement`]
    pub speed: f32,

    /// Degrees per pixel for [`Camera::apply_look`]
    pub sensitivity: f32,

    last_x: f32,
    last_y: f32,
    look_anchored: bool,
    view: Mat4,
}

impl Camera {
    /// Default movement speed in units per second
    pub const DEFAULT_SPEED: f32 = 5.0;

    /// Default mouse sensitivity in degrees per pixel
    pub const DEFAULT_SENSITIVITY: f32 = 0.2;

    /// Create a camera at `position` looking along `front`
    pub fn new(position: Vec3, front: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::y(),
            yaw: -90.0,
            pitch: 0.0,
            speed: Self::DEFAULT_SPEED,
            sensitivity: Self::DEFAULT_SENSITIVITY,
            last_x: 0.0,
            last_y: 0.0,
            look_anchored: false,
            view: Mat4::identity(),
        };
        camera.reset(position, front);
        camera
    }

    /// Move the camera and point it along `front`
    ///
    /// Yaw and pitch are re-derived from `front` so the next mouse-look step
    /// continues from the new orientation instead of snapping back.
    pub fn reset(&mut self, position: Vec3, front: Vec3) {
        let front = front.try_normalize(f32::EPSILON).unwrap_or_else(|| Vec3::new(0.0, 0.0, -1.0));

        self.position = position;
        self.pitch = utils::rad_to_deg(front.y.clamp(-1.0, 1.0).asin()).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = utils::rad_to_deg(front.z.atan2(front.x));
        self.front = front;
        self.look_anchored = false;
        self.update_view();

        log::debug!("Camera reset to {:?} facing {:?}", position, front);
    }

    /// Move along one axis by `speed * delta_time`
    pub fn apply_movement(&mut self, direction: CameraMovement, delta_time: f32) {
        let distance = self.speed * delta_time;

        match direction {
            CameraMovement::Forward => self.position += self.front * distance,
            CameraMovement::Backward => self.position -= self.front * distance,
            CameraMovement::Left => self.position -= self.right() * distance,
            CameraMovement::Right => self.position += self.right() * distance,
            CameraMovement::Up => self.position += self.up * distance,
            CameraMovement::Down => self.position -= self.up * distance,
        }

        self.update_view();
    }

    /// Rotate from a cursor position
    ///
    /// A `first_sample` only records the viewport centre as the reference
    /// point. Until some reference exists (after construction or a reset), the
    /// next real sample is recorded as the reference instead of rotating. Later
    /// samples turn the cursor offset into yaw/pitch.
    pub fn apply_look(
        &mut self,
        mouse_x: f32,
        mouse_y: f32,
        viewport_width: u32,
        viewport_height: u32,
        first_sample: bool,
    ) {
        if first_sample {
            self.last_x = viewport_width as f32 / 2.0;
            self.last_y = viewport_height as f32 / 2.0;
            self.look_anchored = true;
        } else if !self.look_anchored {
            self.last_x = mouse_x;
            self.last_y = mouse_y;
            self.look_anchored = true;
        } else {
            // Screen y grows downward, pitch grows upward
            let offset_x = (mouse_x - self.last_x) * self.sensitivity;
            let offset_y = (self.last_y - mouse_y) * self.sensitivity;
            self.last_x = mouse_x;
            self.last_y = mouse_y;

            self.yaw += offset_x;
            self.pitch = (self.pitch + offset_y).clamp(-PITCH_LIMIT, PITCH_LIMIT);

            let yaw = utils::deg_to_rad(self.yaw);
            let pitch = utils::deg_to_rad(self.pitch);
            self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        }

        self.update_view();
    }

    /// Teleport without changing orientation
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_view();
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// World up vector
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees, always within ±[`PITCH_LIMIT`]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// World-to-camera matrix, `look_at(position, position + front, up)`
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    fn right(&self) -> Vec3 {
        self.front.cross(&self.up).normalize()
    }

    fn update_view(&mut self) {
        self.view = Mat4::look_at(self.position, self.position + self.front, self.up);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0))
    }
}

/// Perspective projection with an eagerly cached matrix
#[derive(Debug, Clone)]
pub struct Projection {
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    matrix: Mat4,
}

impl Projection {
    /// Create a projection; `fov_degrees` is the vertical field of view
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut projection = Self {
            fov: fov_degrees,
            aspect,
            near,
            far,
            matrix: Mat4::identity(),
        };
        projection.update_matrix();
        projection
    }

    /// Projection for a viewport in pixels
    pub fn for_viewport(fov_degrees: f32, width: u32, height: u32, near: f32, far: f32) -> Self {
        Self::new(fov_degrees, width as f32 / height.max(1) as f32, near, far)
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Change the field of view
    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov = fov_degrees;
        self.update_matrix();
    }

    /// Change the aspect ratio, e.g. after a resize
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_matrix();
    }

    /// Camera-to-clip matrix
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    fn update_matrix(&mut self) {
        self.matrix = Mat4::perspective(utils::deg_to_rad(self.fov), self.aspect, self.near, self.far);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_forward_moves_speed_times_front() {
        let mut camera = Camera::default();
        camera.speed = 5.0;
        let start = camera.position();
        let front = camera.front();

        camera.apply_movement(CameraMovement::Forward, 1.0);
        assert_relative_eq!(camera.position() - start, front * 5.0, epsilon = EPSILON);
    }

    #[test]
    fn test_strafe_is_perpendicular_to_front() {
        let mut camera = Camera::default();
        camera.apply_movement(CameraMovement::Right, 1.0);

        // Looking down -Z, right is +X
        assert_relative_eq!(camera.position(), Vec3::new(5.0, 0.0, 3.0), epsilon = EPSILON);

        camera.apply_movement(CameraMovement::Left, 1.0);
        camera.apply_movement(CameraMovement::Down, 0.5);
        assert_relative_eq!(camera.position(), Vec3::new(0.0, -2.5, 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_first_look_sample_keeps_orientation() {
        let mut camera = Camera::default();
        let front = camera.front();

        camera.apply_look(700.0, 10.0, 800, 600, true);
        assert_relative_eq!(camera.front(), front, epsilon = EPSILON);

        // Cursor exactly at the recorded centre: no rotation either
        camera.apply_look(400.0, 300.0, 800, 600, false);
        assert_relative_eq!(camera.front(), front, epsilon = EPSILON);
    }

    #[test]
    fn test_unanchored_sample_becomes_reference() {
        let mut camera = Camera::default();
        let front = camera.front();

        // Cursor already known before any centre sample was recorded
        camera.apply_look(640.0, 360.0, 1280, 720, false);
        assert_relative_eq!(camera.front(), front, epsilon = EPSILON);
        assert_relative_eq!(camera.yaw(), -90.0, epsilon = EPSILON);
        assert_relative_eq!(camera.pitch(), 0.0, epsilon = EPSILON);

        camera.apply_look(650.0, 360.0, 1280, 720, false);
        assert_relative_eq!(camera.yaw(), -88.0, epsilon = 1e-4);
    }

    #[test]
    fn test_reset_rearms_reference() {
        let mut camera = Camera::default();
        camera.apply_look(400.0, 300.0, 800, 600, true);
        camera.reset(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));

        camera.apply_look(10.0, 590.0, 800, 600, false);
        assert_relative_eq!(camera.front(), Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_pitch_clamped_under_huge_input() {
        let mut camera = Camera::default();
        camera.apply_look(400.0, 300.0, 800, 600, true);

        for step in 1..200 {
            camera.apply_look(400.0 + step as f32 * 37.0, 300.0 - step as f32 * 500.0, 800, 600, false);
            assert!(camera.pitch() <= PITCH_LIMIT && camera.pitch() >= -PITCH_LIMIT);
            assert_relative_eq!(camera.front().norm(), 1.0, epsilon = EPSILON);
        }
        assert_relative_eq!(camera.pitch(), PITCH_LIMIT);

        for step in 1..200 {
            camera.apply_look(0.0, step as f32 * 1.0e4, 800, 600, false);
            assert!(camera.pitch() >= -PITCH_LIMIT);
            assert_relative_eq!(camera.front().norm(), 1.0, epsilon = EPSILON);
        }
        assert_relative_eq!(camera.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn test_look_follows_spherical_formula() {
        let mut camera = Camera::default();
        camera.apply_look(400.0, 300.0, 800, 600, true);
        // +50px right, 25px up at 0.2 deg/px => yaw -80, pitch 5
        camera.apply_look(450.0, 275.0, 800, 600, false);

        let (yaw, pitch) = (utils::deg_to_rad(-80.0), utils::deg_to_rad(5.0));
        let expected = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        assert_relative_eq!(camera.yaw(), -80.0, epsilon = 1e-4);
        assert_relative_eq!(camera.front(), expected, epsilon = EPSILON);
    }

    #[test]
    fn test_view_matrix_tracks_every_mutation() {
        let mut camera = Camera::default();
        camera.apply_movement(CameraMovement::Up, 2.0);

        let expected = Mat4::look_at(camera.position(), camera.position() + camera.front(), Vec3::y());
        assert_relative_eq!(*camera.view_matrix(), expected, epsilon = EPSILON);
    }

    #[test]
    fn test_reset_realigns_yaw_and_pitch() {
        let mut camera = Camera::default();
        camera.reset(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));

        assert_relative_eq!(camera.yaw(), 0.0, epsilon = 1e-4);
        assert_relative_eq!(camera.pitch(), 0.0, epsilon = 1e-4);
        assert_relative_eq!(camera.front(), Vec3::x(), epsilon = EPSILON);
    }

    #[test]
    fn test_projection_recomputed_on_fov_change() {
        let mut projection = Projection::for_viewport(80.0, 800, 600, 0.1, 1000.0);
        let before = *projection.matrix();

        projection.set_fov(40.0);
        assert!((projection.fov() - 40.0).abs() < f32::EPSILON);
        assert!(projection.matrix()[(1, 1)] > before[(1, 1)]);
    }
}
