// Orbit camera for inspecting the walker surface.
//
// Camera model:
//   - A fixed target point (the surface centre) the camera looks at
//   - Yaw (horizontal rotation) and pitch (elevation) around the target
//   - Zoom by adjusting distance along the look vector
//   - Left-drag or WASD/arrow keys orbit, mouse wheel zooms

use glam::{Mat4, Vec3};
use super::input::InputState;
use winit::keyboard::KeyCode;

pub struct OrbitCamera {
    pub target: Vec3,

    /// Distance from target along the look direction.
    /// Private: always clamped to [min_distance, max_distance] in update(). Use distance() to read.
    distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Elevation angle in radians, clamped short of the poles.
    pitch: f32,

    /// Horizontal rotation in radians (0 = camera on +Z looking toward -Z)
    pub yaw: f32,

    pub fov: f32,
    pub near: f32,
    pub far: f32,

    /// Keyboard orbit speed in radians per second
    pub orbit_speed: f32,

    /// Drag orbit speed in radians per pixel
    pub drag_sensitivity: f32,

    /// Zoom change (in distance units) per scroll line
    pub zoom_speed: f32,
}

const PITCH_LIMIT: f32 = 1.5;

impl OrbitCamera {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance,
            min_distance: distance * 0.25,
            max_distance: distance * 4.0,
            pitch: 25.0_f32.to_radians(),
            yaw: 0.0,
            fov: 45.0_f32.to_radians(),
            near: 0.05,
            far: 500.0,
            orbit_speed: 1.2,
            drag_sensitivity: 0.008,
            zoom_speed: 1.0,
        }
    }

    /// Update orbit angles and zoom from input. Call once per frame before rendering.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        let mut yaw_dir = 0.0;
        let mut pitch_dir = 0.0;

        if input.is_key_held(KeyCode::KeyA) || input.is_key_held(KeyCode::ArrowLeft)  { yaw_dir -= 1.0; }
        if input.is_key_held(KeyCode::KeyD) || input.is_key_held(KeyCode::ArrowRight) { yaw_dir += 1.0; }
        if input.is_key_held(KeyCode::KeyW) || input.is_key_held(KeyCode::ArrowUp)    { pitch_dir += 1.0; }
        if input.is_key_held(KeyCode::KeyS) || input.is_key_held(KeyCode::ArrowDown)  { pitch_dir -= 1.0; }

        self.yaw += yaw_dir * self.orbit_speed * dt;
        self.pitch += pitch_dir * self.orbit_speed * dt;

        if input.is_dragging() {
            self.yaw -= input.drag_delta.x * self.drag_sensitivity;
            self.pitch += input.drag_delta.y * self.drag_sensitivity;
        }

        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        // Zoom: scroll up (positive delta) zooms in (decreases distance)
        self.distance -= input.scroll_delta * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    /// World-space position of the camera eye.
    pub fn camera_position(&self) -> Vec3 {
        self.target + self.eye_offset()
    }

    /// View matrix: looks from the camera eye toward the target.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.camera_position(), self.target, Vec3::Y)
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    pub fn distance(&self) -> f32 { self.distance }
    pub fn pitch(&self) -> f32 { self.pitch }

    // Offset from target to camera eye based on pitch, yaw, and distance.
    fn eye_offset(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos() * self.distance,
            self.pitch.sin() * self.distance,
            self.yaw.cos() * self.pitch.cos() * self.distance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_sits_at_distance_from_target() {
        let mut camera = OrbitCamera::new(Vec3::new(1.0, 2.0, 3.0), 10.0);
        camera.yaw = 0.7;
        let offset = camera.camera_position() - camera.target;
        assert!((offset.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn zoom_and_pitch_are_clamped() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, 10.0);
        let mut input = InputState::new();
        input.scroll_delta = 1000.0;
        camera.update(&input, 0.016);
        assert_eq!(camera.distance(), camera.min_distance);

        input.scroll_delta = -1000.0;
        camera.update(&input, 0.016);
        assert_eq!(camera.distance(), camera.max_distance);

        input.scroll_delta = 0.0;
        camera.pitch = 10.0;
        camera.update(&input, 0.016);
        assert!(camera.pitch() <= PITCH_LIMIT);
    }
}
