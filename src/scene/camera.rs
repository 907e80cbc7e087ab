//! # Camera
//!
//! A first-person camera: yaw/pitch orientation plus a world position, with
//! a derived unit front vector and a right-handed look-at view matrix.
//! Movement primitives translate the position relative to the current
//! facing; the caller supplies distances (elapsed time times speed), not
//! durations.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};

/// Pitch is kept inside this range to avoid the view flipping at the poles.
const PITCH_LIMIT: f32 = 89.0;

/// A first-person camera with yaw/pitch orientation.
///
/// Yaw is the rotation around the world up axis, in degrees: 0 looks along
/// +x, 90 looks along +y. Pitch is the elevation in degrees, positive up,
/// clamped to `[-89, 89]`. The world up vector is fixed at `(0, 0, 1)`.
#[derive(Debug)]
pub struct Camera {
    yaw: f32,
    pitch: f32,
    position: Point3<f32>,
    front: Vector3<f32>,
    up: Vector3<f32>,
}

impl Camera {
    /// Creates a camera at `position` with the given orientation.
    ///
    /// # Arguments
    /// * `yaw` - Rotation around the up axis, in degrees. 0 looks toward +x,
    ///   90 toward +y.
    /// * `pitch` - Elevation in degrees, positive up; clamped to `[-89, 89]`.
    /// * `position` - Initial camera position in world coordinates.
    pub fn new(yaw: f32, pitch: f32, position: Point3<f32>) -> Self {
        let mut camera = Camera {
            yaw,
            pitch,
            position,
            front: Vector3::unit_x(),
            up: Vector3::unit_z(),
        };
        camera.rebuild_front();
        camera
    }

    /// Current yaw, in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current pitch, in degrees.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Sets the orientation to absolute angles and rebuilds the front
    /// vector. Pitch is clamped; yaw wraps on itself past a full turn.
    pub fn rotate_to(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.rebuild_front();
    }

    /// Applies angle deltas and rebuilds the front vector. Pitch is
    /// clamped; yaw wraps on itself past a full turn.
    pub fn rotate_by(&mut self, yaw: f32, pitch: f32) {
        self.yaw += yaw;
        self.pitch += pitch;
        self.rebuild_front();
    }

    /// The normalized direction the camera is facing.
    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    /// The camera position in world coordinates.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Replaces the camera position.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    /// Moves the camera along its facing direction.
    pub fn move_forward(&mut self, delta: f32) {
        self.position += self.front * delta;
    }

    /// Moves the camera against its facing direction.
    pub fn move_backward(&mut self, delta: f32) {
        self.position -= self.front * delta;
    }

    /// Strafes the camera to the right of its facing direction.
    pub fn move_right(&mut self, delta: f32) {
        self.position += self.front.cross(self.up).normalize() * delta;
    }

    /// Strafes the camera to the left of its facing direction.
    pub fn move_left(&mut self, delta: f32) {
        self.position -= self.front.cross(self.up).normalize() * delta;
    }

    /// Builds the right-handed view matrix looking from the camera position
    /// along the front vector.
    pub fn make_view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    fn rebuild_front(&mut self) {
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        if self.yaw >= 360.0 || self.yaw <= -360.0 {
            self.yaw %= 360.0;
        }
        let yaw = Rad::from(cgmath::Deg(self.yaw)).0;
        let pitch = Rad::from(cgmath::Deg(self.pitch)).0;
        let (yaw_sin, yaw_cos) = yaw.sin_cos();
        let (pitch_sin, pitch_cos) = pitch.sin_cos();
        self.front =
            Vector3::new(yaw_cos * pitch_cos, yaw_sin * pitch_cos, pitch_sin).normalize();
    }
}
