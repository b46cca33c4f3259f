/// Camera and projection utilities
use std::f64::consts::PI;

use crate::transform::{Mat4, Transform};
use crate::vector::{Vec3, VectorExt};

/// Polar angle limit for [`Camera::orbit`], keeps the camera off the poles.
pub const ORBIT_POLE_MARGIN: f64 = 0.1;

/// Perspective camera looking from `position` towards `target`
///
/// Every field is public; the harness edits them between frames and the
/// renderer only reads them while rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -5.0),
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: PI / 3.0, // 60 degrees
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Self::new()
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Mat4 {
        Transform::look_at(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Transform::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Unit vector from position towards target
    pub fn view_direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn distance_to_target(&self) -> f64 {
        self.position.distance(&self.target)
    }

    /// Dolly along the view direction. The target moves too.
    pub fn move_forward(&mut self, distance: f64) {
        self.translate(self.view_direction() * distance);
    }

    /// Slide sideways along `view_direction x up`.
    pub fn strafe(&mut self, distance: f64) {
        let right = self.view_direction().cross(&self.up).normalize_or_zero();
        self.translate(right * distance);
    }

    /// Move along `up`.
    pub fn move_vertical(&mut self, distance: f64) {
        self.translate(self.up * distance);
    }

    /// Swing the position around the target on a sphere of constant radius.
    ///
    /// `angle_x` changes the polar angle (clamped to stay
    /// [`ORBIT_POLE_MARGIN`] away from either pole), `angle_y` the azimuth.
    pub fn orbit(&mut self, angle_x: f64, angle_y: f64) {
        let offset = self.position - self.target;
        let radius = offset.magnitude();
        if radius < f64::EPSILON {
            return;
        }

        let theta = offset.x.atan2(offset.z) + angle_y;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + angle_x)
            .clamp(ORBIT_POLE_MARGIN, PI - ORBIT_POLE_MARGIN);

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        self.position = self.target
            + Vec3::new(
                radius * sin_phi * sin_theta,
                radius * cos_phi,
                radius * sin_phi * cos_theta,
            );
    }

    fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.target += delta;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
