/// 4x4 homogeneous transforms and Euler rotation state
use nalgebra::{Matrix4, Vector4};

use crate::vector::{Vec3, VectorExt};

/// 4x4 matrix with `f64` entries, indexed `(row, col)`.
pub type Mat4 = Matrix4<f64>;

/// Homogeneous divisors smaller than this are treated as 1.0.
pub const W_EPSILON: f64 = 1e-4;

/// Euler rotation around three axes (in radians), applied X then Y then Z
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Mat4 {
        Mat4::identity()
    }

    /// Create a translation matrix
    #[rustfmt::skip]
    pub fn translation(x: f64, y: f64, z: f64) -> Mat4 {
        Mat4::new(
            1.0, 0.0, 0.0, x,
            0.0, 1.0, 0.0, y,
            0.0, 0.0, 1.0, z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_x(angle: f64) -> Mat4 {
        let (sin, cos) = angle.sin_cos();
        Mat4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, cos, -sin, 0.0,
            0.0, sin, cos, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_y(angle: f64) -> Mat4 {
        let (sin, cos) = angle.sin_cos();
        Mat4::new(
            cos, 0.0, sin, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -sin, 0.0, cos, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_z(angle: f64) -> Mat4 {
        let (sin, cos) = angle.sin_cos();
        Mat4::new(
            cos, -sin, 0.0, 0.0,
            sin, cos, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Create a non-uniform scale matrix
    #[rustfmt::skip]
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Mat4 {
        Mat4::new(
            sx, 0.0, 0.0, 0.0,
            0.0, sy, 0.0, 0.0,
            0.0, 0.0, sz, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Mat4 {
        Self::rotation_x(rotation.x) * Self::rotation_y(rotation.y) * Self::rotation_z(rotation.z)
    }

    /// Right-handed perspective projection.
    ///
    /// View-space depth `-near` lands on clip z = -1 and `-far` on +1 after
    /// the perspective divide.
    pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
        let tan_half_fov = (fov / 2.0).tan();
        let depth = far - near;

        let mut m = Mat4::zeros();
        m[(0, 0)] = 1.0 / (aspect * tan_half_fov);
        m[(1, 1)] = 1.0 / tan_half_fov;
        m[(2, 2)] = -(far + near) / depth;
        m[(2, 3)] = -(2.0 * far * near) / depth;
        m[(3, 2)] = -1.0;
        m
    }

    /// Right-handed view matrix looking from `eye` towards `target`.
    ///
    /// `up` must not be parallel to `eye - target`; that case is not guarded.
    #[rustfmt::skip]
    pub fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        let z_axis = (eye - target).normalize_or_zero();
        let x_axis = up.cross(&z_axis).normalize_or_zero();
        let y_axis = z_axis.cross(&x_axis);

        Mat4::new(
            x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(eye),
            y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(eye),
            z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(eye),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Transform a point, dividing by the resulting `w`.
    pub fn transform_point(matrix: &Mat4, point: &Vec3) -> Vec3 {
        let h = matrix * Vector4::new(point.x, point.y, point.z, 1.0);
        let w = if h.w.abs() < W_EPSILON { 1.0 } else { h.w };
        Vec3::new(h.x / w, h.y / w, h.z / w)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(model: &Mat4, view: &Mat4, projection: &Mat4) -> Mat4 {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).magnitude() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-12);
        assert!((state.y - 0.2).abs() < 1e-12);
        assert!((state.z - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&RotationState::zero());
        assert!((matrix - Mat4::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = Transform::translation(1.0, -2.0, 3.0)
            * Transform::rotation_y(0.7)
            * Transform::scale(2.0, 0.5, 1.5);
        let i = Transform::identity();
        assert!((i * m - m).norm() < 1e-12);
        assert!((m * i - m).norm() < 1e-12);
    }

    #[test]
    fn test_right_handed_rotations() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = Vec3::new(0.0, 0.0, 1.0);
        assert_vec_close(Transform::transform_point(&Transform::rotation_x(FRAC_PI_2), &y), z);
        assert_vec_close(Transform::transform_point(&Transform::rotation_y(FRAC_PI_2), &z), x);
        assert_vec_close(Transform::transform_point(&Transform::rotation_z(FRAC_PI_2), &x), y);
    }

    #[test]
    fn test_translation_and_scale() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_vec_close(
            Transform::transform_point(&Transform::translation(1.0, 1.0, -1.0), &p),
            Vec3::new(2.0, 3.0, 2.0),
        );
        assert_vec_close(
            Transform::transform_point(&Transform::scale(2.0, 3.0, -1.0), &p),
            Vec3::new(2.0, 6.0, -3.0),
        );
    }

    #[test]
    fn test_multiply_row_by_column() {
        let a = Transform::translation(5.0, 0.0, 0.0);
        let b = Transform::scale(2.0, 2.0, 2.0);
        // a * b scales first, then translates
        let p = Transform::transform_point(&(a * b), &Vec3::new(1.0, 1.0, 1.0));
        assert_vec_close(p, Vec3::new(7.0, 2.0, 2.0));
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let cases = [
            (Vec3::new(0.0, 0.0, -5.0), Vec3::zeros()),
            (Vec3::new(3.0, 2.0, 1.0), Vec3::new(-1.0, 0.5, 4.0)),
            (Vec3::new(-7.0, 1.0, 2.0), Vec3::new(0.0, 1.0, 0.0)),
        ];
        let up = Vec3::new(0.0, 1.0, 0.0);
        for (eye, target) in cases {
            let view = Transform::look_at(&eye, &target, &up);
            assert_vec_close(Transform::transform_point(&view, &eye), Vec3::zeros());
        }
    }

    #[test]
    fn test_look_at_puts_target_on_negative_z() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let view = Transform::look_at(&eye, &Vec3::zeros(), &Vec3::new(0.0, 1.0, 0.0));
        assert_vec_close(
            Transform::transform_point(&view, &Vec3::zeros()),
            Vec3::new(0.0, 0.0, -5.0),
        );
    }

    #[test]
    fn test_perspective_near_and_far_planes() {
        let (near, far) = (0.1, 100.0);
        let proj = Transform::perspective(FRAC_PI_3, 16.0 / 9.0, near, far);
        assert_eq!(proj[(3, 2)], -1.0);
        assert_eq!(proj[(3, 3)], 0.0);

        let near_clip = Transform::transform_point(&proj, &Vec3::new(0.0, 0.0, -near));
        let far_clip = Transform::transform_point(&proj, &Vec3::new(0.0, 0.0, -far));
        assert!((near_clip.z + 1.0).abs() < 1e-9);
        assert!((far_clip.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_point_clamps_tiny_w() {
        // Point on the camera plane: w = 0 would divide by zero
        let proj = Transform::perspective(FRAC_PI_3, 1.0, 0.1, 100.0);
        let p = Transform::transform_point(&proj, &Vec3::new(1.0, 1.0, 0.0));
        assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
        assert!((p.x - proj[(0, 0)]).abs() < 1e-12);
    }
}
