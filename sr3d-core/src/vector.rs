/// 3D vector algebra
///
/// Vectors are plain `nalgebra` values, so addition, subtraction, negation,
/// scalar multiplication, `dot` and `cross` come straight from the operator
/// impls. This module adds the fail-soft pieces the pipeline relies on.
use nalgebra::Vector3;

/// 3D vector with `f64` components.
pub type Vec3 = Vector3<f64>;

/// Magnitude at or below which a vector is treated as having no direction.
pub const NORMALIZE_EPSILON: f64 = 1e-4;

/// Pipeline-specific vector helpers.
pub trait VectorExt {
    /// Unit vector in the same direction, or the zero vector when the
    /// magnitude is at or below [`NORMALIZE_EPSILON`].
    fn normalize_or_zero(&self) -> Self;

    /// Euclidean distance between two points.
    fn distance(&self, other: &Self) -> f64;
}

impl VectorExt for Vec3 {
    #[inline]
    fn normalize_or_zero(&self) -> Self {
        self.try_normalize(NORMALIZE_EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }

    #[inline]
    fn distance(&self, other: &Self) -> f64 {
        (self - other).magnitude()
    }
}

/// Mean of three points.
#[inline]
pub fn centroid(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
    Vec3::new(
        (a.x + b.x + c.x) / 3.0,
        (a.y + b.y + c.y) / 3.0,
        (a.z + b.z + c.z) / 3.0,
    )
}
