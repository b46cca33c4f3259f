/// Light sources and their per-face lighting laws
use crate::color::Color;
use crate::vector::{Vec3, VectorExt};

/// Point light falloff: `1 / (1 + LINEAR * d + QUADRATIC * d^2)`
pub const ATTENUATION_LINEAR: f64 = 0.1;
pub const ATTENUATION_QUADRATIC: f64 = 0.01;

/// A light in the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light with no geometric dependence
    Ambient { color: Color, intensity: f64 },
    /// Parallel rays travelling along `direction` (kept normalized)
    Directional {
        direction: Vec3,
        color: Color,
        intensity: f64,
    },
    /// Omni light at `position`, attenuated with distance
    Point {
        position: Vec3,
        color: Color,
        intensity: f64,
    },
}

impl Light {
    pub fn ambient(color: Color, intensity: f64) -> Self {
        Light::Ambient { color, intensity }
    }

    /// Directional light at full intensity. `direction` is normalized here.
    pub fn directional(direction: Vec3, color: Color) -> Self {
        Light::Directional {
            direction: direction.normalize_or_zero(),
            color,
            intensity: 1.0,
        }
    }

    pub fn point(position: Vec3, color: Color, intensity: f64) -> Self {
        Light::Point {
            position,
            color,
            intensity,
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Light::Ambient { color, .. }
            | Light::Directional { color, .. }
            | Light::Point { color, .. } => color,
        }
    }

    pub fn intensity(&self) -> f64 {
        match *self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. } => intensity,
        }
    }

    /// Contribution of this light to a flat face with `normal` at `point`.
    pub fn illuminate(&self, point: &Vec3, normal: &Vec3, surface: Color) -> Color {
        match *self {
            Light::Ambient { color, intensity } => surface.modulate(color, intensity),
            Light::Directional {
                direction,
                color,
                intensity,
            } => {
                // The variant can be built without the constructor
                let diffuse = normal.dot(&(-direction).normalize_or_zero()).max(0.0);
                surface.modulate(color, intensity * diffuse)
            }
            Light::Point {
                position,
                color,
                intensity,
            } => {
                let to_light = position - point;
                let attenuation = attenuation(to_light.magnitude());
                let diffuse = normal.dot(&to_light.normalize_or_zero()).max(0.0);
                surface.modulate(color, intensity * diffuse * attenuation)
            }
        }
    }
}

/// Point light attenuation at distance `d`
#[inline]
pub fn attenuation(d: f64) -> f64 {
    1.0 / (1.0 + ATTENUATION_LINEAR * d + ATTENUATION_QUADRATIC * d * d)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: Color = Color::new(180, 90, 30);

    fn up() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.0)
    }

    #[test]
    fn test_ambient_zero_is_black() {
        let light = Light::ambient(Color::WHITE, 0.0);
        assert_eq!(light.illuminate(&Vec3::zeros(), &up(), SURFACE), Color::BLACK);
    }

    #[test]
    fn test_ambient_full_white_keeps_surface() {
        let light = Light::ambient(Color::WHITE, 1.0);
        assert_eq!(light.illuminate(&Vec3::zeros(), &up(), SURFACE), SURFACE);
        assert_eq!(
            light.illuminate(&Vec3::zeros(), &up(), Color::WHITE),
            Color::WHITE
        );
    }

    #[test]
    fn test_ambient_ignores_geometry() {
        let light = Light::ambient(Color::new(255, 128, 0), 0.5);
        let a = light.illuminate(&Vec3::zeros(), &up(), SURFACE);
        let b = light.illuminate(&Vec3::new(9.0, -3.0, 1.0), &-up(), SURFACE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_directional_stores_normalized_direction() {
        let light = Light::directional(Vec3::new(-1.0, -1.0, -1.0), Color::WHITE);
        match light {
            Light::Directional { direction, .. } => {
                assert!((direction.magnitude() - 1.0).abs() < 1e-12)
            }
            _ => panic!("expected directional light"),
        }
        assert_eq!(light.intensity(), 1.0);
    }

    #[test]
    fn test_directional_lambert() {
        let light = Light::directional(Vec3::new(0.0, -1.0, 0.0), Color::WHITE);
        // Facing the light: full strength
        assert_eq!(light.illuminate(&Vec3::zeros(), &up(), SURFACE), SURFACE);
        // Facing away: nothing
        assert_eq!(
            light.illuminate(&Vec3::zeros(), &-up(), SURFACE),
            Color::BLACK
        );
        // 60 degrees off: half strength
        let tilted = Vec3::new(3f64.sqrt() / 2.0, 0.5, 0.0);
        let c = light.illuminate(&Vec3::zeros(), &tilted, Color::new(200, 100, 50));
        assert_eq!(c, Color::new(100, 50, 25));
    }

    #[test]
    fn test_directional_unnormalized_variant() {
        let light = Light::Directional {
            direction: Vec3::new(0.0, -3.0, 0.0),
            color: Color::WHITE,
            intensity: 1.0,
        };
        let surface = Color::new(60, 60, 60);
        assert_eq!(light.illuminate(&Vec3::zeros(), &up(), surface), surface);
    }

    #[test]
    fn test_attenuation_strictly_decreasing() {
        assert_eq!(attenuation(0.0), 1.0);
        let mut previous = attenuation(0.0);
        for i in 1..2000 {
            let current = attenuation(f64::from(i) * 0.05);
            assert!(current < previous);
            assert!(current > 0.0);
            previous = current;
        }
    }

    #[test]
    fn test_point_light_dims_with_distance() {
        let near = Light::point(Vec3::new(0.0, 1.0, 0.0), Color::WHITE, 1.0);
        let far = Light::point(Vec3::new(0.0, 10.0, 0.0), Color::WHITE, 1.0);
        let c_near = near.illuminate(&Vec3::zeros(), &up(), Color::WHITE);
        let c_far = far.illuminate(&Vec3::zeros(), &up(), Color::WHITE);
        // 255 / (1 + 0.1 + 0.01) = 229.7
        assert_eq!(c_near, Color::new(229, 229, 229));
        // 255 / (1 + 1 + 1) = 85, give or take truncation
        assert!((84..=85).contains(&c_far.r));
        assert_eq!(c_far.r, c_far.g);
    }

    #[test]
    fn test_point_light_behind_surface_is_dark() {
        let light = Light::point(Vec3::new(0.0, -2.0, 0.0), Color::WHITE, 5.0);
        assert_eq!(
            light.illuminate(&Vec3::zeros(), &up(), Color::WHITE),
            Color::BLACK
        );
    }
}
