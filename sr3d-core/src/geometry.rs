/// Geometry primitives for 3D rendering
use crate::color::Color;
use crate::transform::{Mat4, RotationState, Transform};
use crate::vector::{centroid, Vec3, VectorExt};

/// A 3D vertex with position, normal and color
///
/// The pipeline shades per face, so `normal` and `color` are carried but not
/// interpolated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Color,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            normal: Vec3::new(0.0, 0.0, 1.0),
            color: Color::WHITE,
        }
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// A flat-colored triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub color: Color,
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self::with_color(v0, v1, v2, Color::WHITE)
    }

    pub fn with_color(v0: Vertex, v1: Vertex, v2: Vertex, color: Color) -> Self {
        Self {
            vertices: [v0, v1, v2],
            color,
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.positions();
        (v1 - v0).cross(&(v2 - v0)).normalize_or_zero()
    }

    pub fn center(&self) -> Vec3 {
        let [v0, v1, v2] = self.positions();
        centroid(&v0, &v1, &v2)
    }

    #[inline]
    pub fn positions(&self) -> [Vec3; 3] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ]
    }
}

/// A 3D mesh composed of triangles, placed in the world by its own
/// position, Euler rotation and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
    pub position: Vec3,
    pub rotation: RotationState,
    pub scale: Vec3,
}

impl Mesh {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
            position: Vec3::zeros(),
            rotation: RotationState::zero(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-world matrix.
    ///
    /// Composed as `S * Rx * Ry * Rz * T`, so a column point is translated
    /// first and scaled last. The order is fixed; changing it changes how
    /// combined rotation and scale look.
    pub fn transform_matrix(&self) -> Mat4 {
        let mut transform = Transform::identity();
        transform *= Transform::scale(self.scale.x, self.scale.y, self.scale.z);
        transform *= Transform::rotation_matrix(&self.rotation);
        transform *= Transform::translation(self.position.x, self.position.y, self.position.z);
        transform
    }

    /// Axis-aligned cube centered at the origin, one flat color per face
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // Corners listed counter-clockwise as seen from outside
        let faces: [([[f64; 3]; 4], Color); 6] = [
            // Back (-Z)
            (
                [[-h, -h, -h], [-h, h, -h], [h, h, -h], [h, -h, -h]],
                Color::new(255, 100, 100),
            ),
            // Front (+Z)
            (
                [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
                Color::new(100, 255, 100),
            ),
            // Top (+Y)
            (
                [[-h, h, -h], [-h, h, h], [h, h, h], [h, h, -h]],
                Color::new(100, 100, 255),
            ),
            // Bottom (-Y)
            (
                [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
                Color::new(255, 255, 100),
            ),
            // Right (+X)
            (
                [[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]],
                Color::new(255, 100, 255),
            ),
            // Left (-X)
            (
                [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
                Color::new(100, 255, 255),
            ),
        ];

        for (corners, color) in faces {
            let [a, b, c, d] = corners.map(|[x, y, z]| Vertex::new(x, y, z));
            mesh.add_triangle(Triangle::with_color(a, b, c, color));
            mesh.add_triangle(Triangle::with_color(a, c, d, color));
        }

        mesh
    }

    /// Square-based pyramid: base on y = 0, apex at (0, size, 0)
    pub fn pyramid(size: f64) -> Self {
        let s = size / 2.0;
        let apex = Vertex::new(0.0, size, 0.0);
        let mut mesh = Self::with_capacity(6);

        let base = Color::new(200, 150, 100);
        mesh.add_triangle(Triangle::with_color(
            Vertex::new(-s, 0.0, -s),
            Vertex::new(s, 0.0, -s),
            Vertex::new(s, 0.0, s),
            base,
        ));
        mesh.add_triangle(Triangle::with_color(
            Vertex::new(-s, 0.0, -s),
            Vertex::new(s, 0.0, s),
            Vertex::new(-s, 0.0, s),
            base,
        ));

        let sides = [
            ([-s, -s], [s, -s], Color::new(150, 100, 200)),
            ([s, -s], [s, s], Color::new(100, 200, 150)),
            ([s, s], [-s, s], Color::new(200, 100, 150)),
            ([-s, s], [-s, -s], Color::new(150, 200, 100)),
        ];
        for ([x0, z0], [x1, z1], color) in sides {
            mesh.add_triangle(Triangle::with_color(
                Vertex::new(x0, 0.0, z0),
                apex,
                Vertex::new(x1, 0.0, z1),
                color,
            ));
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
