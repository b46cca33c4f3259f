/// Flat-shaded triangle pipeline: transform, cull, light, sort, rasterize
use tracing::{debug, trace};

use crate::color::{Color, ColorSum};
use crate::framebuffer::FrameBuffer;
use crate::geometry::{Mesh, Triangle};
use crate::light::Light;
use crate::projection::Camera;
use crate::transform::{Mat4, Transform};
use crate::vector::{centroid, Vec3, VectorExt};

/// A clip-space vertex is "inside" when every axis lies within this bound.
///
/// Looser than the nominal [-1, 1] so triangles straddling the screen edge
/// are kept whole; there is no per-plane clipping.
pub const FRUSTUM_BOUND: f64 = 1.5;

/// Opacity of the dark outline stroked around filled triangles
pub const OUTLINE_ALPHA: u8 = 50;

/// Triangle counters for one `render()` call, or accumulated over a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Triangles looked at
    pub submitted: usize,
    /// Dropped by the backface test
    pub culled: usize,
    /// Dropped because no vertex was inside the frustum bound
    pub rejected: usize,
    /// Rasterized
    pub drawn: usize,
}

impl RenderStats {
    fn accumulate(&mut self, other: &RenderStats) {
        self.submitted += other.submitted;
        self.culled += other.culled;
        self.rejected += other.rejected;
        self.drawn += other.drawn;
    }
}

/// A triangle ready for rasterization
#[derive(Debug, Clone, Copy)]
struct ProjectedTriangle {
    points: [(i32, i32); 3],
    color: Color,
    depth: f64,
}

/// Software renderer that owns its frame buffer, camera and lights
///
/// One instance is driven by one caller: `clear`, then `render` per mesh,
/// then read `buffer`. Every mutating call takes `&mut self`, so concurrent
/// use has to be serialized by the owner.
pub struct Renderer {
    buffer: FrameBuffer,
    camera: Option<Camera>,
    lights: Vec<Light>,
    wireframe: bool,
    backface_culling: bool,
    lighting: bool,
    last_stats: RenderStats,
    frame_stats: RenderStats,
    // Scratch list reused across render calls
    projected: Vec<ProjectedTriangle>,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: FrameBuffer::new(width, height),
            camera: None,
            lights: Vec::new(),
            wireframe: false,
            backface_culling: true,
            lighting: true,
            last_stats: RenderStats::default(),
            frame_stats: RenderStats::default(),
            projected: Vec::new(),
        }
    }

    /// Install the camera. Its aspect ratio is matched to the buffer.
    pub fn set_camera(&mut self, mut camera: Camera) {
        camera.aspect = self.aspect_ratio();
        debug!(aspect = camera.aspect, fov = camera.fov, "camera set");
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn clear_lights(&mut self) {
        self.lights.clear();
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn set_backface_culling(&mut self, culling: bool) {
        self.backface_culling = culling;
    }

    pub fn backface_culling(&self) -> bool {
        self.backface_culling
    }

    pub fn set_lighting(&mut self, lighting: bool) {
        self.lighting = lighting;
    }

    pub fn lighting(&self) -> bool {
        self.lighting
    }

    /// The image produced so far
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    /// Counters from the most recent `render()` call
    pub fn stats(&self) -> RenderStats {
        self.last_stats
    }

    /// Counters summed over every `render()` since the last `clear()`
    pub fn frame_stats(&self) -> RenderStats {
        self.frame_stats
    }

    /// Reallocate both grids. Previous contents are lost.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.buffer = FrameBuffer::new(width, height);
        let aspect = self.aspect_ratio();
        if let Some(camera) = self.camera.as_mut() {
            camera.aspect = aspect;
        }
        debug!(width, height, "frame buffer resized");
    }

    /// Start a new frame: fill with `color`, reset depth and frame counters
    pub fn clear(&mut self, color: Color) {
        self.buffer.clear(color);
        self.frame_stats = RenderStats::default();
    }

    /// Draw one mesh over whatever is already in the buffer.
    ///
    /// Triangles are depth-sorted against each other only within this call;
    /// a later call always paints over an earlier one. Without a camera
    /// nothing happens.
    pub fn render(&mut self, mesh: &Mesh) {
        let Some(camera) = self.camera.as_ref() else {
            return;
        };

        let model = mesh.transform_matrix();
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let mvp = Transform::mvp_matrix(&model, &view, &projection);

        let lights: &[Light] = if self.lighting { &self.lights } else { &[] };
        let stage = Stage {
            model: &model,
            mvp: &mvp,
            eye: camera.position,
            width: self.buffer.width() as f64,
            height: self.buffer.height() as f64,
            cull: self.backface_culling,
            lights,
        };

        let mut stats = RenderStats {
            submitted: mesh.triangles.len(),
            ..RenderStats::default()
        };

        self.projected.clear();
        for triangle in &mesh.triangles {
            match stage.project(triangle) {
                Ok(projected) => self.projected.push(projected),
                Err(Discard::Culled) => stats.culled += 1,
                Err(Discard::OutsideFrustum) => stats.rejected += 1,
            }
        }

        // Painter's algorithm: farthest first
        self.projected.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        for tri in &self.projected {
            if self.wireframe {
                self.buffer.stroke_polygon(&tri.points, tri.color, u8::MAX);
            } else {
                let corners = tri.points.map(|(x, y)| (f64::from(x), f64::from(y)));
                self.buffer.fill_polygon(&corners, tri.color);
                self.buffer.stroke_polygon(&tri.points, Color::BLACK, OUTLINE_ALPHA);
            }
        }
        stats.drawn = self.projected.len();

        trace!(
            submitted = stats.submitted,
            culled = stats.culled,
            rejected = stats.rejected,
            drawn = stats.drawn,
            "mesh rendered"
        );
        self.last_stats = stats;
        self.frame_stats.accumulate(&stats);
    }

    fn aspect_ratio(&self) -> f64 {
        let (w, h) = (self.buffer.width(), self.buffer.height());
        if h == 0 {
            1.0
        } else {
            w as f64 / h as f64
        }
    }
}

enum Discard {
    Culled,
    OutsideFrustum,
}

/// Per-call inputs shared by every triangle of one mesh
struct Stage<'a> {
    model: &'a Mat4,
    mvp: &'a Mat4,
    eye: Vec3,
    width: f64,
    height: f64,
    cull: bool,
    lights: &'a [Light],
}

impl Stage<'_> {
    fn project(&self, triangle: &Triangle) -> Result<ProjectedTriangle, Discard> {
        let local = triangle.positions();
        let world = local.map(|p| Transform::transform_point(self.model, &p));

        let normal = (world[1] - world[0])
            .cross(&(world[2] - world[0]))
            .normalize_or_zero();

        // First vertex stands in for the whole face when picking a view ray
        if self.cull {
            let view_dir = (world[0] - self.eye).normalize_or_zero();
            if normal.dot(&view_dir) >= 0.0 {
                return Err(Discard::Culled);
            }
        }

        let clip = local.map(|p| Transform::transform_point(self.mvp, &p));
        if !clip.iter().any(in_frustum) {
            return Err(Discard::OutsideFrustum);
        }

        let points = clip.map(|c| self.to_screen(&c));

        let color = if self.lights.is_empty() {
            triangle.color
        } else {
            let center = centroid(&world[0], &world[1], &world[2]);
            shade(self.lights, &center, &normal, triangle.color)
        };

        let depth = (clip[0].z + clip[1].z + clip[2].z) / 3.0;

        Ok(ProjectedTriangle {
            points,
            color,
            depth,
        })
    }

    /// Clip space to pixel coordinates, origin top-left
    fn to_screen(&self, clip: &Vec3) -> (i32, i32) {
        let x = (clip.x + 1.0) * 0.5 * self.width;
        let y = (1.0 - clip.y) * 0.5 * self.height;
        (x as i32, y as i32)
    }
}

fn in_frustum(v: &Vec3) -> bool {
    let inside = |c: f64| (-FRUSTUM_BOUND..=FRUSTUM_BOUND).contains(&c);
    inside(v.x) && inside(v.y) && inside(v.z)
}

/// Sum every light's contribution, clamped per channel
pub fn shade(lights: &[Light], point: &Vec3, normal: &Vec3, surface: Color) -> Color {
    let mut sum = ColorSum::default();
    for light in lights {
        sum.add(light.illuminate(point, normal, surface));
    }
    sum.clamped()
}
