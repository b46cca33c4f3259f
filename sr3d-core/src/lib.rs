/// SR3D Core Library - software 3D rendering on the CPU
///
/// Vector and matrix algebra, camera, lights, meshes and a renderer that
/// culls, depth sorts and rasterizes flat shaded triangles into a
/// [`FrameBuffer`]. Nothing here touches a terminal or a GPU.

pub mod color;
pub mod framebuffer;
pub mod geometry;
pub mod light;
pub mod projection;
pub mod renderer;
pub mod stl;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use color::Color;
pub use framebuffer::FrameBuffer;
pub use geometry::{Mesh, Triangle, Vertex};
pub use light::Light;
pub use projection::Camera;
pub use renderer::{RenderStats, Renderer};
pub use transform::{Mat4, RotationState, Transform};
pub use vector::{Vec3, VectorExt};
