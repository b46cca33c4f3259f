/// Viewer configuration loaded from JSON; `{}` describes the stock demo scene
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sr3d_core::{stl, Color, Light, Mesh, RotationState, Vec3};

/// Top-level viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Target frames per second
    pub fps: u32,
    /// Clear color, RGB
    pub background: [u8; 3],
    pub wireframe: bool,
    pub backface_culling: bool,
    pub lighting: bool,
    /// Camera travel per movement key press, world units
    pub move_speed: f64,
    /// Orbit radians per dragged terminal cell (arrow keys count as one cell)
    pub orbit_sensitivity: f64,
    /// Camera travel per scroll step
    pub zoom_step: f64,
    /// Animate meshes with `spin` / `orbit`
    pub auto_rotate: bool,
    pub camera: CameraConfig,
    pub lights: Vec<LightConfig>,
    pub meshes: Vec<MeshConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            background: [20, 20, 30],
            wireframe: false,
            backface_culling: true,
            lighting: true,
            move_speed: 0.2,
            orbit_sensitivity: 0.05,
            zoom_step: 0.5,
            auto_rotate: true,
            camera: CameraConfig::default(),
            lights: default_lights(),
            meshes: default_meshes(),
        }
    }
}

impl ViewerConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn background_color(&self) -> Color {
        Color::from(self.background)
    }

    pub fn scene_lights(&self) -> Vec<Light> {
        self.lights.iter().map(LightConfig::to_light).collect()
    }
}

/// Where the camera starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f64; 3],
    pub target: [f64; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 2.0, -8.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LightConfig {
    Ambient {
        color: [u8; 3],
        intensity: f64,
    },
    Directional {
        direction: [f64; 3],
        color: [u8; 3],
    },
    Point {
        position: [f64; 3],
        color: [u8; 3],
        intensity: f64,
    },
}

impl LightConfig {
    pub fn to_light(&self) -> Light {
        match *self {
            LightConfig::Ambient { color, intensity } => Light::ambient(color.into(), intensity),
            LightConfig::Directional { direction, color } => {
                Light::directional(vec3(direction), color.into())
            }
            LightConfig::Point {
                position,
                color,
                intensity,
            } => Light::point(vec3(position), color.into(), intensity),
        }
    }
}

/// Mesh source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Cube {
        size: f64,
    },
    Pyramid {
        size: f64,
    },
    /// STL file, drawn in one flat color
    Stl {
        path: PathBuf,
        #[serde(default = "default_stl_color")]
        color: [u8; 3],
    },
}

/// Circular path in the XZ plane around the world origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    pub radius: f64,
    /// Radians per second
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(default)]
    pub position: [f64; 3],
    /// Euler angles in radians
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
    /// Radians per second about each axis while auto-rotating
    #[serde(default)]
    pub spin: [f64; 3],
    #[serde(default)]
    pub orbit: Option<OrbitConfig>,
}

impl MeshConfig {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: unit_scale(),
            spin: [0.0; 3],
            orbit: None,
        }
    }

    /// Build the mesh, reading the STL file if there is one.
    pub fn build(&self) -> Result<Mesh> {
        let mesh = match &self.shape {
            Shape::Cube { size } => Mesh::cube(*size),
            Shape::Pyramid { size } => Mesh::pyramid(*size),
            Shape::Stl { path, color } => {
                let data = std::fs::read(path)
                    .with_context(|| format!("reading STL {}", path.display()))?;
                stl::parse_stl(&data, Color::from(*color))
                    .with_context(|| format!("parsing STL {}", path.display()))?
            }
        };

        let [rx, ry, rz] = self.rotation;
        Ok(mesh
            .with_position(vec3(self.position))
            .with_rotation(RotationState::new(rx, ry, rz))
            .with_scale(vec3(self.scale)))
    }
}

pub fn vec3([x, y, z]: [f64; 3]) -> Vec3 {
    Vec3::new(x, y, z)
}

fn unit_scale() -> [f64; 3] {
    [1.0; 3]
}

fn default_stl_color() -> [u8; 3] {
    [180, 180, 200]
}

fn default_lights() -> Vec<LightConfig> {
    vec![
        LightConfig::Ambient {
            color: [255, 255, 255],
            intensity: 0.3,
        },
        LightConfig::Directional {
            direction: [-1.0, -1.0, -1.0],
            color: [255, 255, 255],
        },
        LightConfig::Point {
            position: [3.0, 3.0, -3.0],
            color: [255, 200, 150],
            intensity: 0.8,
        },
    ]
}

fn default_meshes() -> Vec<MeshConfig> {
    vec![
        MeshConfig {
            position: [-3.0, 0.0, 0.0],
            spin: [0.3, 0.5, 0.0],
            ..MeshConfig::new(Shape::Cube { size: 2.0 })
        },
        MeshConfig {
            position: [3.0, -1.0, 0.0],
            spin: [0.0, -0.4, 0.0],
            ..MeshConfig::new(Shape::Pyramid { size: 2.0 })
        },
        MeshConfig {
            position: [0.0, 3.0, 2.0],
            spin: [0.0, 0.8, 0.0],
            orbit: Some(OrbitConfig {
                radius: 4.0,
                speed: 0.5,
            }),
            ..MeshConfig::new(Shape::Cube { size: 1.0 })
        },
    ]
}
