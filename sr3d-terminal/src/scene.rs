/// Scene state and the per-frame tick, driven by injected input events
use anyhow::Result;
use sr3d_core::{Camera, Color, FrameBuffer, Light, Mesh, RenderStats, Renderer, RotationState, Vec3};
use tracing::{debug, info};

use crate::config::{vec3, OrbitConfig, ViewerConfig};

/// User intent, independent of any input toolkit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    MoveUp,
    MoveDown,
    /// Drag distance in cells; `dx` swings the azimuth, `dy` the polar angle
    Orbit { dx: f64, dy: f64 },
    /// Scroll steps, positive zooms out
    Zoom(f64),
    ToggleWireframe,
    ToggleAutoRotate,
    ToggleLighting,
    Quit,
}

/// A mesh plus the animation that drives it
#[derive(Debug, Clone)]
struct Animated {
    mesh: Mesh,
    base_position: Vec3,
    base_rotation: RotationState,
    spin: Vec3,
    orbit: Option<OrbitConfig>,
}

impl Animated {
    fn new(mesh: Mesh, spin: Vec3, orbit: Option<OrbitConfig>) -> Self {
        Self {
            base_position: mesh.position,
            base_rotation: mesh.rotation,
            mesh,
            spin,
            orbit,
        }
    }

    fn advance_to(&mut self, time: f64) {
        let mut rotation = self.base_rotation;
        rotation.rotate(self.spin.x * time, self.spin.y * time, self.spin.z * time);
        self.mesh.rotation = rotation;

        if let Some(orbit) = self.orbit {
            let (sin, cos) = (time * orbit.speed).sin_cos();
            self.mesh.position = Vec3::new(
                cos * orbit.radius,
                self.base_position.y,
                sin * orbit.radius,
            );
        }
    }
}

/// Everything the viewer draws, plus the renderer that draws it
pub struct Scene {
    renderer: Renderer,
    meshes: Vec<Animated>,
    /// Lights restored by the lighting toggle
    configured_lights: Vec<Light>,
    background: Color,
    move_speed: f64,
    orbit_sensitivity: f64,
    zoom_step: f64,
    auto_rotate: bool,
    time: f64,
    running: bool,
}

impl Scene {
    /// Build the scene described by `config` on a `width` x `height` buffer.
    pub fn from_config(config: &ViewerConfig, width: usize, height: usize) -> Result<Self> {
        let mut renderer = Renderer::new(width, height);

        let mut camera = Camera::looking_at(vec3(config.camera.position), vec3(config.camera.target));
        camera.fov = config.camera.fov_degrees.to_radians();
        renderer.set_camera(camera);

        let configured_lights = config.scene_lights();
        for light in &configured_lights {
            renderer.add_light(*light);
        }
        renderer.set_wireframe(config.wireframe);
        renderer.set_backface_culling(config.backface_culling);
        renderer.set_lighting(config.lighting);

        let meshes = config
            .meshes
            .iter()
            .map(|entry| -> Result<Animated> {
                Ok(Animated::new(entry.build()?, vec3(entry.spin), entry.orbit))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            meshes = meshes.len(),
            lights = configured_lights.len(),
            width,
            height,
            "scene ready"
        );

        let mut scene = Self {
            renderer,
            meshes,
            configured_lights,
            background: config.background_color(),
            move_speed: config.move_speed,
            orbit_sensitivity: config.orbit_sensitivity,
            zoom_step: config.zoom_step,
            auto_rotate: config.auto_rotate,
            time: 0.0,
            running: true,
        };
        scene.animate();
        Ok(scene)
    }

    /// Apply `events` in order, then advance animation by `dt` seconds.
    ///
    /// Animation time only runs while auto-rotate is on.
    pub fn tick(&mut self, dt: f64, events: &[InputEvent]) {
        for event in events {
            self.apply(*event);
        }

        if self.auto_rotate {
            self.time += dt;
            self.animate();
        }
    }

    /// Clear and draw every mesh in order.
    pub fn render(&mut self) -> &FrameBuffer {
        self.renderer.clear(self.background);
        for animated in &self.meshes {
            self.renderer.render(&animated.mesh);
        }
        self.renderer.buffer()
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width > 0 && height > 0 {
            self.renderer.resize(width, height);
        }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.renderer.camera()
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter().map(|animated| &animated.mesh)
    }

    pub fn frame_stats(&self) -> RenderStats {
        self.renderer.frame_stats()
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    fn apply(&mut self, event: InputEvent) {
        let speed = self.move_speed;
        match event {
            InputEvent::MoveForward => self.with_camera(|c| c.move_forward(speed)),
            InputEvent::MoveBackward => self.with_camera(|c| c.move_forward(-speed)),
            InputEvent::StrafeLeft => self.with_camera(|c| c.strafe(-speed)),
            InputEvent::StrafeRight => self.with_camera(|c| c.strafe(speed)),
            InputEvent::MoveUp => self.with_camera(|c| c.move_vertical(speed)),
            InputEvent::MoveDown => self.with_camera(|c| c.move_vertical(-speed)),
            InputEvent::Orbit { dx, dy } => {
                let k = self.orbit_sensitivity;
                self.with_camera(|c| c.orbit(dy * k, dx * k));
            }
            InputEvent::Zoom(steps) => {
                let step = self.zoom_step;
                self.with_camera(|c| c.move_forward(-steps * step));
            }
            InputEvent::ToggleWireframe => {
                let wireframe = !self.renderer.wireframe();
                self.renderer.set_wireframe(wireframe);
                debug!(wireframe, "toggled wireframe");
            }
            InputEvent::ToggleAutoRotate => {
                self.auto_rotate = !self.auto_rotate;
                debug!(auto_rotate = self.auto_rotate, "toggled auto-rotate");
            }
            InputEvent::ToggleLighting => self.toggle_lighting(),
            InputEvent::Quit => self.running = false,
        }
    }

    fn with_camera(&mut self, f: impl FnOnce(&mut Camera)) {
        if let Some(camera) = self.renderer.camera_mut() {
            f(camera);
        }
    }

    /// Lights on: drop them all. Lights off: bring back the configured set.
    fn toggle_lighting(&mut self) {
        if self.renderer.lights().is_empty() {
            for light in &self.configured_lights {
                self.renderer.add_light(*light);
            }
            self.renderer.set_lighting(true);
        } else {
            self.renderer.clear_lights();
        }
        debug!(lights = self.renderer.lights().len(), "toggled lighting");
    }

    fn animate(&mut self) {
        let time = self.time;
        for animated in &mut self.meshes {
            animated.advance_to(time);
        }
    }
}
