/// Terminal front-end for the SR3D software renderer
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod config;
pub mod display;
pub mod scene;

pub use config::ViewerConfig;
pub use display::InputMapper;
pub use scene::{InputEvent, Scene};

use display::StatusModes;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    input: InputMapper,
    frame_time: Duration,
    size: (u16, u16),
    last_tick: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f64,
}

impl TerminalApp {
    pub fn new(config: &ViewerConfig) -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let (width, height) = display::buffer_size(cols, rows);
        let scene = Scene::from_config(config, width, height)?;

        let fps = config.fps.max(1);
        Ok(Self {
            scene,
            input: InputMapper::new(),
            frame_time: Duration::from_secs(1) / fps,
            size: (cols, rows),
            last_tick: Instant::now(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        info!(fps_target = 1.0 / self.frame_time.as_secs_f64(), "entering main loop");

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.scene.is_running() {
            let frame_start = Instant::now();

            // Handle input
            let events = self.poll_events()?;

            // Update
            let dt = self.last_tick.elapsed().as_secs_f64();
            self.last_tick = Instant::now();
            self.scene.tick(dt, &events);
            if !self.scene.is_running() {
                break;
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let since = self.last_fps_sample.elapsed();
            if since.as_secs() >= 1 {
                self.fps = f64::from(self.frame_count) / since.as_secs_f64();
                self.frame_count = 0;
                self.last_fps_sample = Instant::now();
            }
        }

        Ok(())
    }

    /// Drain everything queued since the last frame.
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            if let Event::Resize(cols, rows) = event {
                self.resize(cols, rows);
            } else if let Some(input) = self.input.map(&event) {
                events.push(input);
            }
        }
        Ok(events)
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
        let (width, height) = display::buffer_size(cols, rows);
        self.scene.resize(width, height);
        debug!(cols, rows, "terminal resized");
    }

    fn render(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        let buffer = self.scene.render();
        display::draw_buffer(buffer, &mut stdout)?;

        // Draw UI overlay
        let renderer = self.scene.renderer();
        let modes = StatusModes {
            wireframe: renderer.wireframe(),
            auto_rotate: self.scene.auto_rotate(),
            lights: renderer.lights().len(),
        };
        let status = display::status_line(self.fps, &self.scene.frame_stats(), modes);
        let (cols, rows) = self.size;
        display::draw_status(&mut stdout, rows.saturating_sub(display::STATUS_ROWS), cols, &status)?;

        stdout.flush()?;
        Ok(())
    }
}
