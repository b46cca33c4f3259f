/// SR3D Terminal Viewer
///
/// Renders the demo scene (or an STL model) with the software renderer and
/// shows it in the terminal using truecolor half blocks.
/// Controls:
///   - WASD: Move the camera
///   - Space / C: Move up / down
///   - Arrow keys or mouse drag: Orbit around the target
///   - Scroll or +/-: Zoom
///   - F / R / L: Toggle wireframe, auto-rotate, lighting
///   - Q/ESC: Quit
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sr3d_terminal::config::{MeshConfig, Shape};
use sr3d_terminal::{TerminalApp, ViewerConfig};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: sr3d-terminal [--config <file.json>] [--stl <model.stl>] [--wireframe] [--no-lighting]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    stl: Option<PathBuf>,
    wireframe: bool,
    no_lighting: bool,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--stl" => {
                let path = args.next().context("--stl needs a path")?;
                parsed.stl = Some(PathBuf::from(path));
            }
            "--wireframe" => parsed.wireframe = true,
            "--no-lighting" => parsed.no_lighting = true,
            "-h" | "--help" => parsed.help = true,
            other => bail!("unknown argument `{other}`\n{USAGE}"),
        }
    }
    Ok(parsed)
}

fn build_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    if let Some(path) = &args.stl {
        let mut model = MeshConfig::new(Shape::Stl {
            path: path.clone(),
            color: [180, 180, 200],
        });
        model.spin = [0.0, 0.5, 0.0];
        config.meshes = vec![model];
    }
    if args.wireframe {
        config.wireframe = true;
    }
    if args.no_lighting {
        config.lighting = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the frame on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = build_config(&args)?;
    let mut app = TerminalApp::new(&config).context("setting up the viewer")?;
    app.run().context("terminal I/O failed")?;

    Ok(())
}
