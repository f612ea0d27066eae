mod draw;
mod game;
mod states;

use clap::{Parser, ValueEnum};
use draw::Draw2d;
use simplegame_assets::{AssetError, AssetRegistry, Image};
use simplegame_input::{InputEvent, KeyCode};
use simplegame_render::{HeadlessSurface, RasterSurface, Surface, SurfaceConfig};
use simplegame_render_wgpu::GpuSurface;
use simplegame_runner::{GameStateRunner, LogConfig, LogSink, Logger};
use states::{CRATE_SPRITE, TitleState};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Software canvas presented through a native window
    Raster,
    /// wgpu swap chain
    Gpu,
    /// In-memory surface; runs a fixed number of frames
    Headless,
}

#[derive(Parser)]
#[command(name = "simplegame-demo", about = "Sample platformer for the simplegame runtime")]
struct Cli {
    /// Surface backend
    #[arg(long, value_enum, default_value_t = Backend::Raster)]
    backend: Backend,

    /// Screen width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Screen height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Open fullscreen
    #[arg(long)]
    fullscreen: bool,

    /// Target frames per second
    #[arg(long, default_value_t = 25)]
    fps: u32,

    /// Frames to run with the headless backend
    #[arg(long, default_value_t = 250)]
    frames: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write info logs to this file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Silence info logs; warnings and errors still print
    #[arg(short, long)]
    quiet: bool,
}

fn log_config(cli: &Cli) -> LogConfig {
    let info_sink = match &cli.log_file {
        Some(path) => LogSink::File(path.clone()),
        None => LogSink::Stdout,
    };
    LogConfig::default()
        .with_info_sink(info_sink)
        .with_silent_info(cli.quiet)
        .with_filter(if cli.verbose { "debug" } else { "info" })
}

/// A bordered crate sprite, generated instead of decoded from disk.
fn crate_sprite(size: u32) -> Result<Image, AssetError> {
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let edge = x == 0 || y == 0 || x + 1 == size || y + 1 == size;
            let brace = x == y || x + y + 1 == size;
            let px = if edge || brace { [90, 55, 20, 255] } else { [170, 120, 60, 255] };
            rgba.extend_from_slice(&px);
        }
    }
    Image::new(size, size, rgba)
}

fn run<S>(surface: S, assets: AssetRegistry, fps: u32, logger: Logger) -> anyhow::Result<()>
where
    S: Surface + 'static,
    S::DrawContext: Draw2d + 'static,
{
    let mut runner = GameStateRunner::new(surface, assets)
        .with_initial_state(TitleState::new())
        .with_logger(logger);
    runner.set_fps(fps)?;
    runner.run()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new(&log_config(&cli));
    logger.install_global();
    tracing::info!(backend = ?cli.backend, width = cli.width, height = cli.height, "simplegame-demo starting");

    let mut assets = AssetRegistry::new();
    assets.insert_image(CRATE_SPRITE, crate_sprite(20)?);

    let config = SurfaceConfig::new("simplegame demo", cli.width, cli.height).with_fullscreen(cli.fullscreen);
    match cli.backend {
        Backend::Raster => run(RasterSurface::open(config)?, assets, cli.fps, logger),
        Backend::Gpu => run(GpuSurface::open(config)?, assets, cli.fps, logger),
        Backend::Headless => {
            let mut surface = HeadlessSurface::new(config).close_after(cli.frames);
            // Start the game and hold right so the run does something.
            for (code, pressed) in [(KeyCode::Enter, true), (KeyCode::Enter, false), (KeyCode::Right, true)] {
                surface.push_event(InputEvent::Key { code, pressed });
            }
            run(surface, assets, cli.fps, logger)
        }
    }
}
