//! # Espacial
//!
//! Runs the game loop headless: no window system, no GPU.
//!
//! ```bash
//! espacial                       # defaults, 300 frames
//! espacial loop.toml 600         # custom config, 600 frames
//! RUST_LOG=debug espacial        # include FPS reports
//! ```

use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use espacial::{
    GameLoop, HeadlessWindow, LoopConfig, LoopError, LoopResult, RecordingRenderer, Renderer,
    Window,
};
use espacial_core::{Color, EcsResult, Entity, Registry, Renderable, Transform, Vec2, Velocity};

/// Frames to present when none are given on the command line.
const DEFAULT_FRAMES: u64 = 300;

/// Sprite textures, by id.
const TEXTURES: [(&str, &str); 2] = [
    ("player_sprite", "assets/player.png"),
    ("enemy_sprite", "assets/enemy.png"),
];

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("espacial v{}", env!("CARGO_PKG_VERSION"));

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "espacial exited with an error");
            ExitCode::FAILURE
        }
    }
}

fn run() -> LoopResult<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => LoopConfig::from_file(path)?,
        None => LoopConfig::default(),
    };
    let frames = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| LoopError::Config(format!("frame count '{raw}': {e}")))?,
        None => DEFAULT_FRAMES,
    };

    // === WINDOW ===
    let mut window = HeadlessWindow::new(WIDTH, HEIGHT).with_frame_budget(frames);

    // === RENDERER ===
    let mut renderer = RecordingRenderer::new();
    let (width, height) = window.size();
    if !renderer.initialize(width, height) {
        return Err(LoopError::RendererInit {
            name: renderer.name().to_owned(),
            width,
            height,
        });
    }
    load_textures(&mut renderer, &TEXTURES);
    info!(renderer = renderer.name(), "renderer ready");

    // === REGISTRY ===
    let mut registry = Registry::new();
    let player = spawn_entities(&mut registry)?;

    // === LOOP ===
    {
        let mut game_loop = GameLoop::new(config)?;
        game_loop.initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))?;
        let result = game_loop.run();
        info!(
            frames = game_loop.frame_count(),
            steps = game_loop.total_steps(),
            fps = game_loop.fps(),
            "run finished"
        );
        game_loop.shutdown();
        result?;
    }

    if let Ok(t) = registry.get::<Transform>(player) {
        info!(x = t.position.x, y = t.position.y, "player final position");
    }
    registry.log_stats();

    // === SHUTDOWN (reverse order) ===
    registry.clear();
    renderer.shutdown();
    window.close();

    info!("espacial shut down cleanly");
    Ok(())
}

/// Registers every texture, warning about the ones the renderer refuses.
///
/// # Returns
///
/// Number of textures loaded.
fn load_textures(renderer: &mut dyn Renderer, textures: &[(&str, &str)]) -> usize {
    let mut loaded = 0;
    for &(id, path) in textures {
        if renderer.load_texture(id, Path::new(path)) {
            loaded += 1;
        } else {
            warn!(texture = id, path, "texture failed to load");
        }
    }
    loaded
}

/// A player drifting right and down, and a spinning enemy.
fn spawn_entities(registry: &mut Registry) -> EcsResult<Entity> {
    let player = registry.create_named("player");
    registry.add(player, Transform::new(Vec2::new(400.0, 300.0)))?;
    registry.add(player, Velocity::new(Vec2::new(50.0, 30.0)))?;
    registry.add(
        player,
        Renderable::with("player_sprite", Color::new(0.2, 0.8, 1.0, 1.0), 10),
    )?;

    let enemy = registry.create_named("enemy");
    registry.add(enemy, Transform::new(Vec2::new(100.0, 100.0)))?;
    registry.add(enemy, Velocity::with(Vec2::new(20.0, 15.0), 45.0))?;
    registry.add(
        enemy,
        Renderable::with("enemy_sprite", Color::new(1.0, 0.2, 0.2, 1.0), 10),
    )?;

    info!(entities = registry.count(), "entities spawned");
    Ok(player)
}
