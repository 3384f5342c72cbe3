//! RAYMAP: tile map editor for a raycaster engine
//!
//! Paint wall/floor/ceiling layers with the mouse, place entities, and
//! drive loading/saving from the console while the window stays live:
//! - Console thread reads commands and posts them to a one-slot mailbox
//! - Tick loop owns the world and applies one console command per tick
//! - Binary map/entity files the engine loads directly

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod command;
mod config;
mod editor;
mod storage;
mod world;

use std::path::PathBuf;

use clap::Parser;
use log::info;
use macroquad::prelude::*;

use app::AppState;
use config::EditorConfig;
use editor::{draw_status, draw_world, sample_keys, sample_mouse, Dispatcher, TextureSet};
use storage::Storage;
use world::WorldGrids;

#[derive(Parser, Debug)]
#[command(name = "raymap", version, about = "Tile map editor for a raycaster engine")]
struct Cli {
    /// Config file (default: raymap.ron, or $RAYMAP_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Map to open at startup (default: the config's default_map_file)
    #[arg(long)]
    map: Option<String>,

    /// Start with an empty WIDTH x HEIGHT map instead of loading one
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], conflicts_with = "map")]
    new: Option<Vec<i32>>,
}

/// Command line and config, resolved once
struct Startup {
    cli: Cli,
    config: EditorConfig,
}

lazy_static::lazy_static! {
    // Resolved on first use; window_conf runs before main's body
    static ref STARTUP: Startup = {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();
        let config = EditorConfig::load_or_default(cli.config.as_deref());
        Startup { cli, config }
    };
}

fn window_conf() -> Conf {
    let config = &STARTUP.config;
    Conf {
        window_title: format!("RAYMAP v{}", VERSION),
        window_width: config.window_width,
        window_height: config.window_height,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let startup = &*STARTUP;
    let config = startup.config.clone();
    let storage = Storage::with_base_dir(&config.data_dir);

    let dispatcher = match startup.cli.new.as_deref() {
        Some(&[width, height]) => Dispatcher::new(
            WorldGrids::new_clamped(width, height),
            storage,
            config.grid_view_size,
        ),
        _ => {
            let map_file = startup.cli.map.as_deref().unwrap_or(&config.default_map_file);
            Dispatcher::open(
                storage,
                map_file,
                (config.default_width, config.default_height),
                config.grid_view_size,
            )
        }
    };

    let textures = TextureSet::load(&config).await;
    let tick_interval = config.tick_interval_ms as f64 / 1000.0;

    let mut app = AppState::new(config, dispatcher);
    app.start_console();

    // Closing the window goes through shutdown so the map gets saved
    prevent_quit();

    info!("=== RAYMAP v{} ===", VERSION);

    loop {
        let frame_start = get_time();

        if !app.tick(&sample_mouse(), &sample_keys()) || is_quit_requested() {
            break;
        }

        clear_background(BLACK);
        draw_world(
            app.dispatcher.grids(),
            app.dispatcher.entities(),
            app.brush.layer,
            app.dispatcher.cell_size(),
            &textures,
        );
        draw_status(
            app.config.grid_view_size + 10.0,
            &app.brush,
            app.dispatcher.grids(),
            app.dispatcher.entities().len(),
        );

        // Fixed tick pacing: sleep for the bulk, spin for the last bit
        let spin_margin = 0.002; // 2ms
        while get_time() - frame_start + spin_margin < tick_interval {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        while get_time() - frame_start < tick_interval {
            std::hint::spin_loop();
        }

        next_frame().await;
    }

    info!("Shutting down");
    app.shutdown();
}
