//! Headless driver for the tile map renderer.
#![forbid(unsafe_code)]

mod demo;
mod worldgen;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use tessel_runtime::RendererSettings;
use tessel_tiles::MapConfig;

use crate::demo::DemoConfig;

#[derive(Parser, Debug)]
#[command(name = "tessel", about = "Chunked tile map renderer demo")]
struct Args {
    /// Map description (TOML). A noise map is generated when omitted.
    #[arg(long)]
    map: Option<PathBuf>,
    /// Renderer and demo settings (TOML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Renderer settings alone (TOML); replaces the `[renderer]` table of `--config`.
    #[arg(long)]
    renderer: Option<PathBuf>,
    #[arg(long, default_value_t = 256)]
    width: i32,
    #[arg(long, default_value_t = 256)]
    height: i32,
    #[arg(long, default_value_t = 1337)]
    seed: i32,
    /// Overrides `demo.frames` from the config.
    #[arg(long)]
    frames: Option<u32>,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => DemoConfig::from_path(path)?,
        None => DemoConfig::default(),
    };
    if let Some(path) = &args.renderer {
        cfg.renderer = RendererSettings::from_path(path)?;
    }
    if let Some(frames) = args.frames {
        cfg.demo.frames = frames;
    }

    let mut map = match &args.map {
        Some(path) => {
            log::info!("loading map from {}", path.display());
            MapConfig::from_path(path)?.build()?
        }
        None => worldgen::generate(args.width, args.height, args.seed, &cfg.noise),
    };
    log::info!(
        "map ready: {} tile sets, {} textures, tile size {}",
        map.data.tile_sets().len(),
        map.textures.len(),
        map.tile_size
    );
    demo::run(&mut map, &cfg)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
