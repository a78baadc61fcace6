mod camera;
mod config;
mod dive;
mod progression;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dive_common::{Vector2, ViewBounds};
use dive_stream::{DisplayList, WorldStreamer};
use tracing_subscriber::EnvFilter;

use crate::config::load_config;
use crate::dive::{DiveOptions, run_dive};

#[derive(Parser)]
#[command(name = "dive-cli", about = "Headless driver for the dive world")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Streamer config as JSON; missing fields take their defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Play a scripted descent and summarize it
    Dive {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "3000")]
        frames: usize,
        /// Wheel delta applied every frame
        #[arg(short, long, default_value = "100")]
        scroll: f32,
        /// Depth (world units) that ends the run
        #[arg(long, default_value = "100000")]
        max_depth: f32,
        /// Starting scroll speed level
        #[arg(long, default_value = "1")]
        speed: f32,
        /// Starting collection radius
        #[arg(short, long, default_value = "40")]
        reach: f32,
        /// RNG seed for placement and rewards
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Stream the screen around a point and list what a radius query finds
    Probe {
        #[arg(short, long, default_value = "0")]
        x: f32,
        #[arg(short, long, default_value = "50000")]
        y: f32,
        /// Query radius
        #[arg(short, long, default_value = "40")]
        radius: f32,
        /// RNG seed for placement and rewards
        #[arg(long)]
        seed: Option<u64>,
        /// Also dump every sprite on the display
        #[arg(long)]
        dump: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            println!("dive-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", dive_common::crate_info());
            println!("stream: {}", dive_stream::crate_info());
        }
        Commands::Dive {
            frames,
            scroll,
            max_depth,
            speed,
            reach,
            seed,
        } => {
            let config = load_config(cli.config.as_deref(), seed)?;
            let options = DiveOptions {
                frames,
                scroll,
                max_depth,
                speed,
                reach,
                ..DiveOptions::default()
            };
            let report = run_dive(config, &options)?;
            println!("{report}");
        }
        Commands::Probe {
            x,
            y,
            radius,
            seed,
            dump,
        } => {
            let config = load_config(cli.config.as_deref(), seed)?;
            let mut streamer = WorldStreamer::new(config, DisplayList::new())?;

            let center = Vector2::new(x, y);
            let screen = DiveOptions::default();
            let bounds = ViewBounds::new(
                x - screen.screen_width / 2.0,
                y - screen.screen_height / 2.0,
                screen.screen_width,
                screen.screen_height,
            );
            streamer.on_viewport_changed(bounds);
            let stats = streamer.stats();
            println!(
                "Streamed {} chunks, {} entities in {:?}",
                stats.total_loaded_chunks, stats.entities_generated, stats.update_time
            );

            let mut hits = streamer.radius_query(center, radius);
            hits.sort_by(|a, b| a.position().distance(center).total_cmp(&b.position().distance(center)));
            println!("{} within {radius} of ({x}, {y}):", hits.len());
            for hit in &hits {
                let p = hit.position();
                println!(
                    "  [{}] pos=({:.1}, {:.1}) reward={:.2} dist={:.1}",
                    hit.id(),
                    p.x,
                    p.y,
                    hit.reward(),
                    p.distance(center)
                );
            }

            if dump {
                print!("{}", streamer.display().render_text());
            }
        }
    }

    Ok(())
}
