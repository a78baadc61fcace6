use std::time::Duration;

use dive_common::{Vector2, Viewport, remap};
use dive_stream::{DisplayList, StreamerConfig, WorldStreamer};

use crate::camera::Camera;
use crate::progression::{Progression, Upgrade};

/// World units per metre shown to the player.
const UNITS_PER_METRE: f32 = 100.0;

/// Frames between generator payouts.
const GENERATOR_PERIOD: usize = 10;

/// Parameters of a scripted descent.
#[derive(Debug, Clone)]
pub struct DiveOptions {
    pub frames: usize,
    /// Wheel delta fed in every frame.
    pub scroll: f32,
    pub start_depth: f32,
    /// Depth at which the run ascends and stops.
    pub max_depth: f32,
    /// Starting scroll speed level.
    pub speed: f32,
    /// Starting collection radius.
    pub reach: f32,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for DiveOptions {
    fn default() -> Self {
        Self {
            frames: 3_000,
            scroll: 100.0,
            start_depth: -1_000.0,
            max_depth: 100_000.0,
            speed: 1.0,
            reach: 40.0,
            screen_width: 1280.0,
            screen_height: 720.0,
        }
    }
}

/// Outcome of a scripted descent.
#[derive(Debug, Clone)]
pub struct DiveReport {
    pub frames: usize,
    pub depth: f32,
    pub ascended: bool,
    pub collected: usize,
    pub effects_spawned: usize,
    pub progression: Progression,
    pub loaded_chunks: usize,
    pub indexed: usize,
    pub in_effect: usize,
    pub displayed: usize,
    pub tick_average: Duration,
    pub tick_max: Duration,
}

impl DiveReport {
    pub fn depth_metres(&self) -> f32 {
        self.depth / UNITS_PER_METRE
    }
}

impl std::fmt::Display for DiveReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Dive: frames={} depth={:.0}m ascended={}",
            self.frames,
            self.depth_metres(),
            self.ascended
        )?;
        writeln!(
            f,
            "Progress: level={} xp={:.1}/{:.0} total_xp={:.1} upgrades={:?}",
            self.progression.level,
            self.progression.xp,
            self.progression.max_xp,
            self.progression.total_xp,
            self.progression.upgrades
        )?;
        writeln!(
            f,
            "World: loaded_chunks={} indexed={} in_effect={} displayed={}",
            self.loaded_chunks, self.indexed, self.in_effect, self.displayed
        )?;
        writeln!(
            f,
            "Collected: hits={} generator_effects={}",
            self.collected, self.effects_spawned
        )?;
        write!(
            f,
            "Tick: avg={:?} max={:?}",
            self.tick_average, self.tick_max
        )
    }
}

/// Drive the streamer through a descent: scroll, sweep the cursor, collect
/// what it touches, pay out the generator and tick effects every frame.
pub fn run_dive(config: StreamerConfig, options: &DiveOptions) -> anyhow::Result<DiveReport> {
    let mut streamer = WorldStreamer::new(config, DisplayList::new())?;
    let mut progression = Progression {
        speed: options.speed,
        reach: options.reach,
        ..Progression::default()
    };
    let mut camera = Camera::new(
        Vector2::new(0.0, options.start_depth),
        options.screen_width,
        options.screen_height,
    );
    streamer.sync_viewport(&camera);

    let mut collected = 0;
    let mut effects_spawned = 0;
    let mut ascended = false;
    let mut frames = 0;

    for frame in 0..options.frames {
        frames = frame + 1;

        camera.scroll(progression.scroll_step(options.scroll));
        if camera.follow() {
            streamer.sync_viewport(&camera);
        }

        let sweep = (frame as f32 * 0.07).sin() * options.screen_width * 0.35;
        let cursor = camera.to_world(Vector2::new(
            options.screen_width / 2.0 + sweep,
            options.screen_height / 2.0,
        ));

        for hit in streamer.collect(cursor, progression.reach) {
            collected += 1;
            let levels = progression.award(hit.reward());
            level_up(&mut progression, levels);
        }

        if progression.gen_xp > 0.0 && frame % GENERATOR_PERIOD == 0 {
            let reward = progression.gen_xp;
            let levels = progression.award(reward);
            level_up(&mut progression, levels);
            streamer.add_effect(cursor.x + 40.0, cursor.y - 40.0, reward);
            effects_spawned += 1;
        }

        streamer.tick(cursor);

        if cursor.y >= options.max_depth {
            ascended = true;
            tracing::info!(frame, depth = cursor.y, "reached ascension depth");
            break;
        }
    }

    let depth = camera.visible_bounds().y;
    if let Ok(progress) = remap(depth, 0.0, options.max_depth, 0.0, 1.0) {
        tracing::info!(progress = progress.clamp(0.0, 1.0), "ascension progress");
    }

    Ok(DiveReport {
        frames,
        depth,
        ascended,
        collected,
        effects_spawned,
        progression,
        loaded_chunks: streamer.loaded_chunks().len(),
        indexed: streamer.indexed_count(),
        in_effect: streamer.in_effect().len(),
        displayed: streamer.display().len(),
        tick_average: streamer.tick_timer().average(),
        tick_max: streamer.tick_timer().max(),
    })
}

/// Upgrades are taken in a fixed rotation, one per level gained.
fn level_up(progression: &mut Progression, levels: u32) {
    for _ in 0..levels {
        let upgrade = Upgrade::ALL[progression.upgrades.len() % Upgrade::ALL.len()];
        progression.apply(upgrade);
        tracing::info!(level = progression.level, ?upgrade, "level up");
    }
}
