use std::collections::HashSet;
use std::time::Instant;

use dive_common::{CellCoord, EntityId, Vector2, ViewBounds, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::StreamerConfig;
use crate::density::{chunk_density, roll_reward};
use crate::display::DisplayContainer;
use crate::entity::{Entity, Lifecycle};
use crate::error::StreamResult;
use crate::spatial::SpatialIndex;
use crate::stats::{StreamStats, TickTimer};

/// Streams reward entities in and out as the viewport moves.
///
/// Owns the spatial index of collectable entities, the set of loaded chunks
/// and the list of in-effect entities flying toward the collector. The
/// display container is told about every entity that appears, moves or dies.
///
/// Entity lifecycle:
/// `created -> indexed -> in-effect -> destroyed`, or
/// `created -> indexed -> destroyed` when its chunk unloads first.
pub struct WorldStreamer<D, R = StdRng> {
    config: StreamerConfig,
    index: SpatialIndex<Entity>,
    loaded: HashSet<CellCoord>,
    in_effect: Vec<Entity>,
    display: D,
    rng: R,
    stats: StreamStats,
    tick_timer: TickTimer,
}

impl<D: DisplayContainer> WorldStreamer<D, StdRng> {
    /// Build a streamer seeded from `config.seed`, or from the OS when unset.
    pub fn new(config: StreamerConfig, display: D) -> StreamResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, display, rng)
    }
}

impl<D: DisplayContainer, R: Rng> WorldStreamer<D, R> {
    /// Build a streamer drawing placement and rewards from `rng`.
    pub fn with_rng(config: StreamerConfig, display: D, rng: R) -> StreamResult<Self> {
        config.validate()?;
        let index = SpatialIndex::new(config.grid_size, Entity::position as fn(&Entity) -> Vector2)?;
        Ok(Self {
            config,
            index,
            loaded: HashSet::new(),
            in_effect: Vec::new(),
            display,
            rng,
            stats: StreamStats::default(),
            tick_timer: TickTimer::default(),
        })
    }

    pub fn config(&self) -> &StreamerConfig {
        &self.config
    }

    /// Chunk rectangle covered by a world-space box.
    ///
    /// The box is half-open: its right and bottom edges belong to the next
    /// cell, so a box that ends exactly on a grid line does not pull in an
    /// extra row or column. A zero-sized box covers the single cell it sits in.
    ///
    /// Chunks are confined to `[-CellCoord::LIMIT, CellCoord::LIMIT]` on both
    /// axes; a box beyond that range covers the boundary chunks.
    pub fn chunks_covering(&self, bounds: ViewBounds) -> (CellCoord, CellCoord) {
        let grid = self.config.grid_size;
        let top_left = bounds.top_left().to_cell(grid);
        let edge = bounds.bottom_right() / grid;
        let far_edge = |v: f32, start: i32| {
            CellCoord::clamp_axis(v.ceil())
                .saturating_sub(1)
                .max(-CellCoord::LIMIT)
                .max(start)
        };
        let bottom_right = CellCoord::new(far_edge(edge.x, top_left.x), far_edge(edge.y, top_left.y));
        (top_left, bottom_right)
    }

    /// Bring the loaded set in line with a new viewport box.
    ///
    /// Newly covered chunks are generated first, then chunks that fell out of
    /// the box are unloaded. Returns the chunks loaded and unloaded by this
    /// call, each sorted.
    pub fn on_viewport_changed(&mut self, bounds: ViewBounds) -> (Vec<CellCoord>, Vec<CellCoord>) {
        let _span = tracing::info_span!("viewport_changed").entered();
        let start = Instant::now();

        let (top_left, bottom_right) = self.chunks_covering(bounds);
        let desired: HashSet<CellCoord> = CellCoord::rect(top_left, bottom_right).collect();

        let mut generated = 0;
        let mut to_load: Vec<CellCoord> = desired
            .iter()
            .filter(|c| !self.loaded.contains(*c))
            .copied()
            .collect();
        to_load.sort();
        for &chunk in &to_load {
            generated += self.populate_chunk(chunk);
        }

        let mut to_unload: Vec<CellCoord> = self
            .loaded
            .iter()
            .filter(|c| !desired.contains(*c))
            .copied()
            .collect();
        to_unload.sort();
        let mut destroyed = 0;
        for &chunk in &to_unload {
            destroyed += self.unload_chunk(chunk);
        }

        self.stats = StreamStats {
            chunks_loaded: to_load.len(),
            chunks_unloaded: to_unload.len(),
            entities_generated: generated,
            entities_destroyed: destroyed,
            total_loaded_chunks: self.loaded.len(),
            update_time: start.elapsed(),
        };

        tracing::trace!(
            loaded = to_load.len(),
            unloaded = to_unload.len(),
            total = self.loaded.len(),
            "viewport update complete"
        );

        (to_load, to_unload)
    }

    /// Pull the current bounds from `viewport` and stream against them.
    pub fn sync_viewport(&mut self, viewport: &impl Viewport) -> (Vec<CellCoord>, Vec<CellCoord>) {
        self.on_viewport_changed(viewport.visible_bounds())
    }

    /// Load one chunk. Returns `false` if it was already loaded or lies
    /// outside the chunk range.
    pub fn load_chunk(&mut self, chunk: CellCoord) -> bool {
        let in_range = |v: i32| (-CellCoord::LIMIT..=CellCoord::LIMIT).contains(&v);
        if !(in_range(chunk.x) && in_range(chunk.y)) || self.loaded.contains(&chunk) {
            return false;
        }
        self.populate_chunk(chunk);
        true
    }

    /// Mark `chunk` loaded and fill it until the generated reward meets its
    /// density. The last entity may overshoot the budget.
    fn populate_chunk(&mut self, chunk: CellCoord) -> usize {
        self.loaded.insert(chunk);

        let density = chunk_density(&self.config, chunk);

        let mut total = 0.0;
        let mut count = 0;
        while total < density {
            let position = self.random_point_in(chunk);
            let entity = self.spawn(position, None);
            total += entity.reward();
            count += 1;
        }

        tracing::debug!(%chunk, density, count, total, "loaded chunk");
        count
    }

    /// Uniform point inside `chunk`.
    fn random_point_in(&mut self, chunk: CellCoord) -> Vector2 {
        let grid = self.config.grid_size;
        let origin = chunk.origin(grid);
        for _ in 0..8 {
            let point = origin
                + Vector2::new(
                    self.rng.random_range(0.0..grid),
                    self.rng.random_range(0.0..grid),
                );
            // rounding at large coordinates can land a sample in the next cell
            if point.to_cell(grid) == chunk {
                return point;
            }
        }
        origin + grid / 2.0
    }

    /// Unload one chunk: its indexed entities are destroyed and leave the
    /// display. In-effect entities passing through it are untouched. Returns
    /// the number of entities destroyed.
    pub fn unload_chunk(&mut self, chunk: CellCoord) -> usize {
        self.loaded.remove(&chunk);

        let bucket = self.index.take_cell(chunk);
        let destroyed = bucket.len();
        for entity in bucket {
            debug_assert_eq!(entity.lifecycle(), Lifecycle::Indexed);
            self.display.remove(entity.id());
        }

        let grid = self.config.grid_size;
        let spared = self
            .in_effect
            .iter()
            .filter(|e| e.position().to_cell(grid) == chunk)
            .count();

        tracing::debug!(%chunk, destroyed, spared, "unloaded chunk");
        destroyed
    }

    /// Create an indexed entity and show it. `reward` defaults to a roll
    /// scaled by depth.
    fn spawn(&mut self, position: Vector2, reward: Option<f32>) -> Entity {
        let reward =
            reward.unwrap_or_else(|| roll_reward(&self.config, position.y, &mut self.rng));
        let entity = Entity::new(position, reward);
        self.index.add(entity);
        self.display.add(&entity);
        entity
    }

    /// Indexed entities within `radius` of `center`, by exact distance.
    pub fn radius_query(&self, center: Vector2, radius: f32) -> Vec<Entity> {
        self.index
            .radius_query(center, radius)
            .into_iter()
            .copied()
            .collect()
    }

    /// Move an indexed entity to the in-effect list. It stays on the display.
    /// Returns `false` if the entity was not indexed.
    pub fn consume(&mut self, entity: &Entity) -> bool {
        let Some(mut entity) = self.index.remove(entity) else {
            return false;
        };
        entity.lifecycle = Lifecycle::InEffect;
        self.in_effect.push(entity);
        true
    }

    /// Query around `center` and consume every hit. The returned entities
    /// are the ones whose reward the caller should award.
    pub fn collect(&mut self, center: Vector2, radius: f32) -> Vec<Entity> {
        let mut hits = self.radius_query(center, radius);
        hits.retain(|hit| self.consume(hit));
        hits
    }

    /// Spawn an entity that goes straight into effect, never collectable by
    /// proximity.
    pub fn add_effect(&mut self, x: f32, y: f32, reward: f32) -> EntityId {
        let entity = self.spawn(Vector2::new(x, y), Some(reward));
        self.consume(&entity);
        entity.id()
    }

    /// Advance every in-effect entity toward `collector`. Entities that end
    /// the step at or within the collect threshold are destroyed. Returns
    /// how many were destroyed.
    pub fn tick(&mut self, collector: Vector2) -> usize {
        let start = Instant::now();
        let config = &self.config;
        let display = &mut self.display;
        let before = self.in_effect.len();

        self.in_effect.retain_mut(|entity| {
            let dist = entity.position.distance(collector);
            let slowdown = (dist / config.effect_slowdown_divisor).max(config.effect_min_slowdown);
            entity
                .position
                .reach(collector, config.effect_speed, Some(slowdown));

            if entity.position.distance(collector) <= config.collect_threshold {
                display.remove(entity.id());
                false
            } else {
                display.reposition(entity.id(), entity.position);
                true
            }
        });

        let destroyed = before - self.in_effect.len();
        self.tick_timer.record(start.elapsed());
        tracing::trace!(
            moved = self.in_effect.len(),
            destroyed,
            "effect tick"
        );
        destroyed
    }

    pub fn is_loaded(&self, chunk: CellCoord) -> bool {
        self.loaded.contains(&chunk)
    }

    pub fn loaded_chunks(&self) -> &HashSet<CellCoord> {
        &self.loaded
    }

    pub fn index(&self) -> &SpatialIndex<Entity> {
        &self.index
    }

    pub fn indexed_count(&self) -> usize {
        self.index.len()
    }

    pub fn in_effect(&self) -> &[Entity] {
        &self.in_effect
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Statistics from the last viewport update.
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub fn tick_timer(&self) -> &TickTimer {
        &self.tick_timer
    }
}

impl<D, R> std::fmt::Debug for WorldStreamer<D, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldStreamer")
            .field("loaded", &self.loaded.len())
            .field("indexed", &self.index.len())
            .field("in_effect", &self.in_effect.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayList;
    use crate::error::StreamError;

    fn streamer(config: StreamerConfig) -> WorldStreamer<DisplayList> {
        WorldStreamer::new(config.with_seed(7), DisplayList::new()).unwrap()
    }

    fn cells(coords: &[(i32, i32)]) -> Vec<CellCoord> {
        let mut cells: Vec<_> = coords.iter().map(|&(x, y)| CellCoord::new(x, y)).collect();
        cells.sort();
        cells
    }

    fn loaded_sorted(s: &WorldStreamer<DisplayList>) -> Vec<CellCoord> {
        let mut v: Vec<_> = s.loaded_chunks().iter().copied().collect();
        v.sort();
        v
    }

    #[test]
    fn far_viewport_pins_to_boundary_chunk() {
        let mut s = streamer(StreamerConfig::default());
        let (loaded, _) = s.on_viewport_changed(ViewBounds::new(-1.0e12, 0.0, 100.0, 100.0));
        assert_eq!(loaded, cells(&[(-CellCoord::LIMIT, 0)]));
        assert_eq!(loaded_sorted(&s), loaded);

        let (tl, br) = s.chunks_covering(ViewBounds::new(1.0e12, -1.0e12, 10.0, 10.0));
        assert_eq!(tl, CellCoord::new(CellCoord::LIMIT, -CellCoord::LIMIT));
        assert_eq!(br, tl);
    }

    #[test]
    fn far_deep_chunk_generates_inside_itself() {
        let mut s = streamer(StreamerConfig::default());
        let (loaded, _) = s.on_viewport_changed(ViewBounds::new(1.0e10, 1.0e4, 100.0, 100.0));
        let chunk = CellCoord::new(CellCoord::LIMIT, 100);
        assert_eq!(loaded, vec![chunk]);

        let bucket = s.index().cell(chunk);
        let generated = bucket.len();
        assert!(generated > 0);
        assert_eq!(generated, s.indexed_count());
        for entity in bucket {
            assert_eq!(entity.position().to_cell(s.config().grid_size), chunk);
        }

        assert_eq!(s.unload_chunk(chunk), generated);
        assert_eq!(s.indexed_count(), 0);
        assert!(s.display().is_empty());
    }

    #[test]
    fn load_chunk_refuses_out_of_range_chunks() {
        let mut s = streamer(StreamerConfig::default());
        assert!(!s.load_chunk(CellCoord::new(CellCoord::LIMIT + 1, 100)));
        assert!(s.loaded_chunks().is_empty());
        assert_eq!(s.indexed_count(), 0);
    }

    #[test]
    fn rejects_invalid_config() {
        let result = WorldStreamer::new(
            StreamerConfig::default().with_grid_size(-1.0),
            DisplayList::new(),
        );
        assert!(matches!(result, Err(StreamError::InvalidGridSize(_))));
    }

    #[test]
    fn chunks_covering_treats_far_edges_as_open() {
        let s = streamer(StreamerConfig::default());
        assert_eq!(
            s.chunks_covering(ViewBounds::new(0.0, 0.0, 200.0, 200.0)),
            (CellCoord::new(0, 0), CellCoord::new(1, 1))
        );
        assert_eq!(
            s.chunks_covering(ViewBounds::new(-50.0, 250.0, 100.0, 100.0)),
            (CellCoord::new(-1, 2), CellCoord::new(0, 3))
        );
        assert_eq!(
            s.chunks_covering(ViewBounds::new(150.0, 150.0, 0.0, 0.0)),
            (CellCoord::new(1, 1), CellCoord::new(1, 1))
        );
    }

    #[test]
    fn viewport_loads_covered_chunks() {
        let mut s = streamer(StreamerConfig::default());
        let (loaded, unloaded) = s.on_viewport_changed(ViewBounds::new(0.0, 0.0, 200.0, 200.0));

        assert_eq!(loaded, cells(&[(0, 0), (1, 0), (0, 1), (1, 1)]));
        assert!(unloaded.is_empty());
        assert_eq!(s.stats().total_loaded_chunks, 4);
    }

    #[test]
    fn viewport_move_swaps_chunks() {
        let mut s = streamer(StreamerConfig::default());
        s.on_viewport_changed(ViewBounds::new(0.0, 0.0, 200.0, 200.0));
        let (loaded, unloaded) = s.on_viewport_changed(ViewBounds::new(100.0, 0.0, 200.0, 200.0));

        assert_eq!(loaded, cells(&[(2, 0), (2, 1)]));
        assert_eq!(unloaded, cells(&[(0, 0), (0, 1)]));
        assert_eq!(loaded_sorted(&s), cells(&[(1, 0), (2, 0), (1, 1), (2, 1)]));
    }

    #[test]
    fn surface_chunks_generate_nothing() {
        let mut s = streamer(StreamerConfig::default());
        s.on_viewport_changed(ViewBounds::new(0.0, 0.0, 300.0, 300.0));
        assert_eq!(s.indexed_count(), 0);
        assert!(s.display().is_empty());
    }

    #[test]
    fn deep_chunk_meets_density_budget() {
        let mut s = streamer(StreamerConfig::default());
        let chunk = CellCoord::new(0, 1_000);
        assert!(s.load_chunk(chunk));

        let budget = chunk_density(s.config(), chunk);
        let bucket = s.index().cell(chunk);
        let total: f32 = bucket.iter().map(Entity::reward).sum();
        assert!(total >= budget);
        // at-least semantics: dropping the last entity falls below budget
        let last = bucket.last().unwrap().reward();
        assert!(total - last < budget);

        for entity in bucket {
            assert_eq!(entity.position().to_cell(100.0), chunk);
            assert!(s.display().contains(entity.id()));
        }
    }

    #[test]
    fn load_chunk_is_idempotent() {
        let mut s = streamer(StreamerConfig::default());
        let chunk = CellCoord::new(3, 500);
        assert!(s.load_chunk(chunk));
        let count = s.indexed_count();
        assert!(count > 0);

        assert!(!s.load_chunk(chunk));
        assert_eq!(s.indexed_count(), count);
    }

    #[test]
    fn unload_destroys_indexed_entities() {
        let mut s = streamer(StreamerConfig::default());
        let chunk = CellCoord::new(0, 800);
        s.load_chunk(chunk);
        let n = s.indexed_count();

        assert_eq!(s.unload_chunk(chunk), n);
        assert!(!s.is_loaded(chunk));
        assert_eq!(s.indexed_count(), 0);
        assert!(s.display().is_empty());
    }

    #[test]
    fn reload_produces_fresh_population() {
        let mut s = streamer(StreamerConfig::default());
        let chunk = CellCoord::new(0, 800);
        s.load_chunk(chunk);
        let first: Vec<EntityId> = s.index().cell(chunk).iter().map(Entity::id).collect();

        s.unload_chunk(chunk);
        s.load_chunk(chunk);
        let second: Vec<EntityId> = s.index().cell(chunk).iter().map(Entity::id).collect();

        assert!(!second.is_empty());
        assert!(first.iter().all(|id| !second.contains(id)));
    }

    #[test]
    fn consume_moves_entity_into_effect() {
        let mut s = streamer(StreamerConfig::default());
        let chunk = CellCoord::new(0, 600);
        s.load_chunk(chunk);
        let target = s.index().cell(chunk)[0];

        assert!(s.consume(&target));
        assert!(!s.consume(&target));

        let hits = s.radius_query(target.position(), 0.0);
        assert!(!hits.contains(&target));
        assert!(s.display().contains(target.id()));
        assert_eq!(s.in_effect().len(), 1);
        assert!(s.in_effect()[0].is_in_effect());
    }

    #[test]
    fn in_effect_entity_survives_unload() {
        let mut s = streamer(StreamerConfig::default());
        let chunk = CellCoord::new(0, 600);
        s.load_chunk(chunk);
        let target = s.index().cell(chunk)[0];
        s.consume(&target);

        s.unload_chunk(chunk);
        assert!(s.display().contains(target.id()));
        assert_eq!(s.display().len(), 1);
        assert_eq!(s.in_effect().len(), 1);
    }

    #[test]
    fn collect_consumes_every_hit() {
        let mut s = streamer(StreamerConfig::default());
        let chunk = CellCoord::new(0, 700);
        s.load_chunk(chunk);
        let indexed = s.indexed_count();

        // a radius covering the whole chunk from its centre
        let hits = s.collect(Vector2::new(50.0, 70_050.0), 80.0);
        assert_eq!(hits.len(), indexed);
        assert_eq!(s.indexed_count(), 0);
        assert_eq!(s.in_effect().len(), indexed);
    }

    #[test]
    fn tick_destroys_entity_already_at_collector() {
        let mut s = streamer(StreamerConfig::default());
        let id = s.add_effect(50.0, 50.0, 3.0);
        assert!(s.display().contains(id));
        assert_eq!(s.indexed_count(), 0);

        assert_eq!(s.tick(Vector2::new(50.0, 50.0)), 1);
        assert!(s.in_effect().is_empty());
        assert!(!s.display().contains(id));
    }

    #[test]
    fn tick_moves_effect_toward_collector() {
        let mut s = streamer(StreamerConfig::default());
        let id = s.add_effect(0.0, 0.0, 1.0);
        let collector = Vector2::new(100.0, 0.0);

        assert_eq!(s.tick(collector), 0);
        let pos = s.display().get(id).unwrap().position;
        assert!((pos.x - 2.0).abs() < 1e-4);

        let mut frames = 1;
        while !s.in_effect().is_empty() {
            s.tick(collector);
            frames += 1;
            assert!(frames < 1_000);
        }
        // 90 units of travel at 2 per frame, give or take float drift
        assert!((45..=46).contains(&frames));
        assert!(!s.display().contains(id));
        assert_eq!(s.tick_timer().count(), frames);
    }

    #[test]
    fn effects_are_never_queryable() {
        let mut s = streamer(StreamerConfig::default());
        s.add_effect(10.0, 10.0, 5.0);
        assert!(s.radius_query(Vector2::new(10.0, 10.0), 50.0).is_empty());
    }
}
