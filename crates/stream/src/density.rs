use dive_common::CellCoord;
use rand::Rng;

use crate::config::StreamerConfig;

/// Reward budget for a freshly loaded chunk. Zero at and above the surface,
/// growing with the chunk row below it.
pub fn chunk_density(config: &StreamerConfig, chunk: CellCoord) -> f32 {
    (chunk.y as f32 * config.density_per_row).max(0.0).round()
}

/// Random reward for an entity placed at depth `world_y`: uniform in
/// `[0, world_y * reward_depth_scale)`, floored at `min_reward`.
pub fn roll_reward<R: Rng>(config: &StreamerConfig, world_y: f32, rng: &mut R) -> f32 {
    let roll: f32 = rng.random();
    (roll * world_y * config.reward_depth_scale).max(config.min_reward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn surface_chunks_are_empty() {
        let config = StreamerConfig::default();
        assert_eq!(chunk_density(&config, CellCoord::new(0, 0)), 0.0);
        assert_eq!(chunk_density(&config, CellCoord::new(4, -30)), 0.0);
        // 0.02 * 20 = 0.4 rounds down
        assert_eq!(chunk_density(&config, CellCoord::new(0, 20)), 0.0);
    }

    #[test]
    fn density_grows_with_depth() {
        let config = StreamerConfig::default();
        assert_eq!(chunk_density(&config, CellCoord::new(0, 100)), 2.0);
        let mut last = 0.0;
        for row in (0..5_000).step_by(37) {
            let d = chunk_density(&config, CellCoord::new(0, row));
            assert!(d >= last);
            last = d;
        }
    }

    #[test]
    fn density_ignores_column() {
        let config = StreamerConfig::default();
        assert_eq!(
            chunk_density(&config, CellCoord::new(-7, 400)),
            chunk_density(&config, CellCoord::new(12, 400))
        );
    }

    #[test]
    fn shallow_rewards_sit_on_the_floor() {
        let config = StreamerConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(roll_reward(&config, 500.0, &mut rng), 1.0);
        }
    }

    #[test]
    fn deep_rewards_stay_in_range() {
        let config = StreamerConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let depth = 1_000_000.0;
        let max = depth * config.reward_depth_scale;
        for _ in 0..1_000 {
            let r = roll_reward(&config, depth, &mut rng);
            assert!((config.min_reward..max).contains(&r));
        }
    }
}
