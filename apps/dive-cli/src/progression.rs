/// Upgrades offered on level up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upgrade {
    /// Faster scrolling.
    Speed,
    /// Larger collection radius.
    Reach,
    /// Periodic reward payouts that fly to the collector.
    Generator,
}

impl Upgrade {
    pub const ALL: [Upgrade; 3] = [Upgrade::Speed, Upgrade::Reach, Upgrade::Generator];
}

/// Experience and upgrade state for one run.
///
/// Lives outside the streaming core; the driver feeds it the rewards the
/// streamer hands back.
#[derive(Debug, Clone)]
pub struct Progression {
    pub xp: f32,
    pub max_xp: f32,
    pub level: u32,
    pub reach: f32,
    pub speed: f32,
    pub gen_xp: f32,
    pub upgrades: Vec<Upgrade>,
    pub total_xp: f32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            xp: 0.0,
            max_xp: 50.0,
            level: 0,
            reach: 40.0,
            speed: 1.0,
            gen_xp: 0.0,
            upgrades: Vec::new(),
            total_xp: 0.0,
        }
    }
}

impl Progression {
    /// Add a reward. Returns how many levels were gained; each one doubles
    /// the next threshold.
    pub fn award(&mut self, reward: f32) -> u32 {
        self.xp += reward;
        self.total_xp += reward;

        let mut levels = 0;
        while self.xp >= self.max_xp {
            self.xp -= self.max_xp;
            self.max_xp *= 2.0;
            self.level += 1;
            levels += 1;
        }
        levels
    }

    pub fn apply(&mut self, upgrade: Upgrade) {
        match upgrade {
            Upgrade::Speed => self.speed += 1.0,
            Upgrade::Reach => self.reach += 10.0,
            Upgrade::Generator => self.gen_xp += 1.0,
        }
        self.upgrades.push(upgrade);
    }

    /// Scroll distance per input step at the current speed.
    pub fn scroll_step(&self, base: f32) -> f32 {
        base * (1.0 + self.speed / 10.0) * 0.5
    }
}
