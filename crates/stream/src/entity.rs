use dive_common::{EntityId, Vector2};

/// Where an entity is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Sitting in the spatial index, collectable by proximity.
    Indexed,
    /// Collected; animating toward the collector, no longer queryable.
    InEffect,
}

/// A reward item placed in the world.
///
/// The reward is fixed at creation. Equality is identity: two entities are
/// equal iff they share an id.
#[derive(Debug, Clone, Copy)]
pub struct Entity {
    id: EntityId,
    pub(crate) position: Vector2,
    reward: f32,
    pub(crate) lifecycle: Lifecycle,
}

impl Entity {
    pub(crate) fn new(position: Vector2, reward: f32) -> Self {
        Self {
            id: EntityId::new(),
            position,
            reward,
            lifecycle: Lifecycle::Indexed,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn reward(&self) -> f32 {
        self.reward
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_in_effect(&self) -> bool {
        self.lifecycle == Lifecycle::InEffect
    }

    /// Sprite scale the display should use; grows with reward and saturates at 1.2.
    pub fn scale(&self) -> f32 {
        0.2 + (self.reward * 0.1).min(1.0)
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}
