use std::collections::BTreeMap;

use dive_common::{EntityId, Vector2};

use crate::entity::Entity;

/// The display layer the streamer keeps in lockstep with entity lifetimes.
///
/// The streamer only ever writes: it never reads display state back.
pub trait DisplayContainer {
    /// An entity became visible.
    fn add(&mut self, entity: &Entity);

    /// An entity was destroyed. Unknown ids are ignored.
    fn remove(&mut self, id: EntityId);

    /// An in-effect entity moved.
    fn reposition(&mut self, _id: EntityId, _position: Vector2) {}
}

/// What the display knows about one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub position: Vector2,
    pub scale: f32,
}

/// In-memory display container, ordered by id.
///
/// Used headless: by the CLI for its frame dumps and by tests to check what
/// is still on screen.
#[derive(Debug, Default)]
pub struct DisplayList {
    sprites: BTreeMap<EntityId, Sprite>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.sprites.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    /// Human-readable dump of every sprite.
    pub fn render_text(&self) -> String {
        let mut out = format!("=== Display ({} sprites) ===\n", self.sprites.len());
        for (id, sprite) in &self.sprites {
            out.push_str(&format!(
                "  [{id}] pos=({:.1}, {:.1}) scale={:.2}\n",
                sprite.position.x, sprite.position.y, sprite.scale
            ));
        }
        out
    }
}

impl DisplayContainer for DisplayList {
    fn add(&mut self, entity: &Entity) {
        self.sprites.insert(
            entity.id(),
            Sprite {
                position: entity.position(),
                scale: entity.scale(),
            },
        );
    }

    fn remove(&mut self, id: EntityId) {
        self.sprites.remove(&id);
    }

    fn reposition(&mut self, id: EntityId, position: Vector2) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.position = position;
        }
    }
}
