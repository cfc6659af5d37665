use glam::Vec2;

use crate::api::types::{ChunkId, EntityId, TagSet};
use crate::assets::AssetId;
use crate::entities::{Entity, EntityKind};
use crate::geometry::Hitbox;

/// Build a static wall slab: pure tag-bearing geometry for the collider
/// scan. No physics, no behavior.
pub fn wall(id: EntityId, chunk: ChunkId, center: Vec2, half: Vec2, sprite: AssetId) -> Entity {
    Entity::new(id, EntityKind::Wall)
        .bound_to(chunk)
        .with_tags(TagSet::SOLID)
        .with_hitbox(Hitbox::rect(Vec2::ZERO, half))
        .at(center)
        .with_sprite(sprite)
}

/// Build a water volume marker. Not a collider; entities that care (the
/// player's swim check) test for the LIQUID tag themselves.
pub fn water(id: EntityId, chunk: ChunkId, center: Vec2, half: Vec2, sprite: AssetId) -> Entity {
    Entity::new(id, EntityKind::Water)
        .bound_to(chunk)
        .with_tags(TagSet::LIQUID)
        .with_hitbox(Hitbox::rect(Vec2::ZERO, half))
        .at(center)
        .with_sprite(sprite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_is_solid_chunk_bound_geometry() {
        let wall = wall(
            EntityId(9),
            ChunkId(3),
            Vec2::new(160.0, 232.0),
            Vec2::new(160.0, 8.0),
            AssetId(1),
        );
        assert!(wall.tags.contains(TagSet::SOLID));
        assert_eq!(wall.chunk, Some(ChunkId(3)));
        assert!(!wall.physics);
        assert_eq!(
            wall.world_hitbox(),
            Some(Hitbox::rect(Vec2::new(160.0, 232.0), Vec2::new(160.0, 8.0)))
        );
    }

    #[test]
    fn water_is_liquid_not_solid() {
        let water = water(
            EntityId(10),
            ChunkId(0),
            Vec2::new(100.0, 200.0),
            Vec2::new(64.0, 16.0),
            AssetId(2),
        );
        assert!(water.tags.contains(TagSet::LIQUID));
        assert!(!water.tags.contains(TagSet::SOLID));
    }
}
