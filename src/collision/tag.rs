use avian3d::prelude::*;
use bevy::prelude::*;

/// Explicit collision flag carried by a piece of world geometry.
///
/// Entities without a tag inherit from the nearest tagged ancestor. A collider
/// with no tagged ancestor at all is solid, so tagging the root of an imported
/// model is enough to make every sub-mesh block movement (or not).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionTag {
    /// Stops the player
    Solid,
    /// Visible but never stops movement (signs, pickup zones)
    NonSolid,
}

impl CollisionTag {
    pub fn is_solid(self) -> bool {
        matches!(self, CollisionTag::Solid)
    }
}

/// Tag resolved once for a collider entity when it enters the world
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Deref)]
pub struct ResolvedCollision(pub bool);

/// Resolves a chain of optional tags, nearest first.
///
/// The first explicit tag decides; an untagged chain is solid.
pub fn resolve_tag_chain(chain: impl IntoIterator<Item = Option<CollisionTag>>) -> bool {
    chain
        .into_iter()
        .flatten()
        .next()
        .is_none_or(CollisionTag::is_solid)
}

/// Inserts `ResolvedCollision` on every collider that doesn't have one yet by
/// walking its `ChildOf` ancestry.
pub fn resolve_collision_tags(
    mut commands: Commands,
    unresolved: Query<Entity, (With<Collider>, Without<ResolvedCollision>)>,
    tags: Query<&CollisionTag>,
    parents: Query<&ChildOf>,
) {
    let mut resolved = 0usize;
    let mut non_solid = 0usize;

    for entity in &unresolved {
        let chain = std::iter::once(entity)
            .chain(parents.iter_ancestors(entity))
            .map(|e| tags.get(e).ok().copied());
        let solid = resolve_tag_chain(chain);

        commands.entity(entity).insert(ResolvedCollision(solid));
        resolved += 1;
        if !solid {
            non_solid += 1;
        }
    }

    if resolved > 0 {
        debug!("resolved collision tags for {resolved} colliders ({non_solid} non-solid)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_chain_is_solid() {
        assert!(resolve_tag_chain([None, None, None]));
        assert!(resolve_tag_chain(std::iter::empty()));
    }

    #[test]
    fn nearest_tag_wins() {
        assert!(!resolve_tag_chain([None, Some(CollisionTag::NonSolid), Some(CollisionTag::Solid)]));
        assert!(resolve_tag_chain([Some(CollisionTag::Solid), Some(CollisionTag::NonSolid)]));
    }

    #[test]
    fn root_tag_covers_descendants() {
        assert!(!resolve_tag_chain([None, None, Some(CollisionTag::NonSolid)]));
    }
}
