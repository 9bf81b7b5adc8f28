use avian3d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::tag::ResolvedCollision;

/// Result of a directional probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Distance from the probe origin to the hit
    pub distance: f32,
    /// Unit surface normal in world space
    pub normal: Vec3,
}

impl Contact {
    pub fn new(distance: f32, normal: Vec3) -> Self {
        Self {
            distance,
            normal: normal.normalize_or_zero(),
        }
    }
}

/// Bounded ray queries against static world geometry.
///
/// Implementations return the nearest hit on a solid surface within
/// `max_distance` (inclusive), or `None` when nothing solid is in range. An
/// empty world is never an error, it simply has no contact.
pub trait CollisionQuery {
    fn probe(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Contact>;
}

impl<T: CollisionQuery + ?Sized> CollisionQuery for &T {
    fn probe(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Contact> {
        (**self).probe(origin, direction, max_distance)
    }
}

/// Probes avian3d colliders, skipping those resolved as non-solid.
///
/// Colliders that haven't been resolved yet count as solid.
#[derive(SystemParam)]
pub struct SpatialProbe<'w, 's> {
    spatial_query: SpatialQuery<'w, 's>,
    resolved: Query<'w, 's, &'static ResolvedCollision>,
}

impl SpatialProbe<'_, '_> {
    fn is_solid(&self, entity: Entity) -> bool {
        self.resolved.get(entity).map_or(true, |r| r.0)
    }
}

impl CollisionQuery for SpatialProbe<'_, '_> {
    fn probe(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<Contact> {
        let filter = SpatialQueryFilter::default();

        self.spatial_query
            .cast_ray_predicate(
                origin,
                direction,
                max_distance,
                true,
                &filter,
                &|entity| self.is_solid(entity),
            )
            .map(|hit| Contact::new(hit.distance, hit.normal))
    }
}
