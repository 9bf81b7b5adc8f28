use avian3d::prelude::*;
use bevy::prelude::*;

use super::tag::resolve_collision_tags;

/// Plugin that sets up Avian3D spatial queries and collision tag resolution
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            PhysicsPlugins::default()
                .with_length_unit(1.0), // 1 unit = 1 meter
        );

        // Tags are resolved before anything probes the world this frame
        app.add_systems(PreUpdate, resolve_collision_tags);
    }
}
