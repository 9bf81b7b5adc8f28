pub mod camera;
pub mod collision;
pub mod player;

pub use camera::CameraPlugin;
pub use collision::CollisionPlugin;
pub use player::PlayerPlugin;

use bevy::prelude::*;

/// Per-frame ordering of the controller: input snapshot, movement, camera
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreeRoamSystems {
    Input,
    Movement,
    Camera,
}

/// Unified plugin that adds collision, player controller, and camera systems.
pub struct FreeRoamPlugin;

impl Plugin for FreeRoamPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<CollisionPlugin>() {
            app.add_plugins(CollisionPlugin);
        }
        if !app.is_plugin_added::<PlayerPlugin>() {
            app.add_plugins(PlayerPlugin);
        }
        if !app.is_plugin_added::<CameraPlugin>() {
            app.add_plugins(CameraPlugin);
        }
    }
}

pub mod prelude {
    pub use crate::camera::{CameraConfig, CameraPlugin, LookCapture};
    pub use crate::collision::{
        CollisionPlugin, CollisionQuery, CollisionTag, CollisionWorld, Contact, NodeId,
        ResolvedCollision, SpatialProbe, TriangleMesh,
    };
    pub use crate::player::{
        spawn_player, AnalogMove, Grounded, InputSnapshot, JumpRequest, MovementDisabled,
        MovementState, Player, PlayerConfig, PlayerController, PlayerPlugin, PlayerState,
        SpawnPoint, Teleport, TouchLookSettings,
    };
    pub use crate::{FreeRoamPlugin, FreeRoamSystems};
}
