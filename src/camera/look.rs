use bevy::prelude::*;

use crate::player::{Player, PlayerState};

/// Camera configuration
#[derive(Component, Debug, Clone, Copy)]
pub struct CameraConfig {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Commits the player state to the camera transform
pub fn sync_camera_transform(
    mut query: Query<(&PlayerState, &mut Transform), (With<Player>, Changed<PlayerState>)>,
) {
    for (state, mut transform) in &mut query {
        transform.translation = state.position();
        transform.rotation = state.orientation();
    }
}
