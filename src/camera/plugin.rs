use bevy::prelude::*;

use super::{cursor::*, look::*};
use crate::FreeRoamSystems;

/// Plugin for FPS camera systems
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LookCapture>();

        app.add_systems(
            Update,
            (
                update_cursor_capture.before(FreeRoamSystems::Input),
                sync_camera_transform.in_set(FreeRoamSystems::Camera),
            ),
        );
    }
}
