use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::input::{
    handle_jump_start, handle_look_input, handle_move_key_end, handle_move_key_start,
    snapshot_input, AnalogMove, HeldKeys, InputSnapshot, JumpAction, JumpPressed, JumpRequest,
    LookAction, LookInput, MoveBackAction, MoveForwardAction, MovementDisabled,
    StrafeLeftAction, StrafeRightAction, TouchLookSettings,
};
use super::movement::*;
use super::state::*;
use super::teleport::Teleport;
use crate::camera::CameraConfig;
use crate::FreeRoamSystems;

/// Plugin for the first-person player controller
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EnhancedInputPlugin>() {
            app.add_plugins(EnhancedInputPlugin);
        }

        // Register input context for player
        app.add_input_context::<Player>();

        // Input observers
        app.add_observer(handle_move_key_start::<MoveForwardAction>);
        app.add_observer(handle_move_key_end::<MoveForwardAction>);
        app.add_observer(handle_move_key_start::<MoveBackAction>);
        app.add_observer(handle_move_key_end::<MoveBackAction>);
        app.add_observer(handle_move_key_start::<StrafeLeftAction>);
        app.add_observer(handle_move_key_end::<StrafeLeftAction>);
        app.add_observer(handle_move_key_start::<StrafeRightAction>);
        app.add_observer(handle_move_key_end::<StrafeRightAction>);
        app.add_observer(handle_look_input);
        app.add_observer(handle_jump_start);

        app.init_resource::<MovementDisabled>()
            .init_resource::<AnalogMove>()
            .init_resource::<TouchLookSettings>()
            .init_resource::<SpawnPoint>()
            .add_message::<Teleport>()
            .add_message::<JumpRequest>();

        app.add_systems(Startup, spawn_player);

        app.configure_sets(
            Update,
            (
                FreeRoamSystems::Input,
                FreeRoamSystems::Movement,
                FreeRoamSystems::Camera,
            )
                .chain(),
        );

        // One tick per rendered frame
        app.add_systems(Update, snapshot_input.in_set(FreeRoamSystems::Input));
        app.add_systems(
            Update,
            (move_player, sync_grounded_marker)
                .chain()
                .in_set(FreeRoamSystems::Movement),
        );
    }
}

/// Spawns the player camera with all required components
pub fn spawn_player(mut commands: Commands, spawn: Res<SpawnPoint>) {
    let config = PlayerConfig::default();
    let camera_config = CameraConfig::default();
    let state = PlayerState::new(spawn.position).with_look(spawn.yaw, 0.0);

    commands
        .spawn((
            Player,
            config,
            state,
            camera_config,
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: camera_config.fov,
                near: camera_config.near,
                far: camera_config.far,
                ..default()
            }),
            Transform::from_translation(state.position()).with_rotation(state.orientation()),
        ))
        .insert((
            // Input state
            HeldKeys::default(),
            LookInput::default(),
            JumpPressed::default(),
            InputSnapshot::default(),
        ))
        .insert(
            // Input bindings
            actions!(Player[
                (
                    Action::<MoveForwardAction>::new(),
                    bindings![KeyCode::KeyW, KeyCode::ArrowUp],
                ),
                (
                    Action::<MoveBackAction>::new(),
                    bindings![KeyCode::KeyS, KeyCode::ArrowDown],
                ),
                (
                    Action::<StrafeLeftAction>::new(),
                    bindings![KeyCode::KeyA, KeyCode::ArrowLeft],
                ),
                (
                    Action::<StrafeRightAction>::new(),
                    bindings![KeyCode::KeyD, KeyCode::ArrowRight],
                ),
                (
                    Action::<LookAction>::new(),
                    bindings![
                        Binding::mouse_motion(),
                    ],
                ),
                (
                    Action::<JumpAction>::new(),
                    bindings![KeyCode::Space, GamepadButton::South],
                ),
            ]),
        );

    info!("player spawned at {}", spawn.position);
}
