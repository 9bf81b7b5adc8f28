use bevy::prelude::*;

use super::controller::PlayerController;
use super::input::InputSnapshot;
use super::state::*;
use super::teleport::Teleport;
use crate::collision::SpatialProbe;

/// Applies pending teleports, then runs one controller tick against the
/// physics world
pub fn move_player(
    probe: SpatialProbe,
    mut teleports: MessageReader<Teleport>,
    mut query: Query<(&PlayerConfig, &InputSnapshot, &mut PlayerState), With<Player>>,
    time: Res<Time>,
) {
    let Ok((config, input, mut state)) = query.single_mut() else {
        return;
    };

    // Only the latest request matters if several arrive in one frame
    if let Some(teleport) = teleports.read().last() {
        state.teleport(teleport.position);
        debug!("teleported player to {}", teleport.position);
    }

    PlayerController::new(config, &probe).tick(&mut state, input, time.delta_secs());
}

/// Mirrors the grounded flag into the `Grounded` marker for UI consumers
pub fn sync_grounded_marker(
    mut commands: Commands,
    query: Query<(Entity, &PlayerState, Has<Grounded>), With<Player>>,
) {
    for (entity, state, was_grounded) in &query {
        if state.grounded() && !was_grounded {
            commands.entity(entity).insert(Grounded);
        } else if !state.grounded() && was_grounded {
            commands.entity(entity).remove::<Grounded>();
        }
    }
}
