use bevy::prelude::*;

/// Request to move the player's eye to `position` at the next tick boundary.
///
/// Vertical velocity and the grounded flag are kept; the tick that follows
/// re-probes the ground at the new spot.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct Teleport {
    pub position: Vec3,
}

impl Teleport {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Teleport so the player stands on `feet`
    pub fn to_feet(feet: Vec3, eye_height: f32) -> Self {
        Self::new(feet + Vec3::Y * eye_height)
    }
}
