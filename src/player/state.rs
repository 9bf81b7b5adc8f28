use bevy::prelude::*;

/// Marker component for the player entity (also used as input context).
///
/// The player entity is the camera itself; there is no separate body.
#[derive(Component, Default)]
pub struct Player;

/// Player movement configuration
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerConfig {
    /// Horizontal speed in m/s
    pub move_speed: f32,
    /// Radians of look rotation per unit of look delta
    pub look_sensitivity: f32,
    /// Vertical acceleration in m/s², negative is down
    pub gravity: f32,
    /// Upward velocity applied on jump
    pub jump_impulse: f32,
    /// Height of the eye above the ground it stands on
    pub eye_height: f32,
    /// Horizontal clearance kept between the eye and walls
    pub radius: f32,
    /// Extra reach of the ground probe beyond eye height
    pub ground_margin: f32,
    /// Reach of the ceiling probe above the eye
    pub ceiling_clearance: f32,
    /// Upper bound on the elapsed time of a single tick in seconds
    pub max_elapsed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            look_sensitivity: 0.002,
            gravity: -9.8,
            jump_impulse: 5.0,
            eye_height: 1.7,
            radius: 0.5,
            ground_margin: 0.1,
            ceiling_clearance: 0.2,
            max_elapsed: 0.1,
        }
    }
}

/// Whether the player currently stands on something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementState {
    Grounded,
    Airborne,
}

/// Position, look and vertical motion of the player.
///
/// Only the movement controller mutates this; other systems submit intents
/// such as [`Teleport`](super::Teleport).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub(crate) position: Vec3,
    pub(crate) yaw: f32,
    pub(crate) pitch: f32,
    pub(crate) vertical_velocity: f32,
    pub(crate) grounded: bool,
}

impl PlayerState {
    /// Airborne and at rest at `position`, looking down -Z
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            vertical_velocity: 0.0,
            grounded: false,
        }
    }

    pub fn with_look(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2);
        self
    }

    /// Eye position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn state(&self) -> MovementState {
        if self.grounded {
            MovementState::Grounded
        } else {
            MovementState::Airborne
        }
    }

    /// Camera rotation; roll is always zero
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Overwrites the eye position, keeping velocity and grounded as they are
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
    }
}

/// Marker: player is on the ground
#[derive(Component)]
#[component(storage = "SparseSet")]
pub struct Grounded;

/// Where the player appears on startup
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub yaw: f32,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.7, 5.0),
            yaw: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_has_no_roll() {
        let state = PlayerState::new(Vec3::ZERO).with_look(1.2, -0.4);
        let (yaw, pitch, roll) = state.orientation().to_euler(EulerRot::YXZ);
        assert!((yaw - 1.2).abs() < 1e-5);
        assert!((pitch + 0.4).abs() < 1e-5);
        assert!(roll.abs() < 1e-5);
    }

    #[test]
    fn default_look_is_negative_z() {
        let state = PlayerState::new(Vec3::ZERO);
        assert!((state.orientation() * Vec3::NEG_Z).abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert_eq!(state.state(), MovementState::Airborne);
    }

    #[test]
    fn teleport_keeps_motion() {
        let mut state = PlayerState::new(Vec3::ZERO);
        state.vertical_velocity = -3.0;
        state.grounded = true;
        state.teleport(Vec3::new(4.0, 2.0, 1.0));

        assert_eq!(state.position(), Vec3::new(4.0, 2.0, 1.0));
        assert_eq!(state.vertical_velocity(), -3.0);
        assert!(state.grounded());
    }
}
