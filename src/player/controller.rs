//! Per-tick movement and collision resolution.
//!
//! Everything here is plain math over a [`CollisionQuery`], so the same code
//! runs inside the Bevy systems and in headless tests.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use super::input::InputSnapshot;
use super::state::{PlayerConfig, PlayerState};
use crate::collision::{CollisionQuery, Contact};

/// Horizontal axis probes used around a candidate position
const LATERAL_AXES: [Dir3; 4] = [Dir3::X, Dir3::NEG_X, Dir3::Z, Dir3::NEG_Z];

/// Camera-local movement intent: x is strafe (+right), y is forward.
///
/// Keys contribute unit steps, the joystick adds its analog vector, and the sum
/// is normalized only when it exceeds unit length so partial stick deflection
/// still walks slowly.
pub fn wish_direction(input: &InputSnapshot) -> Vec2 {
    let keys = &input.keys;
    let mut wish = Vec2::ZERO;

    if keys.forward {
        wish.y += 1.0;
    }
    if keys.back {
        wish.y -= 1.0;
    }
    if keys.left {
        wish.x -= 1.0;
    }
    if keys.right {
        wish.x += 1.0;
    }

    wish += input.analog.clamp(Vec2::NEG_ONE, Vec2::ONE);

    if wish.length_squared() > 1.0 {
        wish.normalize_or_zero()
    } else {
        wish
    }
}

/// Forward and right vectors for a yaw, flattened to the horizontal plane
pub fn flat_basis(yaw: f32) -> (Vec3, Vec3) {
    let forward = Vec3::new(-yaw.sin(), 0.0, -yaw.cos());
    let right = forward.cross(Vec3::Y).normalize_or_zero();
    (forward, right)
}

/// Removes the component of `displacement` that points into the surface
pub fn slide(displacement: Vec3, normal: Vec3) -> Vec3 {
    displacement - normal * displacement.dot(normal)
}

/// Runs the movement rules of one player against a piece of world geometry.
pub struct PlayerController<'a, Q> {
    config: &'a PlayerConfig,
    world: &'a Q,
}

impl<'a, Q: CollisionQuery> PlayerController<'a, Q> {
    pub fn new(config: &'a PlayerConfig, world: &'a Q) -> Self {
        Self { config, world }
    }

    /// Advances `state` by one frame.
    ///
    /// Order matters: look, horizontal move, gravity, ground, ceiling, jump.
    /// A disabled input or a zero (or NaN) elapsed leaves the state untouched.
    pub fn tick(&self, state: &mut PlayerState, input: &InputSnapshot, elapsed: f32) {
        // clamp lets NaN through
        let dt = elapsed.clamp(0.0, self.config.max_elapsed);
        if input.disabled || dt.is_nan() || dt == 0.0 {
            return;
        }

        self.update_look(state, input.look_delta);
        self.move_horizontal(state, input, dt);
        self.apply_gravity(state, dt);
        self.resolve_ground(state);
        self.resolve_ceiling(state);

        if input.jump_requested && state.grounded {
            state.vertical_velocity = self.config.jump_impulse;
        }
    }

    fn update_look(&self, state: &mut PlayerState, look_delta: Vec2) {
        state.yaw -= look_delta.x * self.config.look_sensitivity;
        state.pitch = (state.pitch - look_delta.y * self.config.look_sensitivity)
            .clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    fn move_horizontal(&self, state: &mut PlayerState, input: &InputSnapshot, dt: f32) {
        let wish = wish_direction(input);
        if wish == Vec2::ZERO {
            return;
        }

        let (forward, right) = flat_basis(state.yaw);
        let displacement = (forward * wish.y + right * wish.x) * self.config.move_speed * dt;

        if let Some(position) = self.resolve_move(state.position, displacement) {
            state.position = position;
        }
    }

    /// Final position of a horizontal move, or `None` to hold still this tick
    fn resolve_move(&self, origin: Vec3, displacement: Vec3) -> Option<Vec3> {
        let Some(contact) = self.lateral_contact(origin, displacement) else {
            return Some(origin + displacement);
        };

        let slid = slide(displacement, contact.normal);
        if slid.length_squared() < f32::EPSILON * f32::EPSILON {
            return None;
        }

        // One slide pass only; a second wall means a corner
        match self.lateral_contact(origin, slid) {
            Some(_) => None,
            None => Some(origin + slid),
        }
    }

    /// Contact that blocks moving from `origin` by `displacement`, if any
    fn lateral_contact(&self, origin: Vec3, displacement: Vec3) -> Option<Contact> {
        let length = displacement.length();
        let direction = Dir3::new(displacement).ok()?;
        let radius = self.config.radius;

        let sweep_range = radius + length;
        let sweep = self
            .world
            .probe(origin, direction, sweep_range)
            .filter(|c| c.distance < sweep_range);
        if sweep.is_some() {
            return sweep;
        }

        let candidate = origin + displacement;
        LATERAL_AXES
            .iter()
            .filter_map(|axis| self.world.probe(candidate, *axis, radius))
            .filter(|c| c.distance < radius)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn apply_gravity(&self, state: &mut PlayerState, dt: f32) {
        state.vertical_velocity += self.config.gravity * dt;
        state.position.y += state.vertical_velocity * dt;
    }

    fn resolve_ground(&self, state: &mut PlayerState) {
        let eye_height = self.config.eye_height;
        let ground = self
            .world
            .probe(state.position, Dir3::NEG_Y, eye_height + self.config.ground_margin)
            .filter(|c| c.distance < eye_height && state.vertical_velocity <= 0.0);

        match ground {
            Some(contact) => {
                let floor_y = state.position.y - contact.distance;
                state.position.y = floor_y + eye_height;
                state.vertical_velocity = 0.0;
                state.grounded = true;
            }
            None => state.grounded = false,
        }
    }

    fn resolve_ceiling(&self, state: &mut PlayerState) {
        if state.vertical_velocity <= 0.0 {
            return;
        }

        let ceiling = self
            .world
            .probe(state.position, Dir3::Y, self.config.ceiling_clearance);
        if ceiling.is_some() {
            state.vertical_velocity = 0.0;
        }
    }
}
