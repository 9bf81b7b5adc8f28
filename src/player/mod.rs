mod controller;
pub mod input;
mod movement;
mod plugin;
mod state;
mod teleport;

pub use controller::{flat_basis, slide, wish_direction, PlayerController};
pub use input::{AnalogMove, HeldKeys, InputSnapshot, JumpRequest, MovementDisabled, TouchLookSettings};
pub use plugin::{spawn_player, PlayerPlugin};
pub use state::*;
pub use teleport::Teleport;
