use bevy::ecs::observer::On;
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::state::Player;
use crate::camera::LookCapture;

/// Walk forward (W / Up)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct MoveForwardAction;

/// Walk backward (S / Down)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct MoveBackAction;

/// Strafe left (A / Left)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct StrafeLeftAction;

/// Strafe right (D / Right)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct StrafeRightAction;

/// Look around (mouse delta)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct LookAction;

/// Jump action
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct JumpAction;

/// Discrete movement keys currently held
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeldKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Accumulated look delta since the last snapshot
#[derive(Component, Default, Deref, DerefMut)]
pub struct LookInput(pub Vec2);

/// Stores whether jump was pressed since the last snapshot
#[derive(Component, Default)]
pub struct JumpPressed(pub bool);

/// Everything the controller reads for one tick
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    pub keys: HeldKeys,
    /// Virtual joystick, x strafes right and y walks forward
    pub analog: Vec2,
    /// Look delta in input units (pixels)
    pub look_delta: Vec2,
    /// Jump edge, true only on the frame the jump was pressed
    pub jump_requested: bool,
    pub disabled: bool,
}

/// Set by UI, dialogs and teleport fades to stop the player
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct MovementDisabled(pub bool);

/// Virtual joystick vector, each axis in [-1, 1]. "Up" on the stick is +y.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct AnalogMove(pub Vec2);

/// Jump pressed on an on-screen button
#[derive(Message, Debug, Default, Clone, Copy)]
pub struct JumpRequest;

/// Touch-drag look configuration
#[derive(Resource, Debug, Clone)]
pub struct TouchLookSettings {
    /// Screen areas (logical pixels) owned by on-screen controls; touches that
    /// begin inside them never turn the camera
    pub reserved: Vec<Rect>,
    /// Multiplier from touch pixels to look units
    pub scale: f32,
}

impl Default for TouchLookSettings {
    fn default() -> Self {
        Self {
            reserved: Vec::new(),
            scale: 1.0,
        }
    }
}

/// Maps a key action to its slot in [`HeldKeys`]
pub trait MoveKey: InputAction {
    fn slot(keys: &mut HeldKeys) -> &mut bool;
}

impl MoveKey for MoveForwardAction {
    fn slot(keys: &mut HeldKeys) -> &mut bool {
        &mut keys.forward
    }
}

impl MoveKey for MoveBackAction {
    fn slot(keys: &mut HeldKeys) -> &mut bool {
        &mut keys.back
    }
}

impl MoveKey for StrafeLeftAction {
    fn slot(keys: &mut HeldKeys) -> &mut bool {
        &mut keys.left
    }
}

impl MoveKey for StrafeRightAction {
    fn slot(keys: &mut HeldKeys) -> &mut bool {
        &mut keys.right
    }
}

/// Handle movement key press
pub fn handle_move_key_start<A: MoveKey>(trigger: On<Start<A>>, mut query: Query<&mut HeldKeys>) {
    if let Ok(mut keys) = query.get_mut(trigger.event_target()) {
        *A::slot(&mut keys) = true;
    }
}

/// Handle movement key release
pub fn handle_move_key_end<A: MoveKey>(trigger: On<Complete<A>>, mut query: Query<&mut HeldKeys>) {
    if let Ok(mut keys) = query.get_mut(trigger.event_target()) {
        *A::slot(&mut keys) = false;
    }
}

/// System to handle look input via observer
pub fn handle_look_input(trigger: On<Fire<LookAction>>, mut query: Query<&mut LookInput>) {
    if let Ok(mut look_input) = query.get_mut(trigger.event_target()) {
        look_input.0 += trigger.value;
    }
}

/// Handle jump press
pub fn handle_jump_start(trigger: On<Start<JumpAction>>, mut query: Query<&mut JumpPressed>) {
    if let Ok(mut jump) = query.get_mut(trigger.event_target()) {
        jump.0 = true;
    }
}

/// The single finger currently turning the camera
#[derive(Debug, Default)]
pub struct TouchDrag {
    id: Option<u64>,
    last: Vec2,
}

impl TouchDrag {
    /// Look delta for this frame, in touch pixels times the configured scale.
    ///
    /// The drag follows one touch from press to release. While no drag is
    /// active, a new one starts from a touch pressed this frame outside every
    /// reserved zone; other fingers are ignored.
    fn delta(&mut self, touches: &Touches, settings: &TouchLookSettings) -> Vec2 {
        if let Some(id) = self.id {
            if let Some(touch) = touches.get_pressed(id) {
                let delta = touch.position() - self.last;
                self.last = touch.position();
                return delta * settings.scale;
            }
            self.id = None;
        }

        let started = touches
            .iter_just_pressed()
            .filter(|touch| {
                let start = touch.start_position();
                !settings.reserved.iter().any(|zone| zone.contains(start))
            })
            .min_by_key(|touch| touch.id());
        if let Some(touch) = started {
            self.id = Some(touch.id());
            self.last = touch.position();
        }
        Vec2::ZERO
    }
}

/// Builds this frame's [`InputSnapshot`] and consumes the transient inputs.
///
/// While movement is disabled the held keys and pending jump are dropped, so
/// nothing pressed during a dialog is replayed afterwards.
pub fn snapshot_input(
    disabled: Res<MovementDisabled>,
    analog: Res<AnalogMove>,
    capture: Res<LookCapture>,
    touches: Res<Touches>,
    touch_settings: Res<TouchLookSettings>,
    mut touch_drag: Local<TouchDrag>,
    mut jump_requests: MessageReader<JumpRequest>,
    mut query: Query<
        (&mut HeldKeys, &mut LookInput, &mut JumpPressed, &mut InputSnapshot),
        With<Player>,
    >,
) {
    let button_jump = jump_requests.read().count() > 0;
    let touch_look = touch_drag.delta(&touches, &touch_settings);

    for (mut keys, mut look, mut jump, mut snapshot) in &mut query {
        if disabled.0 {
            *keys = HeldKeys::default();
            *snapshot = InputSnapshot {
                disabled: true,
                ..default()
            };
        } else {
            let mouse_look = if capture.active { look.0 } else { Vec2::ZERO };

            *snapshot = InputSnapshot {
                keys: *keys,
                analog: analog.0.clamp(Vec2::NEG_ONE, Vec2::ONE),
                look_delta: mouse_look + touch_look,
                jump_requested: jump.0 || button_jump,
                disabled: false,
            };
        }

        look.0 = Vec2::ZERO;
        jump.0 = false;
    }
}

#[cfg(test)]
mod tests {
    use bevy::input::touch::{touch_screen_input_system, TouchInput, TouchPhase};

    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<MovementDisabled>()
            .init_resource::<AnalogMove>()
            .init_resource::<LookCapture>()
            .init_resource::<Touches>()
            .init_resource::<TouchLookSettings>()
            .add_message::<JumpRequest>()
            .add_systems(Update, snapshot_input);
        app
    }

    fn spawn_player(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                HeldKeys::default(),
                LookInput::default(),
                JumpPressed::default(),
                InputSnapshot::default(),
            ))
            .id()
    }

    #[test]
    fn snapshot_consumes_jump_and_look() {
        let mut app = app();
        app.world_mut().resource_mut::<LookCapture>().active = true;
        let player = spawn_player(&mut app);
        {
            let mut entity = app.world_mut().entity_mut(player);
            entity.get_mut::<JumpPressed>().unwrap().0 = true;
            entity.get_mut::<LookInput>().unwrap().0 = Vec2::new(3.0, -1.0);
            entity.get_mut::<HeldKeys>().unwrap().forward = true;
        }

        app.update();
        let snapshot = *app.world().get::<InputSnapshot>(player).unwrap();
        assert!(snapshot.jump_requested);
        assert_eq!(snapshot.look_delta, Vec2::new(3.0, -1.0));
        assert!(snapshot.keys.forward);

        // Edges don't repeat, held keys do
        app.update();
        let snapshot = *app.world().get::<InputSnapshot>(player).unwrap();
        assert!(!snapshot.jump_requested);
        assert_eq!(snapshot.look_delta, Vec2::ZERO);
        assert!(snapshot.keys.forward);
    }

    #[test]
    fn mouse_look_needs_capture() {
        let mut app = app();
        let player = spawn_player(&mut app);
        app.world_mut().get_mut::<LookInput>(player).unwrap().0 = Vec2::new(5.0, 5.0);

        app.update();
        let snapshot = app.world().get::<InputSnapshot>(player).unwrap();
        assert_eq!(snapshot.look_delta, Vec2::ZERO);
    }

    #[test]
    fn button_jump_and_joystick_are_read() {
        let mut app = app();
        let player = spawn_player(&mut app);
        app.world_mut().resource_mut::<AnalogMove>().0 = Vec2::new(3.0, -0.5);
        app.world_mut().write_message(JumpRequest);

        app.update();
        let snapshot = app.world().get::<InputSnapshot>(player).unwrap();
        assert!(snapshot.jump_requested);
        assert_eq!(snapshot.analog, Vec2::new(1.0, -0.5));
    }

    fn touch(app: &mut App, id: u64, phase: TouchPhase, x: f32, y: f32) {
        app.world_mut().write_message(TouchInput {
            phase,
            position: Vec2::new(x, y),
            window: Entity::PLACEHOLDER,
            force: None,
            id,
        });
    }

    fn look_after_update(app: &mut App, player: Entity) -> Vec2 {
        app.update();
        app.world().get::<InputSnapshot>(player).unwrap().look_delta
    }

    #[test]
    fn touch_look_follows_one_finger() {
        let mut app = app();
        app.add_message::<TouchInput>()
            .add_systems(PreUpdate, touch_screen_input_system);
        app.world_mut().resource_mut::<TouchLookSettings>().reserved =
            vec![Rect::new(0.0, 0.0, 100.0, 100.0)];
        let player = spawn_player(&mut app);

        // Finger 1 lands on the joystick zone, finger 2 starts a drag
        touch(&mut app, 1, TouchPhase::Started, 10.0, 10.0);
        touch(&mut app, 2, TouchPhase::Started, 300.0, 300.0);
        assert_eq!(look_after_update(&mut app, player), Vec2::ZERO);

        touch(&mut app, 1, TouchPhase::Moved, 50.0, 50.0);
        touch(&mut app, 2, TouchPhase::Moved, 310.0, 295.0);
        assert_eq!(look_after_update(&mut app, player), Vec2::new(10.0, -5.0));

        // A second free finger doesn't take over the drag
        touch(&mut app, 0, TouchPhase::Started, 500.0, 500.0);
        touch(&mut app, 2, TouchPhase::Moved, 320.0, 295.0);
        assert_eq!(look_after_update(&mut app, player), Vec2::new(10.0, 0.0));
        touch(&mut app, 0, TouchPhase::Moved, 600.0, 600.0);
        assert_eq!(look_after_update(&mut app, player), Vec2::ZERO);

        // A finger held still doesn't keep turning
        assert_eq!(look_after_update(&mut app, player), Vec2::ZERO);

        // Once released, a new press can drag again
        touch(&mut app, 2, TouchPhase::Ended, 320.0, 295.0);
        assert_eq!(look_after_update(&mut app, player), Vec2::ZERO);
        touch(&mut app, 3, TouchPhase::Started, 400.0, 400.0);
        assert_eq!(look_after_update(&mut app, player), Vec2::ZERO);
        touch(&mut app, 3, TouchPhase::Moved, 390.0, 404.0);
        assert_eq!(look_after_update(&mut app, player), Vec2::new(-10.0, 4.0));
    }

    #[test]
    fn disabling_discards_held_input() {
        let mut app = app();
        let player = spawn_player(&mut app);
        {
            let mut entity = app.world_mut().entity_mut(player);
            entity.get_mut::<JumpPressed>().unwrap().0 = true;
            entity.get_mut::<HeldKeys>().unwrap().left = true;
        }
        app.world_mut().resource_mut::<MovementDisabled>().0 = true;

        app.update();
        let snapshot = *app.world().get::<InputSnapshot>(player).unwrap();
        assert!(snapshot.disabled);
        assert_eq!(snapshot.keys, HeldKeys::default());
        assert!(!snapshot.jump_requested);

        app.world_mut().resource_mut::<MovementDisabled>().0 = false;
        app.update();
        let snapshot = *app.world().get::<InputSnapshot>(player).unwrap();
        assert!(!snapshot.disabled);
        assert!(!snapshot.keys.left);
        assert!(!snapshot.jump_requested);
    }
}
