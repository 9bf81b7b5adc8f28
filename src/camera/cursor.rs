use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

use crate::player::MovementDisabled;

/// Whether mouse motion currently turns the camera (cursor grabbed)
#[derive(Resource, Debug, Default)]
pub struct LookCapture {
    pub active: bool,
    /// Capture was dropped by a disable and comes back on re-enable
    resume: bool,
}

impl LookCapture {
    /// Next capture state given this frame's events
    fn next(&mut self, disabled: bool, clicked: bool, released: bool) -> bool {
        if disabled {
            self.resume |= self.active;
            return false;
        }
        if released {
            self.resume = false;
            return false;
        }
        if clicked || self.resume {
            self.resume = false;
            return true;
        }
        self.active
    }
}

/// Grabs the cursor on click and releases it on Escape or while movement is
/// disabled
pub fn update_cursor_capture(
    disabled: Res<MovementDisabled>,
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut capture: ResMut<LookCapture>,
    mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let want = capture.next(
        disabled.0,
        mouse.just_pressed(MouseButton::Left),
        keys.just_pressed(KeyCode::Escape),
    );
    if want == capture.active {
        return;
    }
    capture.active = want;

    let Ok(mut cursor) = cursors.single_mut() else {
        return;
    };
    cursor.grab_mode = if want {
        CursorGrabMode::Locked
    } else {
        CursorGrabMode::None
    };
    cursor.visible = !want;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_captures_and_escape_releases() {
        let mut capture = LookCapture::default();
        assert!(!capture.next(false, false, false));

        capture.active = capture.next(false, true, false);
        assert!(capture.active);
        assert!(capture.next(false, false, false));

        capture.active = capture.next(false, false, true);
        assert!(!capture.active);
        assert!(!capture.next(false, false, false));
    }

    #[test]
    fn disable_releases_and_reenable_restores() {
        let mut capture = LookCapture {
            active: true,
            ..default()
        };

        for _ in 0..3 {
            capture.active = capture.next(true, true, false);
            assert!(!capture.active);
        }

        capture.active = capture.next(false, false, false);
        assert!(capture.active);
    }

    #[test]
    fn reenable_without_prior_capture_stays_released() {
        let mut capture = LookCapture::default();
        capture.active = capture.next(true, false, false);
        capture.active = capture.next(false, false, false);
        assert!(!capture.active);
    }
}
