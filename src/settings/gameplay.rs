use crate::input::{GAMEPAD_SCHEME, KEYBOARD_MOUSE_SCHEME};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameplaySettings {
    /// Multiplier for mouse look input
    pub mouse_sensitivity: f32,
    /// Multiplier for stick look input
    pub controller_sensitivity: f32,
    /// Tap Crouch to toggle instead of holding it
    pub toggle_crouch: bool,
    /// Tap Sprint to toggle instead of holding it
    pub toggle_sprint: bool,
    pub invert_y: bool,
    /// Widen the camera FOV while sprinting (can cause motion sickness)
    pub fov_modifier: bool,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.5,
            controller_sensitivity: 5.0,
            toggle_crouch: false,
            toggle_sprint: false,
            invert_y: false,
            fov_modifier: true,
        }
    }
}

impl GameplaySettings {
    /// Scales a raw look delta for the active control scheme and applies invert-Y.
    pub fn look_delta(&self, raw: (f32, f32), scheme: &str) -> (f32, f32) {
        let scale = match scheme {
            KEYBOARD_MOUSE_SCHEME => self.mouse_sensitivity,
            GAMEPAD_SCHEME => self.controller_sensitivity,
            _ => 1.0,
        };
        let (x, mut y) = (raw.0 * scale, raw.1 * scale);
        if self.invert_y {
            y = -y;
        }
        (x, y)
    }
}

/// Camera pitch after a vertical look delta, kept within straight up/down.
pub fn next_pitch(pitch: f32, look_y: f32) -> f32 {
    (pitch - look_y).clamp(-90.0, 90.0)
}

/// Turns a held button into an on/off state, either while held or flipped per press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoldToggle {
    active: bool,
    was_pressed: bool,
}

impl HoldToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds this frame's button state and returns whether the action is active.
    pub fn update(&mut self, pressed: bool, toggle_mode: bool) -> bool {
        if toggle_mode {
            if pressed && !self.was_pressed {
                self.active = !self.active;
            }
        } else {
            self.active = pressed;
        }
        self.was_pressed = pressed;
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_delta_uses_scheme_sensitivity() {
        let gameplay = GameplaySettings::default();
        assert_eq!(gameplay.look_delta((2.0, 4.0), KEYBOARD_MOUSE_SCHEME), (1.0, 2.0));
        assert_eq!(gameplay.look_delta((1.0, 1.0), GAMEPAD_SCHEME), (5.0, 5.0));
        assert_eq!(gameplay.look_delta((1.0, 1.0), "Touch"), (1.0, 1.0));
    }

    #[test]
    fn test_look_delta_inverts_y() {
        let gameplay = GameplaySettings {
            invert_y: true,
            mouse_sensitivity: 1.0,
            ..GameplaySettings::default()
        };
        assert_eq!(gameplay.look_delta((1.0, 3.0), KEYBOARD_MOUSE_SCHEME), (1.0, -3.0));
    }

    #[test]
    fn test_pitch_is_clamped() {
        assert_eq!(next_pitch(80.0, -20.0), 90.0);
        assert_eq!(next_pitch(-80.0, 20.0), -90.0);
        assert_eq!(next_pitch(0.0, 10.0), -10.0);
    }

    #[test]
    fn test_hold_mode_follows_button() {
        let mut latch = HoldToggle::new();
        assert!(latch.update(true, false));
        assert!(latch.update(true, false));
        assert!(!latch.update(false, false));
    }

    #[test]
    fn test_toggle_mode_flips_on_press_edge() {
        let mut latch = HoldToggle::new();
        assert!(latch.update(true, true));
        // still held, no new edge
        assert!(latch.update(true, true));
        assert!(latch.update(false, true));
        assert!(!latch.update(true, true));
        assert!(!latch.is_active());
    }
}
