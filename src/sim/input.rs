//! Raw device state to `TickInput`
//!
//! Device plumbing stays outside the crate; frontends fill a [`RawInput`]
//! from their events and resolve it once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tick::TickInput;
use crate::angle_between;
use crate::consts::JOYSTICK_MAX_DRAG;

/// Held movement keys (WASD or arrows)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    pub fn movement(self) -> Vec2 {
        movement_from_keys(self.up, self.down, self.left, self.right)
    }
}

/// Key flags to a movement vector. Diagonals are normalized; opposite keys
/// cancel. Screen space: up is negative y.
pub fn movement_from_keys(up: bool, down: bool, left: bool, right: bool) -> Vec2 {
    let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
    let raw = Vec2::new(axis(left, right), axis(up, down));
    if raw.x != 0.0 && raw.y != 0.0 {
        raw.normalize()
    } else {
        raw
    }
}

/// Touch joystick drag in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoystickDrag {
    pub start: Vec2,
    pub current: Vec2,
}

impl JoystickDrag {
    /// Drag offset scaled so `JOYSTICK_MAX_DRAG` pixels is full speed,
    /// clamped to unit length
    pub fn vector(&self) -> Vec2 {
        let v = (self.current - self.start) / JOYSTICK_MAX_DRAG;
        if v.length_squared() > 1.0 {
            v.normalize()
        } else {
            v
        }
    }
}

/// Screen-space mouse to a world-space aim angle from `tank_pos`.
///
/// The camera is centered on the viewport, so
/// `world = screen + camera - viewport / 2`.
pub fn aim_angle(mouse_screen: Vec2, camera: Vec2, viewport: Vec2, tank_pos: Vec2) -> f32 {
    let mouse_world = mouse_screen + camera - viewport / 2.0;
    angle_between(tank_pos, mouse_world)
}

/// Everything a frontend knows about its input devices for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub keys: KeyState,
    /// Active touch joystick; takes precedence over keys
    pub joystick: Option<JoystickDrag>,
    /// Mouse (or aim touch) position in screen pixels; `None` before the
    /// first pointer event
    pub mouse: Option<Vec2>,
    pub fire: bool,
    pub autopilot: bool,
}

impl RawInput {
    /// Resolve to a `TickInput` using the current camera and viewport
    pub fn resolve(&self, camera: Vec2, viewport: Vec2, tank_pos: Vec2) -> TickInput {
        let movement = match &self.joystick {
            Some(drag) => drag.vector(),
            None => self.keys.movement(),
        };
        TickInput {
            movement,
            aim_angle: self
                .mouse
                .map(|mouse| aim_angle(mouse, camera, viewport, tank_pos)),
            fire: self.fire,
            autopilot: self.autopilot,
        }
    }
}
