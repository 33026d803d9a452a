use std::collections::HashSet;

use crate::action::{ClickAction, FrameInput, Key, MouseButton, MoveIntent};
use crate::hotbar::Hotbar;

/// Largest pitch magnitude in radians, shared by mouse look and the simulation.
pub const PITCH_LIMIT: f32 = 1.45;

/// Mouse-look heading and elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookState {
    pub yaw: f32,
    pub pitch: f32,
    pub sensitivity: f32,
    pub pitch_limit: f32,
}

impl Default for LookState {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.002,
            pitch_limit: PITCH_LIMIT,
        }
    }
}

impl LookState {
    /// Apply a mouse delta in pixels. Moving right turns right, moving down looks down.
    pub fn apply_delta(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-self.pitch_limit, self.pitch_limit);
    }
}

/// Accumulated input between frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_held: HashSet<Key>,
    pointer_locked: bool,
    look: LookState,
    hotbar: Hotbar,
    pending_clicks: Vec<ClickAction>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hotbar(hotbar: Hotbar) -> Self {
        Self {
            hotbar,
            ..Self::default()
        }
    }

    pub fn key_down(&mut self, key: Key) {
        self.keys_held.insert(key);
        if let Key::Digit(n) = key {
            self.hotbar.select_number(n);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.keys_held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.keys_held.contains(&key)
    }

    /// Host-reported pointer lock state.
    pub fn set_pointer_locked(&mut self, locked: bool) {
        if self.pointer_locked != locked {
            tracing::debug!(locked, "pointer lock changed");
        }
        self.pointer_locked = locked;
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        if !self.pointer_locked {
            return;
        }
        self.look.apply_delta(dx, dy);
    }

    pub fn mouse_button(&mut self, button: MouseButton) {
        if let Some(action) = ClickAction::from_button(button) {
            self.pending_clicks.push(action);
        }
    }

    pub fn look(&self) -> &LookState {
        &self.look
    }

    pub fn look_mut(&mut self) -> &mut LookState {
        &mut self.look
    }

    pub fn hotbar(&self) -> &Hotbar {
        &self.hotbar
    }

    pub fn hotbar_mut(&mut self) -> &mut Hotbar {
        &mut self.hotbar
    }

    /// Sample this frame's input. Pending clicks are handed over exactly once.
    pub fn snapshot(&mut self) -> FrameInput {
        FrameInput {
            movement: MoveIntent {
                forward: self.is_held(Key::W),
                back: self.is_held(Key::S),
                left: self.is_held(Key::A),
                right: self.is_held(Key::D),
            },
            jump: self.is_held(Key::Space),
            yaw: self.look.yaw,
            pitch: self.look.pitch,
            material: self.hotbar.selected(),
            clicks: std::mem::take(&mut self.pending_clicks),
        }
    }
}
