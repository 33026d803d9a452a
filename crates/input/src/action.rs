use blockcraft_common::Material;
use serde::{Deserialize, Serialize};

/// Keys the simulation reacts to. Everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    /// Number row key, `1..=9`.
    Digit(u8),
    Other,
}

impl Key {
    /// Map a DOM-style key code (`"KeyW"`, `"Space"`, `"Digit3"`).
    pub fn from_code(code: &str) -> Self {
        match code {
            "KeyW" => Key::W,
            "KeyA" => Key::A,
            "KeyS" => Key::S,
            "KeyD" => Key::D,
            "Space" => Key::Space,
            _ => code
                .strip_prefix("Digit")
                .and_then(|d| d.parse::<u8>().ok())
                .filter(|d| (1..=9).contains(d))
                .map_or(Key::Other, Key::Digit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// What a pointer click asks the world to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClickAction {
    /// Build a block next to whatever is under the crosshair.
    Place,
    /// Remove the placed block under the crosshair.
    Remove,
}

impl ClickAction {
    pub fn from_button(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(ClickAction::Place),
            MouseButton::Right => Some(ClickAction::Remove),
            MouseButton::Middle => None,
        }
    }
}

/// Movement keys held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.back || self.left || self.right)
    }
}

/// Input sampled once at the start of a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub movement: MoveIntent,
    pub jump: bool,
    /// Heading in radians. Zero looks down -Z.
    pub yaw: f32,
    /// Elevation in radians, positive looks up.
    pub pitch: f32,
    /// Material the hotbar currently has selected.
    pub material: Material,
    /// Clicks received since the previous frame, oldest first.
    pub clicks: Vec<ClickAction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_map() {
        assert_eq!(Key::from_code("KeyW"), Key::W);
        assert_eq!(Key::from_code("Space"), Key::Space);
        assert_eq!(Key::from_code("Digit3"), Key::Digit(3));
        assert_eq!(Key::from_code("Digit0"), Key::Other);
        assert_eq!(Key::from_code("KeyQ"), Key::Other);
    }

    #[test]
    fn buttons_map_to_actions() {
        assert_eq!(
            ClickAction::from_button(MouseButton::Left),
            Some(ClickAction::Place)
        );
        assert_eq!(
            ClickAction::from_button(MouseButton::Right),
            Some(ClickAction::Remove)
        );
        assert_eq!(ClickAction::from_button(MouseButton::Middle), None);
    }

    #[test]
    fn default_frame_is_idle() {
        let f = FrameInput::default();
        assert!(f.movement.is_idle());
        assert!(!f.jump);
        assert!(f.clicks.is_empty());
        assert_eq!(f.material, Material::Grass);
    }
}
