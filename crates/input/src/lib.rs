//! Input: raw key and mouse events folded into one snapshot per frame.
//!
//! # Invariants
//! - Event handlers only mutate `InputState`; the simulation reads a
//!   `FrameInput` sampled once at the start of each update.
//! - Mouse look is ignored unless the pointer is locked.

pub mod action;
mod hotbar;
mod state;

pub use action::{ClickAction, FrameInput, Key, MouseButton, MoveIntent};
pub use hotbar::Hotbar;
pub use state::{InputState, LookState, PITCH_LIMIT};
