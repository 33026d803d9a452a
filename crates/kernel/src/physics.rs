use blockcraft_input::MoveIntent;
use blockcraft_terrain::Terrain;
use glam::Vec3;

use crate::blocks::BlockStore;
use crate::config::PlayerConfig;
use crate::player::{MotionState, Player, body_at};

/// What happened to the player during one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionReport {
    pub blocked_x: bool,
    pub blocked_z: bool,
    pub stepped_up: bool,
    pub blocked_y: bool,
    pub clamped_to_ground: bool,
    pub jumped: bool,
}

/// Horizontal displacement for one frame: held keys projected on the
/// yaw-derived forward/right axes, normalized and scaled to `speed`.
pub fn movement_vector(intent: &MoveIntent, yaw: f32, speed: f32) -> Vec3 {
    let forward = Vec3::new(-yaw.sin(), 0.0, -yaw.cos());
    let right = Vec3::new(yaw.cos(), 0.0, -yaw.sin());

    let mut v = Vec3::ZERO;
    if intent.forward {
        v += forward;
    }
    if intent.back {
        v -= forward;
    }
    if intent.right {
        v += right;
    }
    if intent.left {
        v -= right;
    }

    if v.length_squared() > 0.0 {
        v.normalize() * speed
    } else {
        Vec3::ZERO
    }
}

/// Advance the player by one frame.
///
/// X and Z are resolved one at a time so that pressing diagonally into a
/// wall still slides along it. Vertical motion follows, then the terrain and
/// water floor clamp, then the jump.
pub(crate) fn advance<T: Terrain + ?Sized>(
    player: &mut Player,
    config: &PlayerConfig,
    movement: Vec3,
    jump: bool,
    blocks: &BlockStore,
    terrain: &T,
) -> MotionReport {
    let mut report = MotionReport::default();

    for axis in [0usize, 2] {
        let delta = movement[axis];
        if delta == 0.0 {
            continue;
        }
        let mut next = player.feet;
        next[axis] += delta;

        if !blocks.intersects(&body_at(next, config)) {
            player.feet = next;
        } else if let Some(lifted) = step_up(player, next, config, blocks) {
            player.feet = lifted;
            report.stepped_up = true;
        } else if axis == 0 {
            report.blocked_x = true;
        } else {
            report.blocked_z = true;
        }
    }

    player.velocity_y -= config.gravity;
    let mut next = player.feet;
    next.y += player.velocity_y;
    let body = body_at(next, config);

    let mut colliders = blocks.colliders_overlapping(&body).peekable();
    if colliders.peek().is_none() {
        player.feet = next;
        player.state = MotionState::Airborne;
    } else {
        if player.velocity_y < 0.0 {
            // Land flush on the highest block beneath.
            let top = colliders.fold(f32::NEG_INFINITY, |acc, c| acc.max(c.max.y));
            if top <= player.feet.y {
                player.feet.y = top;
            }
        } else {
            // Stop just under the lowest block above.
            let bottom = colliders.fold(f32::INFINITY, |acc, c| acc.min(c.min.y));
            let feet = bottom - config.height;
            if feet >= player.feet.y {
                player.feet.y = feet;
            }
        }
        player.velocity_y = 0.0;
        player.state = MotionState::Grounded;
        report.blocked_y = true;
    }

    let floor = terrain.ground_at(player.feet.x, player.feet.z);
    if player.feet.y <= floor {
        player.feet.y = floor;
        player.velocity_y = 0.0;
        player.state = MotionState::Grounded;
        report.clamped_to_ground = true;
    }

    if jump && player.is_grounded() {
        player.velocity_y = config.jump_impulse;
        player.state = MotionState::Airborne;
        report.jumped = true;
    }

    report
}

/// Try to walk onto an obstacle no taller than `step_height`.
fn step_up(player: &Player, next: Vec3, config: &PlayerConfig, blocks: &BlockStore) -> Option<Vec3> {
    if config.step_height <= 0.0 || !player.is_grounded() {
        return None;
    }
    let body = body_at(next, config);
    let top = blocks
        .colliders_overlapping(&body)
        .fold(f32::NEG_INFINITY, |acc, c| acc.max(c.max.y));
    let lift = top - next.y;
    if lift <= 0.0 || lift > config.step_height {
        return None;
    }
    let lifted = Vec3::new(next.x, top, next.z);
    if blocks.intersects(&body_at(lifted, config)) {
        return None;
    }
    Some(lifted)
}
