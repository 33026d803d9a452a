use blockcraft_common::{BlockPos, ConfigError, Material};
use blockcraft_input::{ClickAction, FrameInput, PITCH_LIMIT};
use blockcraft_terrain::{Heightmap, Terrain};
use glam::Vec3;

use crate::blocks::BlockStore;
use crate::camera::Camera;
use crate::config::SimConfig;
use crate::physics::{MotionReport, advance, movement_vector};
use crate::picking::{ClickOutcome, PickTarget, pick, terrain_placement};
use crate::player::Player;

/// Everything one `step` did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub tick: u64,
    pub motion: MotionReport,
    pub clicks: Vec<ClickOutcome>,
}

/// The simulation context: terrain, player, placed blocks and view angles.
///
/// All mutations go through explicit operations. Renderers and tools derive
/// from it and never write to it.
#[derive(Debug, Clone)]
pub struct World<T: Terrain = Heightmap> {
    config: SimConfig,
    terrain: T,
    player: Player,
    blocks: BlockStore,
    yaw: f32,
    pitch: f32,
    tick: u64,
}

impl World<Heightmap> {
    /// Create a world over the procedural heightmap described by `config`.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let terrain = Heightmap::new(config.terrain.clone())?;
        Self::with_terrain(config, terrain)
    }
}

impl<T: Terrain> World<T> {
    /// Create a world over arbitrary terrain. The player spawns above the
    /// configured spawn column.
    pub fn with_terrain(config: SimConfig, terrain: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawn = &config.spawn;
        let feet = Vec3::new(
            spawn.x,
            terrain.height_at(spawn.x, spawn.z) + spawn.clearance,
            spawn.z,
        );
        tracing::debug!(?feet, "player spawned");
        Ok(Self {
            config,
            terrain,
            player: Player::at(feet),
            blocks: BlockStore::new(),
            yaw: 0.0,
            pitch: 0.0,
            tick: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn blocks(&self) -> &BlockStore {
        &self.blocks
    }

    /// Number of completed updates.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn look(&self) -> (f32, f32) {
        (self.yaw, self.pitch)
    }

    /// Move the player without simulating. Velocity resets and the player
    /// starts falling.
    pub fn teleport(&mut self, feet: Vec3) {
        self.player = Player::at(feet);
    }

    /// Set view angles directly. Pitch is clamped to the mouse-look limit.
    pub fn set_look(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn camera(&self) -> Camera {
        Camera {
            eye: self.player.eye(&self.config.player),
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    /// Advance one frame: look, movement and collision, then clicks.
    pub fn step(&mut self, input: &FrameInput) -> FrameReport {
        let _span = tracing::trace_span!("world_step", tick = self.tick).entered();

        self.set_look(input.yaw, input.pitch);

        let movement = movement_vector(&input.movement, self.yaw, self.config.player.speed);
        let motion = advance(
            &mut self.player,
            &self.config.player,
            movement,
            input.jump,
            &self.blocks,
            &self.terrain,
        );
        tracing::trace!(
            feet = ?self.player.feet,
            velocity_y = self.player.velocity_y,
            state = ?self.player.state,
            "player advanced"
        );

        let clicks = input
            .clicks
            .iter()
            .map(|action| self.click(*action, input.material))
            .collect();

        self.tick += 1;
        FrameReport {
            tick: self.tick,
            motion,
            clicks,
        }
    }

    /// What the crosshair is pointing at, within reach.
    pub fn pick(&self) -> Option<PickTarget> {
        pick(
            &self.camera().center_ray(),
            self.config.interaction.reach,
            &self.blocks,
            &self.terrain,
        )
    }

    /// Resolve a click against the current camera pose.
    pub fn click(&mut self, action: ClickAction, material: Material) -> ClickOutcome {
        let outcome = match (self.pick(), action) {
            (None, _) => ClickOutcome::Missed,
            (Some(PickTarget::Block(hit)), ClickAction::Remove) => match self.remove_block(hit.pos) {
                Some(material) => ClickOutcome::Removed {
                    pos: hit.pos,
                    material,
                },
                None => ClickOutcome::Missed,
            },
            (Some(PickTarget::Block(hit)), ClickAction::Place) => {
                self.place_or_block(hit.adjacent(), material)
            }
            (Some(PickTarget::Terrain(_)), ClickAction::Remove) => ClickOutcome::Ignored,
            (Some(PickTarget::Terrain(point)), ClickAction::Place) => {
                let pos = terrain_placement(&self.terrain, point);
                self.place_or_block(pos, material)
            }
        };
        tracing::debug!(?action, ?outcome, "click resolved");
        outcome
    }

    fn place_or_block(&mut self, pos: BlockPos, material: Material) -> ClickOutcome {
        if self.place_block(pos, material) {
            ClickOutcome::Placed { pos, material }
        } else {
            ClickOutcome::Blocked(pos)
        }
    }

    /// Place a block unless the cell is taken or would enclose the player.
    pub fn place_block(&mut self, pos: BlockPos, material: Material) -> bool {
        if pos.aabb().intersects(&self.player.aabb(&self.config.player)) {
            tracing::debug!(%pos, "placement overlaps player");
            return false;
        }
        let placed = self.blocks.place(pos, material);
        if placed {
            tracing::debug!(%pos, %material, "block placed");
        }
        placed
    }

    pub fn remove_block(&mut self, pos: BlockPos) -> Option<Material> {
        let removed = self.blocks.remove(pos);
        if let Some(material) = removed {
            tracing::debug!(%pos, %material, "block removed");
        }
        removed
    }

    /// Deterministic digest of tick, player state and blocks.
    pub fn state_hash(&self) -> u64 {
        let mut h = self.blocks.state_hash();
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&self.tick.to_le_bytes());
        for v in [
            self.player.feet.x,
            self.player.feet.y,
            self.player.feet.z,
            self.player.velocity_y,
            self.yaw,
            self.pitch,
        ] {
            mix(&v.to_le_bytes());
        }
        mix(&[self.player.is_grounded() as u8]);
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::MotionState;
    use blockcraft_input::{LookState, MoveIntent};
    use blockcraft_terrain::FlatTerrain;
    use glam::IVec3;

    /// Ground rising 0.9 per unit along +X.
    #[derive(Debug, Clone, Copy)]
    struct Slope;

    impl Terrain for Slope {
        fn height_at(&self, x: f32, _z: f32) -> f32 {
            3.0 + 0.9 * x
        }
    }

    fn flat_world(height: f32) -> World<FlatTerrain> {
        World::with_terrain(SimConfig::default(), FlatTerrain::new(height)).unwrap()
    }

    fn holding(movement: MoveIntent) -> FrameInput {
        FrameInput {
            movement,
            ..FrameInput::default()
        }
    }

    /// Splitmix64 step, used to script reproducible input sequences.
    fn splitmix64(state: &mut u64) -> u64 {
        *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = *state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn scripted_input(rng: &mut u64) -> FrameInput {
        let bits = splitmix64(rng);
        let mut clicks = Vec::new();
        if bits & 0x3f0 == 0 {
            clicks.push(ClickAction::Place);
        }
        if bits & 0x3f000 == 0 {
            clicks.push(ClickAction::Remove);
        }
        FrameInput {
            movement: MoveIntent {
                forward: bits & 1 != 0,
                back: bits & 2 != 0 && bits & 4 != 0,
                left: bits & 8 != 0,
                right: bits & 16 != 0,
            },
            jump: bits & 32 != 0,
            yaw: ((bits >> 20) % 628) as f32 / 100.0,
            pitch: -(((bits >> 32) % 145) as f32 / 100.0),
            material: Material::ALL[((bits >> 40) % 6) as usize],
            clicks,
        }
    }

    #[test]
    fn spawn_above_heightmap() {
        let world = World::new(SimConfig::default()).unwrap();
        let expected = world.terrain().height_at(0.0, 20.0) + 2.0;
        assert_eq!(world.player().feet, Vec3::new(0.0, expected, 20.0));
        assert_eq!(world.tick(), 0);
        assert!(world.blocks().is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = SimConfig::default();
        config.interaction.reach = 0.0;
        assert!(World::new(config).is_err());
    }

    #[test]
    fn feet_never_below_ground_or_water() {
        let mut world = World::new(SimConfig::default()).unwrap();
        let mut rng = 42;
        for _ in 0..2_000 {
            let input = scripted_input(&mut rng);
            world.step(&input);
            let feet = world.player().feet;
            let floor = world.terrain().ground_at(feet.x, feet.z);
            assert!(feet.y >= floor, "feet {feet:?} below floor {floor}");
            assert!(feet.y >= world.terrain().water_level());
        }
    }

    #[test]
    fn landing_zeroes_velocity() {
        let mut world = flat_world(0.0);
        world.teleport(Vec3::new(0.0, 3.0, 0.0));
        for _ in 0..100 {
            world.step(&FrameInput::default());
        }
        assert_eq!(world.player().feet.y, 0.0);
        assert_eq!(world.player().velocity_y, 0.0);
        assert_eq!(world.player().state, MotionState::Grounded);
    }

    #[test]
    fn wall_slide_stops_one_axis_only() {
        let mut world = flat_world(10.0);
        assert!(world.place_block(BlockPos::new(2, 10, 0), Material::Stone));
        world.teleport(Vec3::new(0.0, 10.0, 0.0));

        let right = MoveIntent {
            right: true,
            ..MoveIntent::default()
        };
        for _ in 0..40 {
            world.step(&holding(right));
        }
        let halted = world.player().feet;
        // Block face at x = 2 minus the 0.35 radius.
        assert!(halted.x <= 1.65, "walked into the block: {halted:?}");
        assert!(halted.x > 1.55, "stopped too early: {halted:?}");
        assert_eq!(halted.z, 0.0);

        let slide = MoveIntent {
            right: true,
            back: true,
            ..MoveIntent::default()
        };
        for _ in 0..10 {
            let report = world.step(&holding(slide));
            assert!(report.motion.blocked_x);
            assert!(!report.motion.blocked_z);
        }
        let slid = world.player().feet;
        assert_eq!(slid.x, halted.x);
        let expected_z = 10.0 * 0.09 / 2f32.sqrt();
        assert!((slid.z - expected_z).abs() < 1e-3, "z = {}", slid.z);
    }

    #[test]
    fn jump_only_when_grounded() {
        let mut world = flat_world(0.0);
        world.teleport(Vec3::ZERO);
        world.step(&FrameInput::default());
        assert!(world.player().is_grounded());

        let jump = FrameInput {
            jump: true,
            ..FrameInput::default()
        };
        let report = world.step(&jump);
        assert!(report.motion.jumped);
        assert_eq!(world.player().velocity_y, 0.28);
        assert_eq!(world.player().state, MotionState::Airborne);

        // Still rising: jump input changes nothing but gravity.
        let before = world.player().velocity_y;
        let report = world.step(&jump);
        assert!(!report.motion.jumped);
        assert!((world.player().velocity_y - (before - 0.012)).abs() < 1e-6);
    }

    #[test]
    fn airborne_jump_has_no_effect() {
        let mut world = flat_world(0.0);
        world.teleport(Vec3::new(0.0, 50.0, 0.0));
        world.step(&FrameInput::default());
        let v0 = world.player().velocity_y;
        world.step(&FrameInput {
            jump: true,
            ..FrameInput::default()
        });
        assert!((world.player().velocity_y - (v0 - 0.012)).abs() < 1e-6);
        assert_eq!(world.player().state, MotionState::Airborne);
    }

    #[test]
    fn standing_on_a_block() {
        let mut world = flat_world(0.0);
        world.place_block(BlockPos::new(0, 0, 0), Material::Dirt);
        world.teleport(Vec3::new(0.5, 4.0, 0.5));
        for _ in 0..120 {
            world.step(&FrameInput::default());
        }
        assert_eq!(world.player().feet.y, 1.0);
        assert!(world.player().is_grounded());
    }

    #[test]
    fn ceiling_stops_jump() {
        let mut world = flat_world(0.0);
        world.place_block(BlockPos::new(0, 3, 0), Material::Stone);
        world.teleport(Vec3::new(0.5, 0.0, 0.5));
        let jump = FrameInput {
            jump: true,
            ..FrameInput::default()
        };
        for _ in 0..30 {
            world.step(&jump);
            let head = world.player().feet.y + 1.75;
            assert!(head <= 3.0 + 1e-4, "head at {head}");
        }
    }

    #[test]
    fn ledge_needs_jump_without_step_height() {
        let mut world = flat_world(0.0);
        world.place_block(BlockPos::new(2, 0, 0), Material::Stone);
        world.teleport(Vec3::new(0.0, 0.0, 0.5));
        let right = holding(MoveIntent {
            right: true,
            ..MoveIntent::default()
        });
        for _ in 0..40 {
            world.step(&right);
        }
        assert!(world.player().feet.x <= 1.65);
        assert_eq!(world.player().feet.y, 0.0);
    }

    #[test]
    fn step_height_climbs_one_block_ledge() {
        let mut config = SimConfig::default();
        config.player.step_height = 1.0;
        let mut world = World::with_terrain(config, FlatTerrain::new(0.0)).unwrap();
        world.place_block(BlockPos::new(2, 0, 0), Material::Stone);
        world.teleport(Vec3::new(0.0, 0.0, 0.5));
        let right = holding(MoveIntent {
            right: true,
            ..MoveIntent::default()
        });

        let mut climbed = false;
        for _ in 0..30 {
            let report = world.step(&right);
            climbed |= report.motion.stepped_up;
        }
        assert!(climbed);
        let feet = world.player().feet;
        assert!(feet.x > 1.65);
        assert_eq!(feet.y, 1.0);
    }

    #[test]
    fn place_on_top_face() {
        let mut world = flat_world(0.0);
        world.place_block(BlockPos::new(0, 5, 0), Material::Grass);
        world.teleport(Vec3::new(0.5, 8.0, 0.5));
        world.set_look(0.0, -1.45);

        match world.pick() {
            Some(PickTarget::Block(hit)) => {
                assert_eq!(hit.pos, BlockPos::new(0, 5, 0));
                assert_eq!(hit.normal, IVec3::Y);
            }
            other => panic!("expected block hit, got {other:?}"),
        }

        let outcome = world.click(ClickAction::Place, Material::Stone);
        assert_eq!(
            outcome,
            ClickOutcome::Placed {
                pos: BlockPos::new(0, 6, 0),
                material: Material::Stone
            }
        );
        assert_eq!(world.blocks().get(BlockPos::new(0, 6, 0)), Some(Material::Stone));
    }

    #[test]
    fn place_then_remove_round_trip() {
        let mut world = flat_world(0.0);
        world.place_block(BlockPos::new(0, 5, 0), Material::Grass);
        world.teleport(Vec3::new(0.5, 8.0, 0.5));
        world.set_look(0.0, -1.45);
        let before = world.blocks().clone();

        world.click(ClickAction::Place, Material::Wood);
        assert_eq!(world.blocks().len(), 2);
        let outcome = world.click(ClickAction::Remove, Material::Wood);
        assert_eq!(
            outcome,
            ClickOutcome::Removed {
                pos: BlockPos::new(0, 6, 0),
                material: Material::Wood
            }
        );
        assert_eq!(world.blocks(), &before);
        assert_eq!(world.blocks().state_hash(), before.state_hash());
    }

    #[test]
    fn place_on_terrain_snaps_to_grid() {
        let mut world = flat_world(3.0);
        world.teleport(Vec3::new(0.5, 5.0, 0.5));
        world.set_look(0.0, -1.0);
        let outcome = world.click(ClickAction::Place, Material::Dirt);
        assert_eq!(
            outcome,
            ClickOutcome::Placed {
                pos: BlockPos::new(0, 4, -2),
                material: Material::Dirt
            }
        );
    }

    #[test]
    fn remove_on_terrain_is_noop() {
        let mut world = flat_world(3.0);
        world.teleport(Vec3::new(0.5, 5.0, 0.5));
        world.set_look(0.0, -1.0);
        assert_eq!(
            world.click(ClickAction::Remove, Material::Dirt),
            ClickOutcome::Ignored
        );
        assert!(world.blocks().is_empty());
    }

    #[test]
    fn click_at_sky_is_noop() {
        let mut world = flat_world(0.0);
        world.teleport(Vec3::new(0.5, 0.0, 0.5));
        world.set_look(0.0, 1.2);
        assert_eq!(
            world.click(ClickAction::Place, Material::Grass),
            ClickOutcome::Missed
        );
        assert!(world.blocks().is_empty());
    }

    #[test]
    fn placement_inside_player_is_blocked() {
        let mut world = flat_world(0.0);
        world.teleport(Vec3::new(0.5, 0.0, 0.5));
        assert!(!world.place_block(BlockPos::new(0, 1, 0), Material::Stone));
        assert!(world.blocks().is_empty());
    }

    #[test]
    fn clicks_in_snapshot_are_applied() {
        let mut world = flat_world(3.0);
        world.teleport(Vec3::new(0.5, 3.0, 0.5));
        let input = FrameInput {
            pitch: -1.0,
            material: Material::Leaf,
            clicks: vec![ClickAction::Place],
            ..FrameInput::default()
        };
        let report = world.step(&input);
        assert_eq!(report.tick, 1);
        assert!(matches!(
            report.clicks.as_slice(),
            [ClickOutcome::Placed {
                material: Material::Leaf,
                ..
            }]
        ));
        assert_eq!(world.blocks().len(), 1);
    }

    #[test]
    fn same_inputs_same_state() {
        let run = |seed: u64| {
            let mut world = World::new(SimConfig::default()).unwrap();
            let mut rng = seed;
            for _ in 0..500 {
                world.step(&scripted_input(&mut rng));
            }
            world.state_hash()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn look_pitch_clamped() {
        let mut world = flat_world(0.0);
        world.set_look(0.5, -3.0);
        assert_eq!(world.look(), (0.5, -1.45));
        world.set_look(0.0, 3.0);
        assert_eq!(world.look().1, LookState::default().pitch_limit);
    }

    #[test]
    fn placement_reads_height_at_snapped_column() {
        let mut world = World::with_terrain(SimConfig::default(), Slope).unwrap();
        world.teleport(Vec3::new(0.5, 5.0, 0.5));
        world.set_look(-std::f32::consts::FRAC_PI_2, -0.6);

        let Some(PickTarget::Terrain(hit)) = world.pick() else {
            panic!("expected a terrain hit");
        };
        let column = hit.x.floor();
        // The snapped column sits downhill of the hit point, so its floored
        // height differs from the height under the hit.
        assert_ne!(
            Slope.height_at(column, 0.0).floor(),
            Slope.height_at(hit.x, hit.z).floor()
        );
        let expected = BlockPos::new(
            column as i32,
            Slope.height_at(column, hit.z.floor()).floor() as i32 + 1,
            hit.z.floor() as i32,
        );
        assert_eq!(
            world.click(ClickAction::Place, Material::Stone),
            ClickOutcome::Placed {
                pos: expected,
                material: Material::Stone
            }
        );
    }

    #[test]
    fn far_away_player_steps_without_overflow() {
        let mut world = flat_world(0.0);
        world.place_block(BlockPos::new(0, 0, -3), Material::Stone);
        world.teleport(Vec3::new(-3.0e9, 0.0, 0.5));
        let report = world.step(&holding(MoveIntent {
            right: true,
            ..MoveIntent::default()
        }));
        assert_eq!(report.tick, 1);
        assert_eq!(world.player().feet.y, 0.0);
    }

    #[test]
    fn ceiling_holds_player_while_jump_held_then_releases() {
        let mut world = flat_world(0.0);
        // Bottom face 0.25 above the standing player's head.
        world.place_block(BlockPos::new(0, 2, 0), Material::Stone);
        world.teleport(Vec3::new(0.5, 0.0, 0.5));
        let jump = FrameInput {
            jump: true,
            ..FrameInput::default()
        };
        world.step(&jump);
        for _ in 0..7 {
            world.step(&jump);
            assert_eq!(world.player().feet.y, 0.25);
            assert_eq!(world.player().velocity_y, 0.28);
        }

        for _ in 0..60 {
            world.step(&FrameInput::default());
        }
        assert_eq!(world.player().feet.y, 0.0);
        assert!(world.player().is_grounded());
    }
}
