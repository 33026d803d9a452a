use blockcraft_common::{BlockPos, Material};
use blockcraft_kernel::{MotionState, PickTarget, World};
use blockcraft_terrain::Terrain;
use glam::Vec3;
use serde::Serialize;

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging and
/// development UI.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary<T: Terrain>(world: &World<T>) -> WorldSummary {
        let player = world.player();
        WorldSummary {
            tick: world.tick(),
            feet: player.feet,
            velocity_y: player.velocity_y,
            state: player.state,
            block_count: world.blocks().len(),
            pending_events: world.blocks().events().len(),
            state_hash: world.state_hash(),
        }
    }

    /// Describe whatever the crosshair is on.
    pub fn describe_target<T: Terrain>(world: &World<T>) -> String {
        match world.pick() {
            Some(PickTarget::Block(hit)) => format!(
                "block {} ({}) at {:.2}, face {:?}",
                hit.pos,
                world
                    .blocks()
                    .get(hit.pos)
                    .map_or("?", Material::name),
                hit.distance,
                hit.normal.to_array()
            ),
            Some(PickTarget::Terrain(p)) => {
                format!("terrain at ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z)
            }
            None => "nothing in reach".to_string(),
        }
    }

    /// Placed blocks, in grid order.
    pub fn list_blocks<T: Terrain>(world: &World<T>) -> Vec<(BlockPos, Material)> {
        world.blocks().iter().collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    pub feet: Vec3,
    pub velocity_y: f32,
    pub state: MotionState,
    pub block_count: usize,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} feet=({:.2}, {:.2}, {:.2}) state={:?} blocks={} pending_events={} hash={:016x}",
            self.tick,
            self.feet.x,
            self.feet.y,
            self.feet.z,
            self.state,
            self.block_count,
            self.pending_events,
            self.state_hash
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockcraft_input::FrameInput;
    use blockcraft_kernel::SimConfig;
    use blockcraft_terrain::FlatTerrain;

    fn flat_world() -> World<FlatTerrain> {
        let mut world =
            World::with_terrain(SimConfig::default(), FlatTerrain::new(0.0)).unwrap();
        world.teleport(Vec3::new(0.5, 0.0, 0.5));
        world
    }

    #[test]
    fn summary_fresh_world() {
        let world = flat_world();
        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.block_count, 0);
        assert_eq!(summary.pending_events, 0);
        assert_eq!(summary.state, MotionState::Airborne);
    }

    #[test]
    fn summary_after_steps_and_edits() {
        let mut world = flat_world();
        world.place_block(BlockPos::new(0, 0, -3), Material::Stone);
        world.place_block(BlockPos::new(1, 0, -3), Material::Stone);
        world.remove_block(BlockPos::new(1, 0, -3));
        world.step(&FrameInput::default());

        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.block_count, 1);
        assert_eq!(summary.pending_events, 3);
        assert_eq!(summary.state, MotionState::Grounded);
    }

    #[test]
    fn describe_target_variants() {
        let mut world = flat_world();
        world.set_look(0.0, 1.2);
        assert_eq!(WorldInspector::describe_target(&world), "nothing in reach");

        world.set_look(0.0, -1.0);
        assert!(WorldInspector::describe_target(&world).starts_with("terrain"));

        world.place_block(BlockPos::new(0, 0, -1), Material::Dirt);
        let text = WorldInspector::describe_target(&world);
        assert!(text.contains("dirt"), "{text}");
    }

    #[test]
    fn list_blocks_in_grid_order() {
        let mut world = flat_world();
        world.place_block(BlockPos::new(4, 0, 4), Material::Wood);
        world.place_block(BlockPos::new(-4, 0, 4), Material::Leaf);
        let blocks = WorldInspector::list_blocks(&world);
        assert_eq!(blocks[0].0, BlockPos::new(-4, 0, 4));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn summary_display() {
        let world = flat_world();
        let s = format!("{}", WorldInspector::summary(&world));
        assert!(s.contains("tick=0"));
        assert!(s.contains("blocks=0"));
    }
}
