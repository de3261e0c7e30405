//! Integration tests exercising `World` through its public API only,
//! covering determinism and wave-progression acceptance scenarios.

use holdfast_core::{Command, Config, TickInput, WaveConfig, WorldConfig};
use holdfast_system_waves::WavePhase;
use holdfast_world::World;

fn test_config() -> Config {
    Config {
        world: WorldConfig {
            width: 60,
            height: 50,
            seed: 42,
        },
        waves: WaveConfig {
            wave_start_delay_seconds: 1.0,
            warp_phase_duration_seconds: 0.5,
            sub_waves_per_wave: 2,
            sub_wave_interval_seconds: 1.0,
            total_waves: 2,
            ..WaveConfig::default()
        },
        ..Config::default()
    }
}

fn run_n_ticks(world: &mut World, ticks: u32, dt: f32) {
    for _ in 0..ticks {
        let _ = world.tick(TickInput {
            commands: Vec::new(),
            delta_seconds: dt,
        });
    }
}

/// Two worlds built from the same config and driven by the same input
/// sequence must reach identical grids and wave phases.
#[test]
fn same_seed_and_input_sequence_produces_identical_worlds() {
    let mut world_a = World::new(test_config()).unwrap();
    let mut world_b = World::new(test_config()).unwrap();

    run_n_ticks(&mut world_a, 200, 0.1);
    run_n_ticks(&mut world_b, 200, 0.1);

    assert_eq!(world_a.wave_info(), world_b.wave_info());

    let grid_a = world_a.grid();
    let grid_b = world_b.grid();
    for (coord, cell_a) in grid_a.iter() {
        let cell_b = grid_b.get(coord).unwrap();
        assert_eq!(cell_a.kind(), cell_b.kind());
    }
}

/// S6 (wave progression): with a short intermission and warp duration, the
/// scheduler should reach `Active` for wave 1 and eventually advance past
/// it within a generous number of ticks.
#[test]
fn scheduler_progresses_from_pregame_into_an_active_wave() {
    let mut world = World::new(test_config()).unwrap();
    assert_eq!(world.wave_info().phase, WavePhase::PreGame);

    run_n_ticks(&mut world, 50, 0.1);

    let phase = world.wave_info().phase;
    assert!(
        matches!(phase, WavePhase::Active { wave_index: 1, .. } | WavePhase::Warp { .. } | WavePhase::Intermission { .. }),
        "unexpected phase after warm-up: {phase:?}"
    );
}

/// Mining and placing a block round-trips through the public command API
/// and is reflected in the drained change log.
#[test]
fn place_then_mine_round_trips_through_the_change_log() {
    let mut world = World::new(test_config()).unwrap();
    let coord = holdfast_core::Coord::new(30, 20);

    // Seed the player's inventory by mining an existing block first.
    let mine_events = world.apply(Command::MineBlock { coord, damage: 1_000 });
    assert!(!mine_events.is_empty());
    let _ = world.drain_changes();

    let material = holdfast_core::MaterialKind::Dirt;
    if world.player_inventory_count(material) > 0 {
        let place_coord = holdfast_core::Coord::new(31, 20);
        let _ = world.apply(Command::PlaceBlock {
            coord: place_coord,
            material,
        });
        let changes = world.drain_changes();
        assert!(changes.iter().any(|c| c.coord == place_coord));
    }
}
