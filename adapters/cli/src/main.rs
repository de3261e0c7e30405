#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that boots the Holdfast simulation core and
//! drives it tick by tick without any rendering backend. This adapter is the
//! minimal host that supplies `TickInput` and consumes the renderer-facing
//! query surface in `holdfast_world::query`.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use holdfast_core::{Command, Config, Event, MaterialKind, TickInput, WorldConfig};
use holdfast_system_waves::WavePhase;
use holdfast_world::World;

/// Default number of ticks to simulate when `--ticks` is not given (10
/// minutes at the default 60Hz step).
const DEFAULT_TICKS: u64 = 36_000;
/// Default simulated step duration in milliseconds (60Hz).
const DEFAULT_DT_MILLIS: u64 = 16;
/// Default number of ticks between status lines.
const DEFAULT_STATUS_INTERVAL: u64 = 300;
/// Ticks between autopilot patrol direction changes.
const PATROL_LEG_TICKS: u64 = 180;
/// Ticks between autopilot jump attempts.
const JUMP_EVERY_TICKS: u64 = 240;
/// Columns wide the ASCII minimap is sampled down to.
const MINIMAP_COLUMNS: u32 = 72;
/// Rows tall the ASCII minimap is sampled down to.
const MINIMAP_ROWS: u32 = 24;

/// Command-line arguments for running the Holdfast simulation headlessly.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Path to a TOML configuration file; unset fields fall back to
    /// built-in defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the configured grid width in columns.
    #[arg(long, value_name = "COLUMNS", value_parser = clap::value_parser!(u32).range(20..))]
    width: Option<u32>,
    /// Overrides the configured grid height in rows.
    #[arg(long, value_name = "ROWS", value_parser = clap::value_parser!(u32).range(20..))]
    height: Option<u32>,
    /// Overrides the configured base RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Number of ticks to simulate before exiting.
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_TICKS)]
    ticks: u64,
    /// Simulated milliseconds advanced per tick.
    #[arg(long = "dt-ms", value_name = "MILLISECONDS", default_value_t = DEFAULT_DT_MILLIS, value_parser = clap::value_parser!(u64).range(1..=1000))]
    dt_millis: u64,
    /// Ticks between printed status lines. Zero disables periodic status.
    #[arg(long = "status-interval", value_name = "TICKS", default_value_t = DEFAULT_STATUS_INTERVAL)]
    status_interval: u64,
    /// Whether the autopilot patrols the player left/right (keeps the
    /// simulation's physics/AI/collision systems exercised without a human
    /// at the keyboard).
    #[arg(long = "autopilot", value_enum, default_value_t = Toggle::On)]
    autopilot: Toggle,
    /// Whether to print an ASCII minimap alongside each status line.
    #[arg(long = "minimap", value_enum, default_value_t = Toggle::Off)]
    minimap: Toggle,
    /// Suppresses per-event logging (block destroyed, entity died, portal
    /// damaged, wave phase changes); status lines and the final summary
    /// still print.
    #[arg(long)]
    quiet: bool,
}

/// Generic on/off toggle used by CLI flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Toggle {
    /// Enable the associated behaviour.
    On,
    /// Disable the associated behaviour.
    Off,
}

impl Toggle {
    /// Returns whether the toggle requests the behaviour to be enabled.
    #[must_use]
    const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Entry point for the Holdfast headless command-line runner.
fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path).with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(width) = args.width {
        config.world.width = width;
    }
    if let Some(height) = args.height {
        config.world.height = height;
    }
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }

    let WorldConfig { width, height, seed } = config.world;
    println!("Holdfast simulation core online. grid={width}x{height} seed={seed:#x}");

    let mut world = World::new(config).context("constructing world")?;

    let dt = args.dt_millis as f32 / 1000.0;
    let started_at = Instant::now();
    let mut final_tick = 0u64;
    let mut changes_since_status = 0u64;

    for tick in 0..args.ticks {
        final_tick = tick;
        let input = autopilot_input(tick, dt, args.autopilot.enabled());
        let events = world.tick(input);

        if !args.quiet {
            log_events(&events);
        }
        // Drain the change log every tick the way a renderer would; a
        // headless adapter has nowhere to draw them, so it only tallies them.
        changes_since_status += world.drain_changes().len() as u64;

        let wave_info = world.wave_info();
        if args.status_interval > 0 && tick % args.status_interval == 0 {
            print_status(&world, tick, started_at.elapsed(), changes_since_status);
            changes_since_status = 0;
            if args.minimap.enabled() {
                print_minimap(&world);
            }
        }

        if matches!(wave_info.phase, WavePhase::GameOver | WavePhase::Victory) {
            print_status(&world, tick, started_at.elapsed(), changes_since_status);
            println!(
                "simulation ended at tick {tick}: {}",
                if matches!(wave_info.phase, WavePhase::Victory) { "victory" } else { "game over" }
            );
            return Ok(());
        }
    }

    print_status(&world, final_tick, started_at.elapsed(), changes_since_status);
    println!("simulation reached the requested tick budget ({} ticks)", args.ticks);
    Ok(())
}

/// Derives this tick's `TickInput` from a deterministic patrol script: the
/// player walks right, then left, jumping periodically, so every system
/// (physics, collision, AI separation, aging lighting) stays exercised
/// without a human operator.
fn autopilot_input(tick: u64, dt: f32, autopilot: bool) -> TickInput {
    let mut commands = Vec::new();
    if autopilot {
        let leg = (tick / PATROL_LEG_TICKS) % 2;
        let direction_x = if leg == 0 { 1.0 } else { -1.0 };
        commands.push(Command::MovePlayer { direction_x, direction_y: 0.0 });
        if tick % JUMP_EVERY_TICKS == 0 {
            commands.push(Command::PlayerJump);
        }
    }
    TickInput { commands, delta_seconds: dt }
}

/// Prints one line per event the tick produced.
fn log_events(events: &[Event]) {
    for event in events {
        match *event {
            Event::BlockDestroyed { coord, kind } => println!("  block destroyed at {coord}: {kind:?}"),
            Event::EntityDied { id } => println!("  entity {} died", id.raw()),
            Event::PortalDamaged { remaining_health } => println!("  portal damaged, {remaining_health} hp remaining"),
            Event::PortalDestroyed => println!("  portal destroyed"),
            Event::WavePhaseChanged { wave_index } => println!("  wave phase changed, wave {wave_index}"),
            Event::AllWavesCleared => println!("  all waves cleared"),
        }
    }
}

/// Prints a one-line status summary: tick, wallclock elapsed, wave phase,
/// portal health, live entity count, changed cells since the last status
/// line, and recoverable-error tally.
fn print_status(world: &World, tick: u64, elapsed: std::time::Duration, changes_since_status: u64) {
    let wave_info = world.wave_info();
    let entity_count = world.entities().count();
    let tally = world.recovered_errors();
    println!(
        "tick {tick:>7} | {:.1?} elapsed | phase={:?} | portal={}/{} | entities={entity_count} | changes={changes_since_status} | recovered_errors={}",
        elapsed,
        wave_info.phase,
        wave_info.portal_health,
        wave_info.portal_max_health,
        tally.total(),
    );
}

/// Renders the grid as an ASCII minimap, sampling down to at most
/// `MINIMAP_COLUMNS` x `MINIMAP_ROWS` characters so large grids stay
/// terminal-sized. All rendering decisions live in this adapter; `World`
/// exposes only a read-only query surface.
fn print_minimap(world: &World) {
    let grid = world.grid();
    let sample_columns = MINIMAP_COLUMNS.min(grid.width()).max(1);
    let sample_rows = MINIMAP_ROWS.min(grid.height()).max(1);
    let column_stride = (grid.width() as f32 / sample_columns as f32).max(1.0);
    let row_stride = (grid.height() as f32 / sample_rows as f32).max(1.0);

    let mut line = String::with_capacity(sample_columns as usize);
    for sample_row in 0..sample_rows {
        line.clear();
        let row = ((sample_row as f32) * row_stride) as u32;
        for sample_column in 0..sample_columns {
            let column = ((sample_column as f32) * column_stride) as u32;
            let glyph = grid
                .get(holdfast_core::Coord::new(column, row))
                .map_or('?', cell_glyph);
            line.push(glyph);
        }
        println!("{line}");
    }
}

/// Maps a cell to a single display glyph for the ASCII minimap.
fn cell_glyph(cell: &holdfast_core::Cell) -> char {
    if cell.is_air() {
        return ' ';
    }
    match cell.kind() {
        None => '~', // Water
        Some(MaterialKind::Sand) => '.',
        Some(MaterialKind::Dirt) => ':',
        Some(MaterialKind::Vegetation) => '"',
        Some(MaterialKind::Stone) => '#',
        Some(MaterialKind::Rock) => '%',
        Some(MaterialKind::Gravel) => ',',
        Some(MaterialKind::Wood) => '|',
        Some(MaterialKind::Metal) => 'M',
        Some(MaterialKind::Bone) => 'b',
        Some(MaterialKind::Rope) => 'r',
        Some(MaterialKind::Diamond) => '*',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autopilot_alternates_patrol_direction() {
        let first_leg = autopilot_input(0, 0.016, true);
        let second_leg = autopilot_input(PATROL_LEG_TICKS, 0.016, true);
        let Some(Command::MovePlayer { direction_x: first, .. }) = first_leg.commands.first().copied() else {
            panic!("expected a MovePlayer command");
        };
        let Some(Command::MovePlayer { direction_x: second, .. }) = second_leg.commands.first().copied() else {
            panic!("expected a MovePlayer command");
        };
        assert_ne!(first, second);
    }

    #[test]
    fn autopilot_disabled_issues_no_commands() {
        let input = autopilot_input(0, 0.016, false);
        assert!(input.commands.is_empty());
    }

    #[test]
    fn toggle_enabled_matches_on_variant() {
        assert!(Toggle::On.enabled());
        assert!(!Toggle::Off.enabled());
    }
}
