#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Swept AABB-vs-grid collision resolution.
//!
//! Resolves one axis at a time (a separating-axis sweep), with a two-tier
//! step-up allowance so entities can climb low ledges without jumping, and
//! treats non-finite displacement as an input error rather than corrupting
//! position state.

use glam::Vec2;

use holdfast_core::{Aabb, Coord, Grid, PhysicsConfig, RecoveredErrorTally, SimError};

/// Outcome of resolving one tick's worth of movement against the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionResolution {
    /// The AABB's resolved top-left position after sweeping.
    pub position: Vec2,
    /// Velocity after zeroing any axis that struck a solid cell.
    pub velocity: Vec2,
    /// Whether the entity is resting on solid ground this tick.
    pub grounded: bool,
    /// Whether the entity's center cell is water.
    pub submerged: bool,
}

/// Sweeps `aabb` by `displacement` against `grid`, resolving collisions one
/// axis at a time and applying step-up tiers on the horizontal axis.
///
/// Returns [`SimError::InvalidInputState`] if `displacement` or the AABB's
/// position carries a non-finite component, rather than silently producing
/// a corrupted position.
pub fn resolve_movement(
    grid: &Grid,
    aabb: Aabb,
    velocity: Vec2,
    displacement: Vec2,
    config: &PhysicsConfig,
    tally: &mut RecoveredErrorTally,
) -> Result<CollisionResolution, SimError> {
    if !displacement.is_finite() || !aabb.x.is_finite() || !aabb.y.is_finite() {
        tally.record_invalid_input_state();
        return Err(SimError::InvalidInputState(
            "non-finite displacement or position passed to collision resolution".to_string(),
        ));
    }

    let mut position = Vec2::new(aabb.x, aabb.y);
    let mut velocity = velocity;

    let (new_x, x_outcome) = sweep_axis_x(grid, aabb, displacement.x, config);
    position.x = new_x;
    match x_outcome {
        XAxisOutcome::Clear => {}
        XAxisOutcome::SteppedUp { lift, tier } => {
            position.y -= lift;
            if tier == StepTier::Tier2 {
                velocity.x *= config.step_tier2_horizontal_friction;
            }
        }
        XAxisOutcome::Blocked => velocity.x = 0.0,
    }

    let moved = Aabb::new(position.x, position.y, aabb.width, aabb.height);
    let (new_y, blocked_y, grounded) = sweep_axis_y(grid, moved, displacement.y, config);
    position.y = new_y;
    if blocked_y {
        velocity.y = 0.0;
    }

    let final_aabb = Aabb::new(position.x, position.y, aabb.width, aabb.height);
    let submerged = is_submerged(grid, final_aabb);

    Ok(CollisionResolution {
        position,
        velocity,
        grounded,
        submerged,
    })
}

fn cells_overlapping(aabb: Aabb) -> impl Iterator<Item = (i64, i64)> {
    let left = aabb.x.floor() as i64;
    let right = (aabb.right() - f32::EPSILON).floor() as i64;
    let top = aabb.y.floor() as i64;
    let bottom = (aabb.bottom() - f32::EPSILON).floor() as i64;
    (top..=bottom).flat_map(move |row| (left..=right).map(move |col| (col, row)))
}

fn any_solid_overlap(grid: &Grid, aabb: Aabb) -> bool {
    cells_overlapping(aabb).any(|(col, row)| {
        if col < 0 || row < 0 {
            return true;
        }
        grid.is_solid(Coord::new(col as u32, row as u32))
    })
}

/// Which step-up tier resolved a horizontal move that would otherwise be
/// blocked. Tier 1 is frictionless; tier 2 scales `velocity.x` by
/// `PhysicsConfig::step_tier2_horizontal_friction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepTier {
    Tier1,
    Tier2,
}

/// Outcome of sweeping the horizontal axis.
#[derive(Clone, Copy, Debug, PartialEq)]
enum XAxisOutcome {
    /// The move completed with no obstruction.
    Clear,
    /// The move was completed by stepping up onto a ledge; `lift` is how far
    /// the AABB rose to clear it.
    SteppedUp { lift: f32, tier: StepTier },
    /// The move was blocked outright; `velocity.x` should be zeroed.
    Blocked,
}

fn sweep_axis_x(grid: &Grid, aabb: Aabb, dx: f32, config: &PhysicsConfig) -> (f32, XAxisOutcome) {
    if dx.abs() <= config.collision_epsilon {
        return (aabb.x, XAxisOutcome::Clear);
    }
    let moved = Aabb::new(aabb.x + dx, aabb.y, aabb.width, aabb.height);
    if !any_solid_overlap(grid, moved) {
        return (moved.x, XAxisOutcome::Clear);
    }

    // Step-up: try lifting the AABB by increasing fractions of its own
    // height up to tier2's cap before giving up on the horizontal move.
    let tier1_height = aabb.height * config.step_tier1_max_height_factor;
    let tier2_height = aabb.height * config.step_tier2_max_height_factor;
    for &(lift, tier) in &[(tier1_height, StepTier::Tier1), (tier2_height, StepTier::Tier2)] {
        let lifted = Aabb::new(moved.x, aabb.y - lift, aabb.width, aabb.height);
        if !any_solid_overlap(grid, lifted) {
            return (moved.x, XAxisOutcome::SteppedUp { lift, tier });
        }
    }

    // Blocked: advance up to the cell boundary rather than snapping to the
    // pre-move position, so entities visibly touch the wall.
    let clamped = clamp_to_boundary(aabb.x, dx, |candidate| {
        !any_solid_overlap(grid, Aabb::new(candidate, aabb.y, aabb.width, aabb.height))
    });
    (clamped, XAxisOutcome::Blocked)
}

fn sweep_axis_y(grid: &Grid, aabb: Aabb, dy: f32, config: &PhysicsConfig) -> (f32, bool, bool) {
    if dy.abs() <= config.collision_epsilon {
        let grounded = any_solid_overlap(
            grid,
            Aabb::new(aabb.x, aabb.y + config.collision_epsilon * 2.0, aabb.width, aabb.height),
        );
        return (aabb.y, false, grounded);
    }
    let moved = Aabb::new(aabb.x, aabb.y + dy, aabb.width, aabb.height);
    if !any_solid_overlap(grid, moved) {
        return (moved.y, false, false);
    }
    let clamped = clamp_to_boundary(aabb.y, dy, |candidate| {
        !any_solid_overlap(grid, Aabb::new(aabb.x, candidate, aabb.width, aabb.height))
    });
    let grounded = dy > 0.0;
    (clamped, true, grounded)
}

fn clamp_to_boundary(start: f32, delta: f32, still_clear: impl Fn(f32) -> bool) -> f32 {
    let steps = 16;
    let mut best = start;
    for i in 1..=steps {
        let fraction = i as f32 / steps as f32;
        let candidate = start + delta * fraction;
        if still_clear(candidate) {
            best = candidate;
        } else {
            break;
        }
    }
    best
}

/// Whether the AABB's center cell is water.
#[must_use]
pub fn is_submerged(grid: &Grid, aabb: Aabb) -> bool {
    let center = aabb.center();
    if center.x < 0.0 || center.y < 0.0 {
        return false;
    }
    grid.get(Coord::new(center.x as u32, center.y as u32))
        .is_some_and(holdfast_core::Cell::is_water)
}
