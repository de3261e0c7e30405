#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The aging cellular automaton: vegetation growth and decay, tree
//! formation, diamond compression, and generic per-kind erosion/infection.
//!
//! Evaluation is two-phase: [`collect_proposals`] reads an immutable
//! snapshot of the grid and produces a list of pending cell replacements,
//! then [`commit_proposals`] applies them all at once. This mirrors the
//! double-buffered front/back grid swap in the pack's cellular-automaton
//! reference (`Francisco-boop-001-Omega-game`'s `CaGrid`): no rule observes
//! another rule's output from the same pass, so results depend only on the
//! RNG draw order, not on row/column scan order.

use holdfast_core::{ChangeLog, Coord, DeterministicRng, Grid, MaterialKind, Portal, RecoveredErrorTally};
use holdfast_core::{AgingConfig, Cell};

/// A single proposed cell replacement, collected against the pre-pass
/// snapshot.
#[derive(Clone, Copy, Debug)]
struct Proposal {
    coord: Coord,
    replacement: Cell,
}

/// Runs one aging pass over the whole grid, skipping any coordinate inside
/// `portal`'s safety region, and records every committed transition in
/// `change_log`.
pub fn run_pass(
    grid: &mut Grid,
    portal: &Portal,
    rng: &mut DeterministicRng,
    config: &AgingConfig,
    change_log: &mut ChangeLog,
    tally: &mut RecoveredErrorTally,
) {
    let proposals = collect_proposals(grid, portal, rng, config);
    commit_proposals(grid, proposals, change_log, tally);
}

fn collect_proposals(grid: &Grid, portal: &Portal, rng: &mut DeterministicRng, config: &AgingConfig) -> Vec<Proposal> {
    let mut proposals = Vec::new();
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let coord = Coord::new(col, row);
            if portal.contains_in_safety_region(coord) {
                continue;
            }
            let Some(cell) = grid.get(coord) else { continue };
            let new_proposals = evaluate_cell(grid, coord, *cell, rng, config, &proposals);
            proposals.extend(new_proposals);
        }
    }
    proposals
}

fn commit_proposals(grid: &mut Grid, proposals: Vec<Proposal>, change_log: &mut ChangeLog, tally: &mut RecoveredErrorTally) {
    for proposal in proposals {
        let old_kind = grid.get(proposal.coord).and_then(Cell::kind);
        grid.set(proposal.coord, proposal.replacement, tally);
        let new_kind = proposal.replacement.kind();
        change_log.record(proposal.coord, old_kind, new_kind);
    }
}

fn evaluate_cell(
    grid: &Grid,
    coord: Coord,
    cell: Cell,
    rng: &mut DeterministicRng,
    config: &AgingConfig,
    proposals: &[Proposal],
) -> Vec<Proposal> {
    let Some(kind) = cell.kind() else { return Vec::new() };

    if is_homogeneous_inert_block(grid, coord, kind) {
        return Vec::new();
    }

    match kind {
        MaterialKind::Dirt => evaluate_dirt(grid, coord, cell, rng, config).into_iter().collect(),
        MaterialKind::Vegetation => evaluate_vegetation(grid, coord, cell, rng, config, proposals),
        MaterialKind::Stone => evaluate_stone(grid, coord, rng, config).into_iter().collect(),
        _ => evaluate_generic_rule(grid, coord, kind, rng, config).into_iter().collect(),
    }
}

/// Whether every one of `coord`'s eight Moore neighbors is present and holds
/// a block of `kind`. An out-of-bounds or differently-kinded neighbor always
/// breaks homogeneity, so edge and corner cells of a uniform block are never
/// treated as interior.
fn is_homogeneous(grid: &Grid, coord: Coord, kind: MaterialKind) -> bool {
    coord.moore_neighbors().into_iter().all(|neighbor| match neighbor {
        None => false,
        Some(n) => grid.get(n).and_then(Cell::kind) == Some(kind),
    })
}

/// Skips rule evaluation for interior cells of a uniform block of a kind
/// that never ages (Rock/Metal/Bone/Gravel). A pure performance
/// optimization: it never changes which cells are proposed, since those
/// kinds have no rules of their own (beyond the generic table, which still
/// runs for non-homogeneous border cells).
fn is_homogeneous_inert_block(grid: &Grid, coord: Coord, kind: MaterialKind) -> bool {
    matches!(kind, MaterialKind::Rock | MaterialKind::Metal | MaterialKind::Bone | MaterialKind::Gravel)
        && is_homogeneous(grid, coord, kind)
}

/// Lit dirt occasionally seeds vegetation in the open air cell directly
/// above it.
fn evaluate_dirt(grid: &Grid, coord: Coord, cell: Cell, rng: &mut DeterministicRng, config: &AgingConfig) -> Option<Proposal> {
    if !cell.is_lit() {
        return None;
    }
    let above = coord.offset(0, -1)?;
    let above_cell = grid.get(above)?;
    if !above_cell.is_air() {
        return None;
    }
    if !rng.chance(config.p_dirt_grows_vegetation) {
        return None;
    }
    Some(Proposal {
        coord: above,
        replacement: Cell::new_material(MaterialKind::Vegetation, false),
    })
}

/// Unlit vegetation decays every pass, splitting to air or dirt. Lit
/// vegetation instead attempts tree formation.
fn evaluate_vegetation(
    grid: &Grid,
    coord: Coord,
    cell: Cell,
    rng: &mut DeterministicRng,
    config: &AgingConfig,
    proposals: &[Proposal],
) -> Vec<Proposal> {
    if !cell.is_lit() {
        let to_air = rng.chance(config.unlit_vegetation_decay_fraction_to_air);
        let replacement = if to_air {
            Cell::Air
        } else {
            Cell::new_material(MaterialKind::Dirt, false)
        };
        return vec![Proposal { coord, replacement }];
    }

    try_form_tree(grid, coord, rng, config, proposals)
}

/// Attempts the tree-formation pattern transform: a vegetation cell fully
/// surrounded by vegetation (the homogeneity gate), with a qualifying dirt
/// anchor below it and no other tree too close, forms a trunk running from
/// `coord` down to the anchor (all become `Wood`) and clears the two cells
/// immediately left and right of `coord` to `Air`.
fn try_form_tree(
    grid: &Grid,
    coord: Coord,
    rng: &mut DeterministicRng,
    config: &AgingConfig,
    proposals: &[Proposal],
) -> Vec<Proposal> {
    if !is_homogeneous(grid, coord, MaterialKind::Vegetation) {
        return Vec::new();
    }
    if tree_exists_within(grid, coord, config.min_tree_spacing_radius, proposals) {
        return Vec::new();
    }
    let Some(anchor) = find_dirt_below(grid, coord, config.max_tree_scan_depth) else {
        return Vec::new();
    };
    if !rng.chance(config.prob_vegetation_to_wood_surrounded) {
        return Vec::new();
    }

    let mut proposed = Vec::new();
    let mut cursor = coord;
    loop {
        proposed.push(Proposal {
            coord: cursor,
            replacement: Cell::new_material(MaterialKind::Wood, false),
        });
        if cursor == anchor {
            break;
        }
        match cursor.offset(0, 1) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    if let Some(left) = coord.offset(-1, 0) {
        proposed.push(Proposal { coord: left, replacement: Cell::Air });
    }
    if let Some(right) = coord.offset(1, 0) {
        proposed.push(Proposal { coord: right, replacement: Cell::Air });
    }
    proposed
}

/// Sums the presence of `kind` on the outer ring shells at Chebyshev radius
/// 3/5/7, weighted so nearer rings dominate; only the outer shell of each
/// ring is walked, never the interior.
fn ring_weighted_influence(grid: &Grid, coord: Coord, kind: MaterialKind, config: &AgingConfig) -> f32 {
    let mut total = 0.0;
    for (radius, weight) in [
        (3, config.ring_weight_radius_3),
        (5, config.ring_weight_radius_5),
        (7, config.ring_weight_radius_7),
    ] {
        let shell = coord.ring_shell(radius);
        if shell.is_empty() {
            continue;
        }
        let matching = shell.iter().filter(|&&c| grid.get(c).and_then(Cell::kind) == Some(kind)).count();
        total += weight * (matching as f32 / shell.len() as f32);
    }
    total
}

/// Whether a `Wood` cell already exists within Chebyshev `radius` of
/// `coord`, checking both the committed grid and every proposal already
/// collected earlier in this same pass (so two tree sites can't form closer
/// than `radius` apart just because neither has been committed yet).
fn tree_exists_within(grid: &Grid, coord: Coord, radius: u32, proposals: &[Proposal]) -> bool {
    let radius = i64::from(radius);
    for dc in -radius..=radius {
        for dr in -radius..=radius {
            let Some(candidate) = coord.offset(dc, dr) else { continue };
            if grid.get(candidate).and_then(Cell::kind) == Some(MaterialKind::Wood) {
                return true;
            }
            let proposed_wood = proposals
                .iter()
                .any(|p| p.coord == candidate && p.replacement.kind() == Some(MaterialKind::Wood));
            if proposed_wood {
                return true;
            }
        }
    }
    false
}

fn find_dirt_below(grid: &Grid, coord: Coord, max_depth: u32) -> Option<Coord> {
    let mut cursor = coord.offset(0, 1);
    for _ in 0..max_depth {
        let here = cursor?;
        if grid.get(here).and_then(Cell::kind) == Some(MaterialKind::Dirt) {
            return Some(here);
        }
        cursor = here.offset(0, 1);
    }
    None
}

/// Stone cells whose entire Moore neighborhood is also stone (the
/// homogeneity gate) occasionally compress into diamond.
fn evaluate_stone(grid: &Grid, coord: Coord, rng: &mut DeterministicRng, config: &AgingConfig) -> Option<Proposal> {
    if !is_homogeneous(grid, coord, MaterialKind::Stone) {
        return None;
    }
    if !rng.chance(config.p_diamond_formation) {
        return None;
    }
    Some(Proposal {
        coord,
        replacement: Cell::new_material(MaterialKind::Diamond, false),
    })
}

/// Evaluates `kind` against the generic rule table: if a rule for `kind`
/// exists and ring-weighted presence of its `influence_kind` is nonzero,
/// rolls `base_probability` scaled by that influence fraction, replacing the
/// cell with `target` on success.
fn evaluate_generic_rule(grid: &Grid, coord: Coord, kind: MaterialKind, rng: &mut DeterministicRng, config: &AgingConfig) -> Option<Proposal> {
    let rule = config.rules.iter().find(|rule| rule.source == kind)?;
    let influence = ring_weighted_influence(grid, coord, rule.influence_kind, config);
    if influence <= 0.0 {
        return None;
    }
    if !rng.chance(rule.base_probability() * f64::from(influence.min(1.0))) {
        return None;
    }
    Some(Proposal {
        coord,
        replacement: Cell::new_material(rule.target, false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdfast_core::{Aabb, RecoveredErrorTally};

    fn no_safety_portal() -> Portal {
        Portal::new(Coord::new(0, 0), Aabb::new(0.0, 0.0, 1.0, 1.0), 0, 1)
    }

    #[test]
    fn safety_region_cells_are_never_touched() {
        let mut grid = Grid::new(10, 10);
        let mut tally = RecoveredErrorTally::default();
        let mut cell = Cell::new_material(MaterialKind::Dirt, false);
        cell.accumulate_light(1.0, 0.0);
        grid.set(Coord::new(5, 5), cell, &mut tally);
        grid.set(Coord::new(5, 4), Cell::Air, &mut tally);
        let portal = Portal::new(Coord::new(5, 5), Aabb::new(4.0, 4.0, 1.0, 1.0), 2, 100);
        let mut rng = DeterministicRng::new(1, "aging");
        let mut log = ChangeLog::new();
        // Force the RNG to always succeed so the only reason nothing
        // changes is the safety-region skip.
        let config = AgingConfig {
            p_dirt_grows_vegetation: 1.0,
            ..AgingConfig::default()
        };
        run_pass(&mut grid, &portal, &mut rng, &config, &mut log, &mut tally);
        assert!(grid.get(Coord::new(5, 4)).unwrap().is_air());
    }

    #[test]
    fn lit_dirt_can_grow_vegetation_above_it() {
        let mut grid = Grid::new(10, 10);
        let mut tally = RecoveredErrorTally::default();
        let mut cell = Cell::new_material(MaterialKind::Dirt, false);
        cell.accumulate_light(1.0, 0.0);
        grid.set(Coord::new(5, 5), cell, &mut tally);
        grid.set(Coord::new(5, 4), Cell::Air, &mut tally);
        let portal = no_safety_portal();
        let mut rng = DeterministicRng::new(1, "aging");
        let mut log = ChangeLog::new();
        let config = AgingConfig {
            p_dirt_grows_vegetation: 1.0,
            ..AgingConfig::default()
        };
        run_pass(&mut grid, &portal, &mut rng, &config, &mut log, &mut tally);
        assert_eq!(grid.get(Coord::new(5, 4)).unwrap().kind(), Some(MaterialKind::Vegetation));
    }

    #[test]
    fn unlit_vegetation_always_decays() {
        let mut grid = Grid::new(10, 10);
        let mut tally = RecoveredErrorTally::default();
        grid.set(Coord::new(5, 5), Cell::new_material(MaterialKind::Vegetation, false), &mut tally);
        let portal = no_safety_portal();
        let mut rng = DeterministicRng::new(1, "aging");
        let mut log = ChangeLog::new();
        let config = AgingConfig::default();
        run_pass(&mut grid, &portal, &mut rng, &config, &mut log, &mut tally);
        let after = grid.get(Coord::new(5, 5)).unwrap();
        assert!(after.is_air() || after.kind() == Some(MaterialKind::Dirt));
    }

    #[test]
    fn enclosed_stone_compresses_to_diamond_and_border_is_untouched() {
        let mut grid = Grid::new(5, 5);
        let mut tally = RecoveredErrorTally::default();
        for row in 0..5 {
            for col in 0..5 {
                grid.set(Coord::new(col, row), Cell::new_material(MaterialKind::Stone, false), &mut tally);
            }
        }
        let portal = no_safety_portal();
        let mut rng = DeterministicRng::new(1, "aging");
        let mut log = ChangeLog::new();
        let config = AgingConfig {
            p_diamond_formation: 1.0,
            ..AgingConfig::default()
        };
        run_pass(&mut grid, &portal, &mut rng, &config, &mut log, &mut tally);

        let center = grid.get(Coord::new(2, 2)).unwrap();
        assert_eq!(center.kind(), Some(MaterialKind::Diamond));

        for row in 0..5 {
            for col in 0..5 {
                if (col, row) == (2, 2) {
                    continue;
                }
                let coord = Coord::new(col, row);
                assert_eq!(
                    grid.get(coord).unwrap().kind(),
                    Some(MaterialKind::Stone),
                    "border cell {coord} should be untouched, every one of its Moore neighbors isn't in-bounds Stone"
                );
            }
        }
    }

    #[test]
    fn surrounded_vegetation_forms_a_tree_trunk_and_clears_flanks() {
        let mut grid = Grid::new(9, 9);
        let mut tally = RecoveredErrorTally::default();
        let center = Coord::new(4, 4);
        for dc in -1..=1 {
            for dr in -1..=1 {
                let coord = center.offset(dc, dr).unwrap();
                let mut cell = Cell::new_material(MaterialKind::Vegetation, false);
                cell.accumulate_light(1.0, 0.0);
                grid.set(coord, cell, &mut tally);
            }
        }
        grid.set(Coord::new(4, 7), Cell::new_material(MaterialKind::Dirt, false), &mut tally);
        let portal = no_safety_portal();
        let mut rng = DeterministicRng::new(1, "aging");
        let mut log = ChangeLog::new();
        let config = AgingConfig {
            prob_vegetation_to_wood_surrounded: 1.0,
            min_tree_spacing_radius: 1,
            ..AgingConfig::default()
        };
        run_pass(&mut grid, &portal, &mut rng, &config, &mut log, &mut tally);

        assert_eq!(grid.get(center).unwrap().kind(), Some(MaterialKind::Wood));
        assert_eq!(grid.get(Coord::new(4, 5)).unwrap().kind(), Some(MaterialKind::Wood));
        assert_eq!(grid.get(Coord::new(4, 6)).unwrap().kind(), Some(MaterialKind::Wood));
        assert_eq!(grid.get(Coord::new(4, 7)).unwrap().kind(), Some(MaterialKind::Wood));
        assert!(grid.get(Coord::new(3, 4)).unwrap().is_air());
        assert!(grid.get(Coord::new(5, 4)).unwrap().is_air());
    }

    #[test]
    fn same_seed_produces_identical_pass_results() {
        let mut grid_a = Grid::new(8, 8);
        let mut grid_b = Grid::new(8, 8);
        let mut tally_a = RecoveredErrorTally::default();
        let mut tally_b = RecoveredErrorTally::default();
        for row in 0..8 {
            for col in 0..8 {
                grid_a.set(Coord::new(col, row), Cell::new_material(MaterialKind::Dirt, false), &mut tally_a);
                grid_b.set(Coord::new(col, row), Cell::new_material(MaterialKind::Dirt, false), &mut tally_b);
            }
        }
        let portal = no_safety_portal();
        let config = AgingConfig::default();
        let mut rng_a = DeterministicRng::new(123, "aging");
        let mut rng_b = DeterministicRng::new(123, "aging");
        let mut log_a = ChangeLog::new();
        let mut log_b = ChangeLog::new();
        run_pass(&mut grid_a, &portal, &mut rng_a, &config, &mut log_a, &mut tally_a);
        run_pass(&mut grid_b, &portal, &mut rng_b, &config, &mut log_b, &mut tally_b);
        for row in 0..8 {
            for col in 0..8 {
                let coord = Coord::new(col, row);
                assert_eq!(grid_a.get(coord).unwrap().kind(), grid_b.get(coord).unwrap().kind());
            }
        }
    }
}
