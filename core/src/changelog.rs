//! Per-tick record of cell-kind transitions.

use std::collections::BTreeMap;

use crate::coord::Coord;
use crate::material::MaterialKind;

/// A single cell's kind transition within a tick.
///
/// `old_kind`/`new_kind` are `None` for `Air`/`Water`, matching `Cell::kind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Where the change happened.
    pub coord: Coord,
    /// The kind before the change.
    pub old_kind: Option<MaterialKind>,
    /// The kind after the change.
    pub new_kind: Option<MaterialKind>,
}

/// Deduplicated, coordinate-keyed log of cell-kind transitions produced
/// during a tick.
///
/// Keyed by [`Coord`] so repeated writes to the same cell within one tick
/// collapse to a single record comparing the tick's starting kind against
/// its final kind.
#[derive(Clone, Debug, Default)]
pub struct ChangeLog {
    entries: BTreeMap<Coord, (Option<MaterialKind>, Option<MaterialKind>)>,
}

impl ChangeLog {
    /// Creates an empty change log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a transition at `coord`. If `coord` already has an entry this
    /// tick, only `new_kind` is updated, so the entry always compares the
    /// tick's first-seen `old_kind` to the latest `new_kind`.
    pub fn record(&mut self, coord: Coord, old_kind: Option<MaterialKind>, new_kind: Option<MaterialKind>) {
        self.entries
            .entry(coord)
            .and_modify(|(_, latest)| *latest = new_kind)
            .or_insert((old_kind, new_kind));
    }

    /// Drains every entry whose `old_kind` differs from its final
    /// `new_kind`, sorted by row descending so a renderer can apply
    /// gravity-sensitive visuals top-down-safe.
    pub fn drain_sorted_by_row_descending(&mut self) -> Vec<ChangeRecord> {
        let mut records: Vec<ChangeRecord> = self
            .entries
            .iter()
            .filter(|(_, (old, new))| old != new)
            .map(|(&coord, &(old_kind, new_kind))| ChangeRecord {
                coord,
                old_kind,
                new_kind,
            })
            .collect();
        records.sort_by(|a, b| b.coord.row().cmp(&a.coord.row()).then(a.coord.column().cmp(&b.coord.column())));
        self.entries.clear();
        records
    }

    /// Whether any transition has been recorded since the last drain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|(old, new)| old == new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_writes_to_same_cell_collapse_to_one_entry() {
        let mut log = ChangeLog::new();
        let coord = Coord::new(0, 0);
        log.record(coord, Some(MaterialKind::Dirt), Some(MaterialKind::Sand));
        log.record(coord, Some(MaterialKind::Sand), Some(MaterialKind::Stone));
        let drained = log.drain_sorted_by_row_descending();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].old_kind, Some(MaterialKind::Dirt));
        assert_eq!(drained[0].new_kind, Some(MaterialKind::Stone));
    }

    #[test]
    fn net_no_op_transition_is_dropped() {
        let mut log = ChangeLog::new();
        let coord = Coord::new(0, 0);
        log.record(coord, Some(MaterialKind::Dirt), Some(MaterialKind::Sand));
        log.record(coord, Some(MaterialKind::Sand), Some(MaterialKind::Dirt));
        assert!(log.drain_sorted_by_row_descending().is_empty());
    }

    #[test]
    fn drain_sorts_by_row_descending() {
        let mut log = ChangeLog::new();
        log.record(Coord::new(0, 1), None, Some(MaterialKind::Sand));
        log.record(Coord::new(0, 5), None, Some(MaterialKind::Sand));
        log.record(Coord::new(0, 3), None, Some(MaterialKind::Sand));
        let drained = log.drain_sorted_by_row_descending();
        let rows: Vec<u32> = drained.iter().map(|r| r.coord.row()).collect();
        assert_eq!(rows, vec![5, 3, 1]);
    }

    #[test]
    fn drain_clears_the_log() {
        let mut log = ChangeLog::new();
        log.record(Coord::new(0, 0), None, Some(MaterialKind::Sand));
        let _ = log.drain_sorted_by_row_descending();
        assert!(log.is_empty());
    }
}
