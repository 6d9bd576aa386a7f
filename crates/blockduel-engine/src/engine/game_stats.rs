use serde::{Deserialize, Serialize};

use super::{combat::Actor, placement::PlacementResult};

/// Per-session counters.
///
/// Tracks:
///
/// - **Placements**: accepted drops and rejected drops by reason
/// - **Line clears**: total lines and the largest single clear
/// - **Batches**: shape batches loaded into the tray
/// - **Damage**: total applied to each side, board resets
///
/// # Example
///
/// ```
/// use blockduel_engine::{Actor, GameStats, PlacementResult};
///
/// let mut stats = GameStats::new();
/// stats.record_placement(PlacementResult::Accepted);
/// stats.record_line_clear(2);
/// stats.record_damage(Actor::Enemy, 4);
///
/// assert_eq!(stats.accepted_placements(), 1);
/// assert_eq!(stats.total_cleared_lines(), 2);
/// assert_eq!(stats.damage_to_enemy(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    accepted_placements: usize,
    rejected_count_mismatch: usize,
    rejected_occupied: usize,
    rejected_shape_mismatch: usize,
    total_cleared_lines: usize,
    max_lines_in_one_clear: usize,
    batches_loaded: usize,
    resets: usize,
    damage_to_player: i64,
    damage_to_enemy: i64,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accepted_placements: 0,
            rejected_count_mismatch: 0,
            rejected_occupied: 0,
            rejected_shape_mismatch: 0,
            total_cleared_lines: 0,
            max_lines_in_one_clear: 0,
            batches_loaded: 0,
            resets: 0,
            damage_to_player: 0,
            damage_to_enemy: 0,
        }
    }

    #[must_use]
    pub const fn accepted_placements(&self) -> usize {
        self.accepted_placements
    }

    #[must_use]
    pub const fn rejected_placements(&self) -> usize {
        self.rejected_count_mismatch + self.rejected_occupied + self.rejected_shape_mismatch
    }

    #[must_use]
    pub const fn rejected_count_mismatch(&self) -> usize {
        self.rejected_count_mismatch
    }

    #[must_use]
    pub const fn rejected_occupied(&self) -> usize {
        self.rejected_occupied
    }

    #[must_use]
    pub const fn rejected_shape_mismatch(&self) -> usize {
        self.rejected_shape_mismatch
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    #[must_use]
    pub const fn max_lines_in_one_clear(&self) -> usize {
        self.max_lines_in_one_clear
    }

    #[must_use]
    pub const fn batches_loaded(&self) -> usize {
        self.batches_loaded
    }

    #[must_use]
    pub const fn resets(&self) -> usize {
        self.resets
    }

    #[must_use]
    pub const fn damage_to_player(&self) -> i64 {
        self.damage_to_player
    }

    #[must_use]
    pub const fn damage_to_enemy(&self) -> i64 {
        self.damage_to_enemy
    }

    pub const fn record_placement(&mut self, result: PlacementResult) {
        match result {
            PlacementResult::Accepted => self.accepted_placements += 1,
            PlacementResult::RejectedCountMismatch => self.rejected_count_mismatch += 1,
            PlacementResult::RejectedOccupied => self.rejected_occupied += 1,
            PlacementResult::RejectedShapeMismatch => self.rejected_shape_mismatch += 1,
        }
    }

    pub fn record_line_clear(&mut self, cleared_lines: usize) {
        self.total_cleared_lines += cleared_lines;
        self.max_lines_in_one_clear = self.max_lines_in_one_clear.max(cleared_lines);
    }

    pub const fn record_batch(&mut self) {
        self.batches_loaded += 1;
    }

    pub const fn record_reset(&mut self) {
        self.resets += 1;
    }

    pub fn record_damage(&mut self, target: Actor, amount: i32) {
        match target {
            Actor::Player => self.damage_to_player += i64::from(amount),
            Actor::Enemy => self.damage_to_enemy += i64::from(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_counted_by_reason() {
        let mut stats = GameStats::new();
        stats.record_placement(PlacementResult::RejectedOccupied);
        stats.record_placement(PlacementResult::RejectedOccupied);
        stats.record_placement(PlacementResult::RejectedCountMismatch);
        stats.record_placement(PlacementResult::RejectedShapeMismatch);
        assert_eq!(stats.rejected_occupied(), 2);
        assert_eq!(stats.rejected_count_mismatch(), 1);
        assert_eq!(stats.rejected_shape_mismatch(), 1);
        assert_eq!(stats.rejected_placements(), 4);
        assert_eq!(stats.accepted_placements(), 0);
    }

    #[test]
    fn test_line_clear_tracks_maximum() {
        let mut stats = GameStats::new();
        stats.record_line_clear(1);
        stats.record_line_clear(3);
        stats.record_line_clear(2);
        assert_eq!(stats.total_cleared_lines(), 6);
        assert_eq!(stats.max_lines_in_one_clear(), 3);
    }

    #[test]
    fn test_damage_per_side() {
        let mut stats = GameStats::new();
        stats.record_damage(Actor::Player, 1);
        stats.record_damage(Actor::Player, 2);
        stats.record_damage(Actor::Enemy, 6);
        assert_eq!(stats.damage_to_player(), 3);
        assert_eq!(stats.damage_to_enemy(), 6);
    }

    #[test]
    fn test_serialization_field_names() {
        let mut stats = GameStats::new();
        stats.record_batch();
        stats.record_reset();
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["batches_loaded"], 1);
        assert_eq!(value["resets"], 1);
        assert_eq!(value["damage_to_enemy"], 0);
    }
}
