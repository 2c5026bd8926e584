//! Scoring module - line clear points, level progression, fall timing
//!
//! Points come from a fixed table rather than a formula; level is derived
//! from score, and the fall delay is derived from level with a transient
//! slowdown scale applied after the floor clamp.

use crate::types::{
    BASE_FALL_MS, FALL_FLOOR_MS, FALL_STEP_MS, LEVEL_SCORE_STEP, LINE_SCORES,
    SLOWDOWN_DENOMINATOR, SLOWDOWN_NUMERATOR, SPECIAL_PIECE_BONUS,
};

/// Points for a clear of `lines` rows (0-4).
pub fn line_clear_points(lines: usize) -> u32 {
    if lines < LINE_SCORES.len() {
        LINE_SCORES[lines]
    } else {
        0
    }
}

/// Total points awarded by a lock: the clear table plus the flat special
/// bonus when applicable.
pub fn lock_points(lines: usize, special: bool) -> u32 {
    let mut points = line_clear_points(lines);
    if special {
        points += SPECIAL_PIECE_BONUS;
    }
    points
}

/// Level for a score: one level per thousand points, never below 1.
pub fn level_for_score(score: u32) -> u32 {
    (score / LEVEL_SCORE_STEP + 1).max(1)
}

/// Base fall delay for a level, clamped at the floor.
pub fn fall_delay_for_level(level: u32) -> u32 {
    BASE_FALL_MS
        .saturating_sub(level.saturating_sub(1) * FALL_STEP_MS)
        .max(FALL_FLOOR_MS)
}

/// Apply the slowdown scale (6/5) to a base fall delay.
pub fn slowed_delay(base_ms: u32) -> u32 {
    base_ms * SLOWDOWN_NUMERATOR / SLOWDOWN_DENOMINATOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_table() {
        assert_eq!(line_clear_points(0), 0);
        assert_eq!(line_clear_points(1), 50);
        assert_eq!(line_clear_points(2), 150);
        assert_eq!(line_clear_points(3), 250);
        assert_eq!(line_clear_points(4), 500);
        // Out of table range (unreachable in play)
        assert_eq!(line_clear_points(5), 0);
    }

    #[test]
    fn test_special_bonus_is_additive() {
        assert_eq!(lock_points(0, true), 100);
        assert_eq!(lock_points(1, true), 150);
        assert_eq!(lock_points(4, true), 600);
        assert_eq!(lock_points(2, false), 150);
    }

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(999), 1);
        assert_eq!(level_for_score(1000), 2);
        assert_eq!(level_for_score(1050), 2);
        assert_eq!(level_for_score(10_000), 11);
    }

    #[test]
    fn test_fall_delay_progression() {
        assert_eq!(fall_delay_for_level(1), 1000);
        assert_eq!(fall_delay_for_level(2), 950);
        assert_eq!(fall_delay_for_level(10), 550);
        // Clamped at the floor from level 19 onward
        assert_eq!(fall_delay_for_level(19), 100);
        assert_eq!(fall_delay_for_level(40), 100);
    }

    #[test]
    fn test_slowed_delay_scales_after_clamp() {
        assert_eq!(slowed_delay(1000), 1200);
        assert_eq!(slowed_delay(950), 1140);
        // The floor-clamped base still gets the full scale
        assert_eq!(slowed_delay(fall_delay_for_level(40)), 120);
    }
}
