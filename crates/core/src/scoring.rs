//! Scoring module - Classic Nintendo scoring and Game Boy gravity
//!
//! - Line clears award `LINE_SCORES[lines] * (level + 1)`.
//! - No points for soft or hard drops, so a hard drop scores exactly like the
//!   equivalent sequence of soft drops.
//! - Level is `max(start_level, lines / 10)`.

use crate::types::{DROP_INTERVALS, DROP_INTERVAL_FLOOR_MS, LINES_PER_LEVEL, LINE_SCORES};

/// Points for clearing `lines` rows at `level` (0-based).
///
/// More than four rows at once cannot happen in play; they score as four.
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    LINE_SCORES[lines.min(4)].saturating_mul(level.saturating_add(1))
}

/// Level reached after `total_lines`, never below the chosen start level.
pub fn calculate_level(start_level: u32, total_lines: u32) -> u32 {
    start_level.max(total_lines / LINES_PER_LEVEL)
}

/// Gravity interval for a level, in milliseconds per row.
pub fn drop_interval_ms(level: u32) -> u32 {
    DROP_INTERVALS
        .get(level as usize)
        .copied()
        .unwrap_or(DROP_INTERVAL_FLOOR_MS)
        .max(DROP_INTERVAL_FLOOR_MS)
}
