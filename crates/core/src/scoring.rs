//! Scoring module - classic line-clear points and level progression
//!
//! Points for a clear are the base value for the number of rows times the level the
//! clear happened at. Levels start at 1 and advance every ten lines.

use crate::types::{LINES_PER_LEVEL, LINE_SCORES, STARTING_LEVEL};

/// Calculate line clear score
/// lines: number of rows cleared at once (clears above 4 use the 4-line value)
/// level: level in effect before the clear (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    let base_score = LINE_SCORES[lines.min(LINE_SCORES.len()) - 1];
    base_score.saturating_mul(level)
}

/// Level management
/// Level increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    STARTING_LEVEL + total_lines / LINES_PER_LEVEL
}
