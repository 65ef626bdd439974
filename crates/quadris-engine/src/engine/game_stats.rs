/// Base score values for line clears.
///
/// Index corresponds to number of lines cleared by one landing:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
///
/// The base value is multiplied by the level at the moment of the landing.
const SCORE_TABLE: [usize; 5] = [0, 40, 100, 300, 1200];

/// Score awarded per row descended by a hard drop.
const HARD_DROP_POINTS: usize = 2;

/// Game statistics tracking score, lines cleared, and piece count.
///
/// The level is never stored; it is derived from the total cleared lines
/// (one level per 10 lines, starting at level 1) so it can never drift
/// from the line count.
///
/// # Scoring
///
/// - Line clears award `SCORE_TABLE[lines] × level`, with the level
///   sampled before the new lines are counted
/// - Hard drops award 2 points per descended row
/// - No combo, back-to-back, or spin bonuses
///
/// # Example
///
/// ```
/// use quadris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// let points = stats.record_piece_drop(4);
///
/// assert_eq!(points, 1200);
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Returns the current score.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the current level based on total lines cleared.
    ///
    /// Starts at 1 and increases by 1 for every 10 lines cleared.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.total_cleared_lines / 10 + 1
    }

    /// Returns the total number of pieces locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns the total number of lines cleared.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of landings by lines cleared (0 through 4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece lock and returns the points
    /// awarded for it.
    ///
    /// `cleared_lines` is at most 4; no piece spans more rows.
    pub const fn record_piece_drop(&mut self, cleared_lines: usize) -> usize {
        let points = SCORE_TABLE[cleared_lines] * self.level();
        self.completed_pieces += 1;
        self.score += points;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[cleared_lines] += 1;
        points
    }

    /// Awards the hard-drop bonus for the given descent distance.
    pub const fn add_hard_drop_bonus(&mut self, distance: usize) {
        self.score += distance * HARD_DROP_POINTS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_starts_at_one() {
        assert_eq!(GameStats::new().level(), 1);
    }

    #[test]
    fn test_level_steps_every_ten_lines() {
        let mut stats = GameStats::new();
        stats.record_piece_drop(4);
        stats.record_piece_drop(4);
        assert_eq!(stats.total_cleared_lines(), 8);
        assert_eq!(stats.level(), 1);
        stats.record_piece_drop(2);
        assert_eq!(stats.total_cleared_lines(), 10);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_score_table_at_level_one() {
        for (cleared, expected) in [(0, 0), (1, 40), (2, 100), (3, 300), (4, 1200)] {
            let mut stats = GameStats::new();
            assert_eq!(stats.record_piece_drop(cleared), expected);
            assert_eq!(stats.score(), expected);
        }
    }

    #[test]
    fn test_points_scale_with_level_before_the_new_lines() {
        let mut stats = GameStats::new();
        stats.record_piece_drop(4);
        stats.record_piece_drop(4);
        stats.record_piece_drop(2);
        assert_eq!(stats.level(), 2);
        let score_before = stats.score();
        // Level 2 at the moment of the landing doubles the base value.
        assert_eq!(stats.record_piece_drop(1), 80);
        assert_eq!(stats.score(), score_before + 80);
    }

    #[test]
    fn test_hard_drop_bonus_is_two_per_row() {
        let mut stats = GameStats::new();
        stats.add_hard_drop_bonus(18);
        assert_eq!(stats.score(), 36);
    }

    #[test]
    fn test_counters_track_landings() {
        let mut stats = GameStats::new();
        stats.record_piece_drop(0);
        stats.record_piece_drop(0);
        stats.record_piece_drop(3);
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.line_cleared_counter(), &[2, 0, 0, 1, 0]);
    }
}
