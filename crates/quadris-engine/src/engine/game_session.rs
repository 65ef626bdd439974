use std::{mem, time::Duration};

use crate::{
    HoldError,
    core::{
        board::Board,
        piece::{Direction, FallingPiece},
        shape::PieceKind,
    },
    engine::{
        game_stats::GameStats,
        gravity::Gravity,
        piece_source::{PieceSeed, PieceSource},
    },
};

/// Lifecycle phase of a session.
///
/// A session starts `Idle`, runs until a spawn has no room, and then
/// stays `GameOver` until restarted. Pausing is only reachable from
/// `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionPhase {
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Advisory notification for the UI layer.
///
/// Events queue up inside the session until drained with
/// [`GameSession::take_events`]. Nothing in the engine depends on them
/// being observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// One landing cleared `lines` rows, awarding `points`.
    LinesCleared { lines: usize, points: usize },
    /// A spawn had no room; `score` is the final score.
    GameOver { score: usize },
}

/// A complete game: board, pieces, hold slot, score, and phase.
///
/// All transitions run synchronously on the caller's thread. Commands and
/// gravity descents go through the same `move_piece` path, so a forced
/// descent can never interleave with a player move.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    falling_piece: Option<FallingPiece>,
    next_piece: Option<PieceKind>,
    held_piece: Option<PieceKind>,
    can_hold: bool,
    stats: GameStats,
    phase: SessionPhase,
    gravity: Gravity,
    piece_source: PieceSource,
    events: Vec<GameEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates an idle session with a randomly seeded piece source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(PieceSource::new())
    }

    /// Like [`Self::new`], but with a specific seed so the piece sequence
    /// is reproducible.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_source(PieceSource::with_seed(seed))
    }

    fn with_source(piece_source: PieceSource) -> Self {
        Self {
            board: Board::EMPTY,
            falling_piece: None,
            next_piece: None,
            held_piece: None,
            can_hold: true,
            stats: GameStats::new(),
            phase: SessionPhase::Idle,
            gravity: Gravity::new(),
            piece_source,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&FallingPiece> {
        self.falling_piece.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next_piece
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held_piece
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The seed the piece sequence is drawn from.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.piece_source.seed()
    }

    /// The current forced-descent interval.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.gravity.interval()
    }

    /// Starts a fresh game: empty board, zeroed counters, fresh next
    /// piece, and an immediate first spawn.
    ///
    /// The piece source keeps its stream, so one seed describes every
    /// game played on this session.
    pub fn start(&mut self) {
        self.board = Board::EMPTY;
        self.falling_piece = None;
        self.next_piece = Some(self.piece_source.next_kind());
        self.held_piece = None;
        self.can_hold = true;
        self.stats = GameStats::new();
        self.phase = SessionPhase::Running;
        self.gravity.set_level(self.stats.level());
        self.gravity.reset();
        self.events.clear();
        self.spawn_piece();
    }

    /// Discards the current game and starts a fresh one.
    pub fn restart(&mut self) {
        self.start();
    }

    /// Toggles between `Running` and `Paused`; no-op in other phases.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            SessionPhase::Running => SessionPhase::Paused,
            SessionPhase::Paused => SessionPhase::Running,
            phase => phase,
        };
    }

    /// Moves the falling piece one step and reports whether it moved.
    ///
    /// A down-move that cannot commit is a landing: the piece merges into
    /// the board, full rows clear and score, and the next piece spawns.
    /// Blocked sideways moves change nothing.
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        let Some(piece) = &self.falling_piece else {
            return false;
        };
        let candidate = piece.shifted(direction);
        if self.board.is_valid_position(&candidate) {
            self.falling_piece = Some(candidate);
            return true;
        }
        if direction == Direction::Down {
            self.lock_piece();
        }
        false
    }

    /// Rotates the falling piece 90° clockwise if the result fits.
    ///
    /// There are no kick attempts; a rotation that does not fit is
    /// discarded silently.
    pub fn rotate(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        let Some(piece) = &self.falling_piece else {
            return;
        };
        let candidate = piece.rotated();
        if self.board.is_valid_position(&candidate) {
            self.falling_piece = Some(candidate);
        }
    }

    /// Drops the falling piece straight down and locks it.
    ///
    /// Each descended row awards bonus points on top of the landing
    /// score.
    pub fn hard_drop(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        while self.move_piece(Direction::Down) {
            self.stats.add_hard_drop_bonus(1);
        }
    }

    /// Stores the falling piece in the hold slot.
    ///
    /// The first hold draws the replacement from the next piece; later
    /// holds swap with the held kind, re-centered in spawn orientation.
    /// Holding locks out further holds until the next piece spawns from a
    /// landing.
    pub fn hold(&mut self) -> Result<(), HoldError> {
        if !self.phase.is_running() {
            return Err(HoldError::NoActivePiece);
        }
        let Some(piece) = &self.falling_piece else {
            return Err(HoldError::NoActivePiece);
        };
        if !self.can_hold {
            return Err(HoldError::AlreadyUsed);
        }
        let current = piece.kind();
        match self.held_piece.replace(current) {
            Some(previous) => self.falling_piece = Some(FallingPiece::spawn(previous)),
            None => self.spawn_piece(),
        }
        self.can_hold = false;
        Ok(())
    }

    /// Feeds elapsed wall-clock time into the gravity scheduler, forcing
    /// a descent when one is due.
    ///
    /// Does nothing unless the session is running, so a paused or
    /// finished game accumulates no fall time.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.phase.is_running() {
            return;
        }
        if self.gravity.advance(elapsed) {
            self.move_piece(Direction::Down);
        }
    }

    /// Returns the board with the falling piece painted on top.
    ///
    /// The stored board stays piece-free; this derived copy exists only
    /// for display.
    #[must_use]
    pub fn render_board(&self) -> Board {
        match &self.falling_piece {
            Some(piece) => self.board.with_piece(piece),
            None => self.board.clone(),
        }
    }

    /// Where the falling piece would land if dropped straight down.
    #[must_use]
    pub fn drop_position(&self) -> Option<FallingPiece> {
        let mut dropped = self.falling_piece.clone()?;
        loop {
            let candidate = dropped.shifted(Direction::Down);
            if !self.board.is_valid_position(&candidate) {
                return Some(dropped);
            }
            dropped = candidate;
        }
    }

    /// Drains the queued advisory events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    fn lock_piece(&mut self) {
        let Some(piece) = self.falling_piece.take() else {
            return;
        };
        self.board.fill_piece(&piece);
        let cleared = self.board.clear_full_rows();
        let points = self.stats.record_piece_drop(cleared);
        self.gravity.set_level(self.stats.level());
        if cleared > 0 {
            self.events.push(GameEvent::LinesCleared {
                lines: cleared,
                points,
            });
        }
        self.spawn_piece();
    }

    fn spawn_piece(&mut self) {
        let kind = self
            .next_piece
            .unwrap_or_else(|| self.piece_source.next_kind());
        let piece = FallingPiece::spawn(kind);
        if !self.board.is_valid_position(&piece) {
            self.phase = SessionPhase::GameOver;
            self.falling_piece = None;
            self.events.push(GameEvent::GameOver {
                score: self.stats.score(),
            });
            return;
        }
        self.falling_piece = Some(piece);
        self.next_piece = Some(self.piece_source.next_kind());
        self.can_hold = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        board::{BOARD_HEIGHT, BOARD_WIDTH, Cell},
        piece::Position,
    };

    fn running_session() -> GameSession {
        let mut session = GameSession::new();
        session.start();
        session
    }

    /// Replaces the falling piece, bypassing spawn placement.
    fn force_piece(session: &mut GameSession, kind: PieceKind, x: i32, y: i32) {
        session.falling_piece = Some(FallingPiece::at(kind, Position::new(x, y)));
    }

    fn fill_row_except(session: &mut GameSession, y: usize, gaps: &[usize]) {
        for x in 0..BOARD_WIDTH {
            if !gaps.contains(&x) {
                session.board.set_cell(x, y, Cell::Filled(PieceKind::I));
            }
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::new();
        assert!(session.phase().is_idle());
        assert!(session.falling_piece().is_none());
        assert!(session.next_piece().is_none());
    }

    #[test]
    fn test_commands_are_noops_before_start() {
        let mut session = GameSession::new();
        assert!(!session.move_piece(Direction::Down));
        session.rotate();
        session.hard_drop();
        session.tick(Duration::from_secs(10));
        assert!(session.hold().is_err());
        assert!(session.phase().is_idle());
    }

    #[test]
    fn test_start_spawns_a_centered_piece() {
        let session = running_session();
        assert!(session.phase().is_running());
        let piece = session.falling_piece().expect("piece spawned");
        assert_eq!(piece.position(), Position::new(4, 0));
        assert_eq!(piece.rotation(), 0);
        assert!(session.next_piece().is_some());
        assert!(session.can_hold());
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.stats().level(), 1);
    }

    #[test]
    fn test_seeded_sessions_play_identically() {
        let seed: PieceSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
        let mut session1 = GameSession::with_seed(seed);
        let mut session2 = GameSession::with_seed(seed);
        session1.start();
        session2.start();
        for _ in 0..5 {
            assert_eq!(
                session1.falling_piece().map(FallingPiece::kind),
                session2.falling_piece().map(FallingPiece::kind),
            );
            assert_eq!(session1.next_piece(), session2.next_piece());
            session1.hard_drop();
            session2.hard_drop();
        }
    }

    #[test]
    fn test_move_commits_valid_steps() {
        let mut session = running_session();
        force_piece(&mut session, PieceKind::O, 4, 0);
        assert!(session.move_piece(Direction::Left));
        assert!(session.move_piece(Direction::Right));
        assert!(session.move_piece(Direction::Down));
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.position(), Position::new(4, 1));
    }

    #[test]
    fn test_blocked_sideways_move_changes_nothing() {
        let mut session = running_session();
        force_piece(&mut session, PieceKind::O, 0, 0);
        assert!(!session.move_piece(Direction::Left));
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.position(), Position::new(0, 0));
        assert_eq!(session.stats().completed_pieces(), 0);
    }

    #[test]
    fn test_o_piece_lands_after_eighteen_descents() {
        let mut session = running_session();
        force_piece(&mut session, PieceKind::O, 4, 0);
        for _ in 0..18 {
            assert!(session.move_piece(Direction::Down));
        }
        assert!(!session.move_piece(Direction::Down));

        // Merged into the bottom two rows, no lines cleared.
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(session.board().cell(x, y), Cell::Filled(PieceKind::O));
        }
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.stats().level(), 1);
        assert_eq!(session.stats().completed_pieces(), 1);
        // A fresh piece spawned immediately.
        let piece = session.falling_piece().expect("respawned");
        assert_eq!(piece.position(), Position::new(4, 0));
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_landing_clears_rows_and_scores() {
        let mut session = running_session();
        fill_row_except(&mut session, 19, &[4, 5]);
        force_piece(&mut session, PieceKind::O, 4, 18);
        assert!(!session.move_piece(Direction::Down));

        assert_eq!(session.stats().total_cleared_lines(), 1);
        assert_eq!(session.stats().score(), 40);
        assert_eq!(session.stats().level(), 1);
        // The surviving O cells fell into the bottom row.
        assert_eq!(session.board().cell(4, 19), Cell::Filled(PieceKind::O));
        assert_eq!(session.board().cell(5, 19), Cell::Filled(PieceKind::O));
        assert_eq!(
            session.take_events(),
            vec![GameEvent::LinesCleared {
                lines: 1,
                points: 40
            }],
        );
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_landing_on_two_full_rows_clears_both_and_compacts() {
        let mut session = running_session();
        fill_row_except(&mut session, 18, &[4, 5]);
        fill_row_except(&mut session, 19, &[4, 5]);
        session.board.set_cell(0, 17, Cell::Filled(PieceKind::J));
        force_piece(&mut session, PieceKind::O, 4, 17);
        assert!(session.move_piece(Direction::Down));
        assert!(!session.move_piece(Direction::Down));

        assert_eq!(session.stats().total_cleared_lines(), 2);
        assert_eq!(session.stats().score(), 100);
        // The leftover marker compacted to the bottom row.
        assert_eq!(session.board().cell(0, 19), Cell::Filled(PieceKind::J));
        let filled = session
            .board()
            .rows()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count();
        assert_eq!(filled, 1);
    }

    #[test]
    fn test_clear_points_scale_with_current_level() {
        let mut session = running_session();
        // Ten lines already cleared puts the session at level 2.
        session.stats.record_piece_drop(4);
        session.stats.record_piece_drop(4);
        session.stats.record_piece_drop(2);
        let score_before = session.stats().score();

        fill_row_except(&mut session, 19, &[4, 5]);
        force_piece(&mut session, PieceKind::O, 4, 18);
        assert!(!session.move_piece(Direction::Down));
        assert_eq!(session.stats().score(), score_before + 80);
    }

    #[test]
    fn test_level_change_repaces_gravity() {
        let mut session = running_session();
        session.stats.record_piece_drop(4);
        session.stats.record_piece_drop(4);
        session.stats.record_piece_drop(1);
        fill_row_except(&mut session, 19, &[4, 5]);
        force_piece(&mut session, PieceKind::O, 4, 18);
        assert!(!session.move_piece(Direction::Down));
        assert_eq!(session.stats().level(), 2);
        assert_eq!(session.drop_interval(), Duration::from_millis(950));
    }

    #[test]
    fn test_rotate_commits_only_valid_rotations() {
        let mut session = running_session();
        force_piece(&mut session, PieceKind::T, 4, 0);
        session.rotate();
        assert_eq!(session.falling_piece().unwrap().rotation(), 1);

        // A settled cell where the rotated T needs room blocks the next turn.
        session.board.set_cell(4, 1, Cell::Filled(PieceKind::Z));
        let before = session.falling_piece().cloned();
        session.rotate();
        assert_eq!(session.falling_piece().cloned(), before);
    }

    #[test]
    fn test_hard_drop_awards_two_points_per_row() {
        let mut session = running_session();
        force_piece(&mut session, PieceKind::O, 4, 0);
        session.hard_drop();
        assert_eq!(session.stats().score(), 36);
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.board().cell(4, 19), Cell::Filled(PieceKind::O));
        assert!(session.falling_piece().is_some());
    }

    #[test]
    fn test_first_hold_swaps_in_the_next_piece() {
        let mut session = running_session();
        force_piece(&mut session, PieceKind::T, 4, 3);
        let next = session.next_piece().unwrap();

        session.hold().unwrap();
        assert_eq!(session.held_piece(), Some(PieceKind::T));
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.kind(), next);
        assert_eq!(piece.position(), Position::new(4, 0));
        assert!(!session.can_hold());
        assert!(session.next_piece().is_some());
    }

    #[test]
    fn test_second_hold_swaps_with_the_held_piece() {
        let mut session = running_session();
        session.held_piece = Some(PieceKind::I);
        force_piece(&mut session, PieceKind::O, 2, 5);
        let next = session.next_piece();

        session.hold().unwrap();
        assert_eq!(session.held_piece(), Some(PieceKind::O));
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.kind(), PieceKind::I);
        assert_eq!(piece.position(), Position::new(4, 0));
        assert_eq!(piece.rotation(), 0);
        // Swapping leaves the queue untouched.
        assert_eq!(session.next_piece(), next);
        assert!(!session.can_hold());
    }

    #[test]
    fn test_hold_is_locked_until_the_next_landing() {
        let mut session = running_session();
        session.hold().unwrap();
        assert!(matches!(session.hold(), Err(HoldError::AlreadyUsed)));

        // Landing spawns a fresh piece, which unlocks holding again.
        force_piece(&mut session, PieceKind::O, 4, 18);
        assert!(!session.move_piece(Direction::Down));
        assert!(session.can_hold());
        session.hold().unwrap();
    }

    #[test]
    fn test_pause_blocks_every_transition() {
        let mut session = running_session();
        let piece = session.falling_piece().cloned();
        session.toggle_pause();
        assert!(session.phase().is_paused());

        assert!(!session.move_piece(Direction::Down));
        session.rotate();
        session.hard_drop();
        session.tick(Duration::from_secs(10));
        assert!(session.hold().is_err());
        assert_eq!(session.falling_piece().cloned(), piece);

        session.toggle_pause();
        assert!(session.phase().is_running());
        assert!(session.move_piece(Direction::Down));
    }

    #[test]
    fn test_pause_is_a_noop_after_game_over() {
        let mut session = running_session();
        session.phase = SessionPhase::GameOver;
        session.toggle_pause();
        assert!(session.phase().is_game_over());
    }

    #[test]
    fn test_tick_forces_a_descent_per_interval() {
        let mut session = running_session();
        force_piece(&mut session, PieceKind::O, 4, 0);
        session.tick(Duration::from_millis(999));
        assert_eq!(session.falling_piece().unwrap().position(), Position::new(4, 0));
        session.tick(Duration::from_millis(1));
        assert_eq!(session.falling_piece().unwrap().position(), Position::new(4, 1));
    }

    #[test]
    fn test_pause_freezes_fall_time() {
        let mut session = running_session();
        force_piece(&mut session, PieceKind::O, 4, 0);
        session.tick(Duration::from_millis(999));
        session.toggle_pause();
        session.tick(Duration::from_secs(30));
        session.toggle_pause();
        assert_eq!(session.falling_piece().unwrap().position(), Position::new(4, 0));
        session.tick(Duration::from_millis(1));
        assert_eq!(session.falling_piece().unwrap().position(), Position::new(4, 1));
    }

    #[test]
    fn test_blocked_spawn_ends_the_game() {
        let mut session = running_session();
        for y in 0..2 {
            for x in 4..6 {
                session.board.set_cell(x, y, Cell::Filled(PieceKind::Z));
            }
        }
        session.stats.add_hard_drop_bonus(5);
        session.next_piece = Some(PieceKind::O);
        session.take_events();

        session.spawn_piece();
        assert!(session.phase().is_game_over());
        assert!(session.falling_piece().is_none());
        assert_eq!(session.take_events(), vec![GameEvent::GameOver { score: 10 }]);

        // Terminal state rejects every command except restart.
        assert!(!session.move_piece(Direction::Down));
        session.rotate();
        session.hard_drop();
        assert!(session.hold().is_err());
        assert!(session.phase().is_game_over());
    }

    #[test]
    fn test_restart_leaves_game_over() {
        let mut session = running_session();
        session.phase = SessionPhase::GameOver;
        session.falling_piece = None;
        session.stats.add_hard_drop_bonus(50);
        session.held_piece = Some(PieceKind::L);

        session.restart();
        assert!(session.phase().is_running());
        assert_eq!(session.stats().score(), 0);
        assert!(session.held_piece().is_none());
        assert!(session.falling_piece().is_some());
        assert_eq!(session.board(), &Board::EMPTY);
    }

    #[test]
    fn test_render_board_overlays_without_mutating() {
        let mut session = running_session();
        force_piece(&mut session, PieceKind::O, 4, 18);
        let rendered = session.render_board();
        assert_eq!(rendered.cell(4, 18), Cell::Filled(PieceKind::O));
        // The settled board itself stays piece-free.
        assert_eq!(session.board(), &Board::EMPTY);
    }

    #[test]
    fn test_drop_position_rests_on_the_stack() {
        let mut session = running_session();
        session.board.set_cell(4, 19, Cell::Filled(PieceKind::I));
        force_piece(&mut session, PieceKind::O, 4, 0);
        let ghost = session.drop_position().unwrap();
        assert_eq!(ghost.position(), Position::new(4, 17));
    }

    #[test]
    fn test_full_board_height_is_kept_after_clears() {
        let mut session = running_session();
        fill_row_except(&mut session, 19, &[4, 5]);
        force_piece(&mut session, PieceKind::O, 4, 18);
        session.hard_drop();
        assert_eq!(session.board().rows().count(), BOARD_HEIGHT);
    }
}
