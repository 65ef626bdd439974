//! Game engine logic and state management.
//!
//! This module provides the high-level logic that orchestrates the core
//! data structures into a playable game:
//!
//! - [`GameSession`] - The full game state machine (board, pieces, hold,
//!   score, phase) driven by player commands and elapsed time
//! - [`GameStats`] - Score, cleared lines, derived level, and clear counts
//! - [`Gravity`] - Elapsed-time scheduler for forced descents
//! - [`PieceSource`] - Seedable uniform piece generation
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (optionally with a [`PieceSeed`]) and call
//!    `start`
//! 2. Feed player commands (move, rotate, hard drop, hold) and elapsed
//!    time (`tick`) into the session
//! 3. A down-move that cannot commit locks the piece, clears full rows,
//!    scores them, and spawns the next piece
//! 4. Repeat until a spawn has no room, which ends the session
//!
//! The session publishes line-clear and game-over notifications through
//! [`GameSession::take_events`]; observing them is optional.

pub use self::{game_session::*, game_stats::*, gravity::*, piece_source::*};

mod game_session;
mod game_stats;
mod gravity;
mod piece_source;
