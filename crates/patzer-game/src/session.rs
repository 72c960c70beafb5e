//! Mode-aware game state transitions.

use tracing::{debug, info, warn};

use patzer_board::{ChessMove, Color, Game, GameError, MoveRecord, Piece, Square};
use patzer_engine::Difficulty;

use crate::error::SessionError;

/// Who controls each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Two humans sharing the board.
    HumanVsHuman,
    /// One human against the engine.
    VsEngine {
        /// The color the engine plays.
        engine_color: Color,
    },
}

impl Default for GameMode {
    /// Human plays White, engine replies as Black.
    fn default() -> Self {
        GameMode::VsEngine {
            engine_color: Color::Black,
        }
    }
}

/// A promotion waiting for its piece choice, keyed by the move's squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPromotion {
    /// Source square of the deferred move.
    pub from: Square,
    /// Destination square on the final rank.
    pub to: Square,
}

/// Result of a successful session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was committed.
    Applied(MoveRecord),
    /// The move matches several promotions; a piece choice is now pending.
    PromotionPending(PendingPromotion),
}

/// Opaque handle tying an in-flight move selection to the session state it
/// was computed from. Issued by [`selection_ticket`](Session::selection_ticket)
/// and consumed by [`commit_selected`](Session::commit_selected).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
}

/// A game session: the current game plus mode, difficulty, and the
/// transition rules that keep them consistent.
///
/// Every mutation bumps an internal generation counter; selections computed
/// against an older generation are rejected at commit time, so a result that
/// arrives after an undo or reset is discarded instead of applied.
#[derive(Debug)]
pub struct Session {
    game: Game,
    mode: GameMode,
    difficulty: Difficulty,
    pending: Option<PendingPromotion>,
    generation: u64,
}

impl Session {
    /// Start a session from the standard starting position.
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Session {
        Session {
            game: Game::new(),
            mode,
            difficulty,
            pending: None,
            generation: 0,
        }
    }

    /// Start a session from an arbitrary FEN.
    pub fn from_fen(
        fen: &str,
        mode: GameMode,
        difficulty: Difficulty,
    ) -> Result<Session, GameError> {
        Ok(Session {
            game: Game::from_fen(fen)?,
            mode,
            difficulty,
            pending: None,
            generation: 0,
        })
    }

    /// The game in progress.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The current mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// The current difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Change the difficulty; takes effect for the next selection.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!(%difficulty, "difficulty changed");
        self.difficulty = difficulty;
        self.generation += 1;
    }

    /// The outstanding promotion choice, if any.
    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.pending
    }

    /// Return `true` if it is the engine's turn to move.
    pub fn engine_to_move(&self) -> bool {
        match self.mode {
            GameMode::HumanVsHuman => false,
            GameMode::VsEngine { engine_color } => {
                self.pending.is_none()
                    && !self.game.is_game_over()
                    && self.game.side_to_move() == engine_color
            }
        }
    }

    /// Attempt a move between two squares.
    ///
    /// When `(from, to)` matches several legal moves — a promotion — and no
    /// piece was supplied, nothing commits: the choice is recorded as
    /// pending and must be resolved or cancelled first. On any error the
    /// session is unchanged.
    pub fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> Result<MoveOutcome, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::PromotionPending);
        }

        let candidates: Vec<ChessMove> = self
            .game
            .legal_moves_from(from)
            .into_iter()
            .filter(|mv| mv.get_dest() == to)
            .collect();
        if candidates.is_empty() {
            return Err(SessionError::IllegalMove { from, to });
        }

        let chosen = match promotion {
            Some(piece) => *candidates
                .iter()
                .find(|mv| mv.get_promotion() == Some(piece))
                .ok_or(SessionError::InvalidPromotion { piece })?,
            None if candidates.len() > 1 => {
                let pending = PendingPromotion { from, to };
                debug!(?pending, "promotion choice deferred");
                self.pending = Some(pending);
                self.generation += 1;
                return Ok(MoveOutcome::PromotionPending(pending));
            }
            None => candidates[0],
        };

        let record = self.game.apply_move(chosen)?;
        self.generation += 1;
        Ok(MoveOutcome::Applied(record))
    }

    /// Commit the pending promotion with the chosen piece.
    pub fn resolve_promotion(&mut self, piece: Piece) -> Result<MoveOutcome, SessionError> {
        let pending = self.pending.ok_or(SessionError::NoPromotionPending)?;
        if !matches!(
            piece,
            Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen
        ) {
            return Err(SessionError::InvalidPromotion { piece });
        }

        let record = self
            .game
            .apply_move(ChessMove::new(pending.from, pending.to, Some(piece)))?;
        self.pending = None;
        self.generation += 1;
        Ok(MoveOutcome::Applied(record))
    }

    /// Discard the pending promotion, if any. Idempotent.
    pub fn cancel_promotion(&mut self) {
        if self.pending.take().is_some() {
            debug!("promotion choice cancelled");
            self.generation += 1;
        }
    }

    /// Issue a ticket for a selection computed from the current state.
    pub fn selection_ticket(&self) -> SelectionTicket {
        SelectionTicket {
            generation: self.generation,
        }
    }

    /// Commit an engine-selected move, provided the state it was computed
    /// from is still current.
    pub fn commit_selected(
        &mut self,
        ticket: SelectionTicket,
        mv: ChessMove,
    ) -> Result<MoveOutcome, SessionError> {
        if ticket.generation != self.generation {
            warn!("discarding stale selection");
            return Err(SessionError::StaleSelection);
        }
        self.try_move(mv.get_source(), mv.get_dest(), mv.get_promotion())
    }

    /// Undo the most recent moves.
    ///
    /// Against the engine one undo removes two plies — the engine's reply
    /// and the human move before it — so the human is back on move; with
    /// fewer than two plies it removes whatever exists. Between humans it
    /// removes a single ply. Returns how many plies were removed; zero at
    /// the initial position.
    pub fn undo(&mut self) -> usize {
        self.pending = None;

        let plies = match self.mode {
            GameMode::HumanVsHuman => 1,
            GameMode::VsEngine { .. } => 2,
        };
        let mut removed = 0;
        for _ in 0..plies {
            if self.game.undo_last_move().is_none() {
                break;
            }
            removed += 1;
        }

        debug!(removed, "undo");
        self.generation += 1;
        removed
    }

    /// Return to the initial position, discarding all history. Idempotent.
    pub fn reset(&mut self) {
        info!("session reset");
        self.game.reset();
        self.pending = None;
        self.generation += 1;
    }
}
