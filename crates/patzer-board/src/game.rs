//! A game in progress: position, linear move history, and records.

use chess::{ChessMove, Color, Piece, Square};
use tracing::debug;

use crate::error::GameError;
use crate::position::{Position, STARTING_FEN};
use crate::uci::{format_move, parse_move};

/// One applied move, as stored in the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Source square.
    pub from: Square,
    /// Destination square.
    pub to: Square,
    /// The piece that moved.
    pub piece: Piece,
    /// Promotion piece, for pawn promotions.
    pub promotion: Option<Piece>,
    /// Captured piece, if the move was a capture.
    pub captured: Option<Piece>,
    /// Coordinate notation of the move.
    pub notation: String,
}

impl MoveRecord {
    /// Reconstruct the move this record describes.
    pub fn to_move(&self) -> ChessMove {
        ChessMove::new(self.from, self.to, self.promotion)
    }
}

/// A game: an initial position plus the moves played from it.
///
/// The current position is always reproducible by replaying the history
/// from the initial position, and undo works exactly that way, so every
/// truncation of the history is a state the game actually passed through.
#[derive(Debug, Clone)]
pub struct Game {
    start_fen: String,
    position: Position,
    history: Vec<MoveRecord>,
}

impl Game {
    /// Start a game from the standard starting position.
    pub fn new() -> Game {
        Game {
            start_fen: STARTING_FEN.to_string(),
            position: Position::new(),
            history: Vec::new(),
        }
    }

    /// Start a game from an arbitrary FEN.
    pub fn from_fen(fen: &str) -> Result<Game, GameError> {
        let position = Position::from_fen(fen)?;
        Ok(Game {
            start_fen: fen.trim().to_string(),
            position,
            history: Vec::new(),
        })
    }

    /// The current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    /// All legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        self.position.legal_moves()
    }

    /// Legal moves originating from `from`.
    pub fn legal_moves_from(&self, from: Square) -> Vec<ChessMove> {
        self.position.legal_moves_from(from)
    }

    /// The piece and owner on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        self.position.piece_at(square)
    }

    /// Return `true` if the game is over.
    pub fn is_game_over(&self) -> bool {
        self.position.is_game_over()
    }

    /// Records of every move played, oldest first.
    pub fn records(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Notations of every move played, oldest first.
    pub fn move_history(&self) -> Vec<String> {
        self.history
            .iter()
            .map(|record| record.notation.clone())
            .collect()
    }

    /// Number of plies played.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// Apply a move, validated against the legal-move set.
    ///
    /// On failure the game is unchanged.
    pub fn apply_move(&mut self, mv: ChessMove) -> Result<MoveRecord, GameError> {
        if !self.position.is_legal(mv) {
            return Err(GameError::IllegalMove {
                notation: format_move(mv),
            });
        }

        let piece = self
            .position
            .piece_at(mv.get_source())
            .map(|(piece, _)| piece)
            .expect("legal move has a piece on its source square");
        let record = MoveRecord {
            from: mv.get_source(),
            to: mv.get_dest(),
            piece,
            promotion: mv.get_promotion(),
            captured: self.position.captured_piece(mv),
            notation: format_move(mv),
        };

        self.position = self.position.after(mv);
        debug!(mv = %record.notation, ply = self.history.len() + 1, "applied move");
        self.history.push(record.clone());
        Ok(record)
    }

    /// Undo the most recent ply by replaying the shortened history.
    ///
    /// Returns the removed record, or `None` at the initial position.
    pub fn undo_last_move(&mut self) -> Option<MoveRecord> {
        let removed = self.history.pop()?;
        self.position = replay(&self.start_fen, &self.history)
            .expect("history was built from legal moves");
        debug!(mv = %removed.notation, ply = self.history.len(), "undid move");
        Some(removed)
    }

    /// Discard all history and return to the initial position.
    pub fn reset(&mut self) {
        self.position = Position::from_fen(&self.start_fen)
            .expect("start FEN was validated at construction");
        self.history.clear();
    }

    /// Serialize the game for later reconstruction.
    ///
    /// Format: `startpos` or `fen <FEN>`, followed by `moves <notation>...`
    /// when any moves have been played.
    pub fn export_record(&self) -> String {
        let mut out = if self.start_fen == STARTING_FEN {
            "startpos".to_string()
        } else {
            format!("fen {}", self.start_fen)
        };
        if !self.history.is_empty() {
            out.push_str(" moves");
            for record in &self.history {
                out.push(' ');
                out.push_str(&record.notation);
            }
        }
        out
    }

    /// Reconstruct a game from [`export_record`](Game::export_record) output.
    pub fn import_record(record: &str) -> Result<Game, GameError> {
        let mut tokens = record.split_whitespace().peekable();

        let mut game = match tokens.next() {
            Some("startpos") => Game::new(),
            Some("fen") => {
                let mut fen_fields = Vec::new();
                while let Some(&token) = tokens.peek() {
                    if token == "moves" {
                        break;
                    }
                    fen_fields.push(tokens.next().expect("peeked token exists"));
                }
                Game::from_fen(&fen_fields.join(" "))?
            }
            _ => {
                return Err(GameError::MalformedRecord {
                    reason: "expected startpos or fen".to_string(),
                });
            }
        };

        match tokens.next() {
            Some("moves") => {
                for notation in tokens {
                    let (from, to, promotion) = parse_move(notation)?;
                    game.apply_move(ChessMove::new(from, to, promotion))?;
                }
            }
            Some(other) => {
                return Err(GameError::MalformedRecord {
                    reason: format!("unexpected token: {other}"),
                });
            }
            None => {}
        }

        debug!(plies = game.ply_count(), "imported game record");
        Ok(game)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

fn replay(start_fen: &str, history: &[MoveRecord]) -> Result<Position, GameError> {
    let mut position = Position::from_fen(start_fen)?;
    for record in history {
        let mv = record.to_move();
        if !position.is_legal(mv) {
            return Err(GameError::IllegalMove {
                notation: record.notation.clone(),
            });
        }
        position = position.after(mv);
    }
    Ok(position)
}
