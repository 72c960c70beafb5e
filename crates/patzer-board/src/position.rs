//! Position snapshots over the rules engine, with draw-condition tracking.

use std::fmt;
use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Color, EMPTY, MoveGen, Piece, Square};

use crate::error::GameError;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A snapshot of a game position.
///
/// Value-like: [`after`](Position::after) returns a new snapshot and never
/// touches `self`. On top of the rules engine's board state this carries the
/// two pieces of context the `chess` crate does not track itself — the
/// halfmove clock and the zobrist keys seen since the last irreversible
/// move — so the full family of draw conditions can be reported.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    halfmove_clock: u32,
    /// Zobrist keys of earlier positions in the current reversible sequence,
    /// oldest first. Cleared whenever a pawn move or capture is played.
    seen: Vec<u64>,
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Position {
        Position {
            board: Board::default(),
            halfmove_clock: 0,
            seen: Vec::new(),
        }
    }

    /// Parse a position from a FEN string.
    ///
    /// Accepts 4, 5, or 6 fields; missing counters default to `0 1`. The
    /// repetition context starts empty: positions before the FEN are unknown.
    pub fn from_fen(fen: &str) -> Result<Position, GameError> {
        let invalid = || GameError::InvalidFen {
            fen: fen.to_string(),
        };

        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(invalid());
        }

        let mut normalized = fields.clone();
        if normalized.len() == 4 {
            normalized.push("0");
        }
        if normalized.len() == 5 {
            normalized.push("1");
        }

        let board = Board::from_str(&normalized.join(" ")).map_err(|_| invalid())?;
        let halfmove_clock = normalized[4].parse::<u32>().map_err(|_| invalid())?;

        Ok(Position {
            board,
            halfmove_clock,
            seen: Vec::new(),
        })
    }

    /// The underlying board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Zobrist key of this position.
    pub fn hash(&self) -> u64 {
        self.board.get_hash()
    }

    /// Plies since the last pawn move or capture.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// The side to move.
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// The piece and owner on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        let piece = self.board.piece_on(square)?;
        let color = self.board.color_on(square)?;
        Some((piece, color))
    }

    /// All legal moves in this position.
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    /// Legal moves originating from `from`.
    pub fn legal_moves_from(&self, from: Square) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board)
            .filter(|mv| mv.get_source() == from)
            .collect()
    }

    /// Return `true` if `mv` is legal here.
    pub fn is_legal(&self, mv: ChessMove) -> bool {
        MoveGen::new_legal(&self.board).any(|legal| legal == mv)
    }

    /// The piece captured by `mv`, if any.
    ///
    /// En passant captures report a pawn even though the destination square
    /// is empty.
    pub fn captured_piece(&self, mv: ChessMove) -> Option<Piece> {
        if let Some(piece) = self.board.piece_on(mv.get_dest()) {
            return Some(piece);
        }
        if self.is_en_passant(mv) {
            return Some(Piece::Pawn);
        }
        None
    }

    fn is_en_passant(&self, mv: ChessMove) -> bool {
        self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            && mv.get_source().get_file() != mv.get_dest().get_file()
            && self.board.piece_on(mv.get_dest()).is_none()
    }

    /// The position reached by playing `mv`, which must be legal.
    pub fn after(&self, mv: ChessMove) -> Position {
        let pawn_move = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn);
        let capture = self.captured_piece(mv).is_some();
        let board = self.board.make_move_new(mv);

        if pawn_move || capture {
            // Irreversible: earlier positions can never recur.
            Position {
                board,
                halfmove_clock: 0,
                seen: Vec::new(),
            }
        } else {
            let mut seen = self.seen.clone();
            seen.push(self.board.get_hash());
            Position {
                board,
                halfmove_clock: self.halfmove_clock + 1,
                seen,
            }
        }
    }

    /// Return `true` if the side to move is in check.
    pub fn in_check(&self) -> bool {
        *self.board.checkers() != EMPTY
    }

    /// Return `true` if the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    /// Return `true` if the side to move is stalemated.
    pub fn is_stalemate(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
    }

    /// Return `true` if this position has occurred three times in the
    /// current reversible sequence.
    pub fn is_threefold_repetition(&self) -> bool {
        let current = self.board.get_hash();
        self.seen.iter().filter(|&&key| key == current).count() >= 2
    }

    /// Return `true` if fifty full moves have passed without a pawn move
    /// or capture.
    pub fn is_fifty_moves(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Return `true` if neither side retains mating material.
    ///
    /// Covers king vs king, king and one minor piece vs king, and positions
    /// where the only remaining pieces are bishops all standing on squares
    /// of one color.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = *self.board.pieces(Piece::Pawn)
            | *self.board.pieces(Piece::Rook)
            | *self.board.pieces(Piece::Queen);
        if heavy != EMPTY {
            return false;
        }

        let knights = *self.board.pieces(Piece::Knight);
        let bishops = *self.board.pieces(Piece::Bishop);
        match (knights | bishops).popcnt() {
            0 | 1 => true,
            _ if knights != EMPTY => false,
            _ => {
                let mut square_colors = bishops.map(square_color);
                let first = square_colors.next();
                square_colors.all(|c| Some(c) == first)
            }
        }
    }

    /// Return `true` if any drawn condition other than stalemate holds.
    pub fn is_draw(&self) -> bool {
        self.is_fifty_moves() || self.is_threefold_repetition() || self.is_insufficient_material()
    }

    /// Return `true` if the game is over in this position.
    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_stalemate() || self.is_draw()
    }

    /// Wrap the position for ASCII rendering.
    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

fn square_color(square: Square) -> usize {
    (square.get_rank().to_index() + square.get_file().to_index()) % 2
}

/// ASCII board rendering, white's point of view.
pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = self.0;
        for rank_idx in (0..8usize).rev() {
            write!(f, "{}  ", rank_idx + 1)?;
            for file_idx in 0..8usize {
                let sq = Square::make_square(
                    chess::Rank::from_index(rank_idx),
                    chess::File::from_index(file_idx),
                );
                let c = match position.piece_at(sq) {
                    Some((piece, Color::White)) => piece_char(piece).to_ascii_uppercase(),
                    Some((piece, Color::Black)) => piece_char(piece),
                    None => '.',
                };
                if file_idx < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

fn piece_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}
