//! Capability interface the engine requires from a rules oracle.

use patzer_board::{ChessMove, Color, Piece, Position, Square};

/// The rules-engine capabilities the search and selection layers consume.
///
/// Implementations are value-like: [`after`](Oracle::after) returns a new
/// state and leaves `self` untouched, which keeps sibling branches of the
/// search isolated by construction. Any rules engine exposing this set is
/// substitutable for the default [`Position`] adapter.
pub trait Oracle: Clone {
    /// All legal moves in the current position.
    fn legal_moves(&self) -> Vec<ChessMove>;

    /// The position reached by playing `mv`, which must be legal.
    fn after(&self, mv: ChessMove) -> Self;

    /// The side to move.
    fn side_to_move(&self) -> Color;

    /// The piece and owner on `square`, if any.
    fn piece_at(&self, square: Square) -> Option<(Piece, Color)>;

    /// Return `true` if the side to move is in check.
    fn in_check(&self) -> bool;

    /// Return `true` if the side to move is checkmated.
    fn is_checkmate(&self) -> bool;

    /// Return `true` if the side to move is stalemated.
    fn is_stalemate(&self) -> bool;

    /// Return `true` if any non-stalemate drawn condition holds
    /// (repetition, fifty-move rule, insufficient material).
    fn is_draw(&self) -> bool;
}

impl Oracle for Position {
    fn legal_moves(&self) -> Vec<ChessMove> {
        Position::legal_moves(self)
    }

    fn after(&self, mv: ChessMove) -> Position {
        Position::after(self, mv)
    }

    fn side_to_move(&self) -> Color {
        Position::side_to_move(self)
    }

    fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        Position::piece_at(self, square)
    }

    fn in_check(&self) -> bool {
        Position::in_check(self)
    }

    fn is_checkmate(&self) -> bool {
        Position::is_checkmate(self)
    }

    fn is_stalemate(&self) -> bool {
        Position::is_stalemate(self)
    }

    fn is_draw(&self) -> bool {
        Position::is_draw(self)
    }
}
