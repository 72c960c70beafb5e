//! Rules-oracle adapter: positions, legal moves, move history, and game records.

mod error;
mod game;
mod position;
mod uci;

pub use chess::{ALL_SQUARES, ChessMove, Color, File, Piece, Rank, Square};
pub use error::GameError;
pub use game::{Game, MoveRecord};
pub use position::{Position, PrettyPosition, STARTING_FEN};
pub use uci::{format_move, format_square, parse_move, parse_square, promotion_piece};
