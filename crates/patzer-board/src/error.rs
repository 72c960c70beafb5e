//! Error types for move application and game-record parsing.

/// Errors from applying moves or parsing positions and records.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Failed to parse a FEN string.
    #[error("invalid FEN: {fen}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
    },

    /// A square name is not a file letter followed by a rank digit.
    #[error("invalid square: {text}")]
    InvalidSquare {
        /// The square text that failed to parse.
        text: String,
    },

    /// A move is not in coordinate notation (`e2e4`, `e7e8q`).
    #[error("invalid move notation: {text}")]
    InvalidNotation {
        /// The move text that failed to parse.
        text: String,
    },

    /// The move is not legal in the current position.
    #[error("illegal move: {notation}")]
    IllegalMove {
        /// Coordinate notation of the rejected move.
        notation: String,
    },

    /// A game record is structurally malformed.
    #[error("malformed game record: {reason}")]
    MalformedRecord {
        /// What was wrong with the record.
        reason: String,
    },
}
