//! Session-level errors.

use patzer_board::{GameError, Piece, Square};

/// Errors from session operations. Every error leaves the session unchanged.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No legal move runs between the two squares.
    #[error("illegal move from {from} to {to}")]
    IllegalMove {
        /// Requested source square.
        from: Square,
        /// Requested destination square.
        to: Square,
    },

    /// A promotion choice is outstanding; no other move may commit.
    #[error("a promotion choice is pending")]
    PromotionPending,

    /// `resolve_promotion` was called with nothing pending.
    #[error("no promotion is pending")]
    NoPromotionPending,

    /// The supplied piece cannot be promoted to.
    #[error("cannot promote to {piece:?}")]
    InvalidPromotion {
        /// The rejected piece.
        piece: Piece,
    },

    /// The game state changed while the selection was being computed.
    #[error("selection is stale: the game state has changed")]
    StaleSelection,

    /// An error from the underlying game.
    #[error(transparent)]
    Game(#[from] GameError),
}

#[cfg(test)]
mod tests {
    use super::SessionError;
    use patzer_board::Piece;

    #[test]
    fn invalid_promotion_display() {
        let err = SessionError::InvalidPromotion { piece: Piece::King };
        assert_eq!(format!("{err}"), "cannot promote to King");
    }
}
