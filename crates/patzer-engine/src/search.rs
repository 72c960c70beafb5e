//! Depth-bounded minimax search with alpha-beta pruning.

use patzer_board::Color;

use crate::eval::material_for;
use crate::oracle::Oracle;

/// Score bound outside any reachable value.
pub const INF: i32 = 10_000_000;

/// Checkmate sentinel. Larger in magnitude than any possible material
/// differential, so mate always outranks a material trade-off.
pub const MATE_SCORE: i32 = 1_000_000;

/// Classify a terminal position from `perspective`'s point of view.
///
/// Checkmate is checked first: the side to move is the side that has been
/// mated, so the score is `-MATE_SCORE` when that side is the perspective
/// and `+MATE_SCORE` otherwise. Every drawn condition scores 0. Returns
/// `None` for a live position.
pub fn terminal_score<O: Oracle>(position: &O, perspective: Color) -> Option<i32> {
    if position.is_checkmate() {
        return Some(if position.side_to_move() == perspective {
            -MATE_SCORE
        } else {
            MATE_SCORE
        });
    }
    if position.is_stalemate() || position.is_draw() {
        return Some(0);
    }
    None
}

/// Minimax search with alpha-beta pruning.
///
/// Scores `position` from `perspective`'s point of view, looking `depth`
/// plies ahead. Terminal positions short-circuit regardless of depth; at
/// depth 0 the material balance is returned. The side to move maximizes
/// when it equals `perspective` and minimizes otherwise.
///
/// Pruning is value-preserving: for any move ordering the result equals an
/// unpruned minimax traversal, only the node count differs. Recursion is
/// copy-on-apply, so sibling branches never observe each other's state.
pub fn search<O: Oracle>(
    position: &O,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    perspective: Color,
) -> i32 {
    if let Some(score) = terminal_score(position, perspective) {
        return score;
    }
    if depth == 0 {
        return material_for(position, perspective);
    }

    let moves = position.legal_moves();
    if moves.is_empty() {
        // Terminal classification should have caught this.
        return 0;
    }

    if position.side_to_move() == perspective {
        let mut best = -INF;
        for mv in moves {
            let child = position.after(mv);
            best = best.max(search(&child, depth - 1, alpha, beta, perspective));
            alpha = alpha.max(best);
            if alpha >= beta {
                break;
            }
        }
        best
    } else {
        let mut best = INF;
        for mv in moves {
            let child = position.after(mv);
            best = best.min(search(&child, depth - 1, alpha, beta, perspective));
            beta = beta.min(best);
            if alpha >= beta {
                break;
            }
        }
        best
    }
}
