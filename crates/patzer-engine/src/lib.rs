//! Move selection for patzer: material evaluation, bounded alpha-beta
//! search, and difficulty-scaled ranking.

pub mod eval;
pub mod oracle;
pub mod search;
pub mod select;

pub use eval::{PIECE_VALUES, material_balance, material_for};
pub use oracle::Oracle;
pub use search::{INF, MATE_SCORE, search, terminal_score};
pub use select::{Difficulty, Preset, ScoredMove, rank_moves, select_move, select_move_with};
