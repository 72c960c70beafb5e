//! Root-move ranking with difficulty-scaled randomness.

use std::cmp::Ordering;
use std::fmt;

use rand::Rng;
use tracing::debug;

use patzer_board::{ChessMove, Piece, format_move};

use crate::oracle::Oracle;
use crate::search::{INF, search};

/// Engine strength levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Search depth and randomness for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    /// Total search depth in plies, at least 1.
    pub depth: u8,
    /// Probability of picking among the top candidates instead of the best.
    pub randomness: f64,
}

impl Difficulty {
    /// All difficulty levels, weakest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The preset for this level.
    pub const fn preset(self) -> Preset {
        match self {
            Difficulty::Easy => Preset {
                depth: 1,
                randomness: 0.35,
            },
            Difficulty::Medium => Preset {
                depth: 2,
                randomness: 0.18,
            },
            Difficulty::Hard => Preset {
                depth: 3,
                randomness: 0.07,
            },
        }
    }

    /// Resolve a difficulty key, falling back to medium for unknown keys.
    pub fn from_key(key: &str) -> Difficulty {
        match key.to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::default(),
        }
    }

    /// The key naming this level.
    pub const fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A root move with its search score and combined ranking score.
#[derive(Debug, Clone)]
pub struct ScoredMove {
    /// The candidate move.
    pub mv: ChessMove,
    /// Raw minimax score of the position after the move.
    pub minimax: i32,
    /// Minimax score plus the scaled tie-break bonus.
    pub score: f64,
}

// Tie-break bonuses, scaled so the non-mate ceiling stays below one pawn:
// the heuristic can only separate moves the bounded search scores equal,
// never override a real material advantage.
const CAPTURE_BONUS: f64 = 40.0;
const CHECK_BONUS: f64 = 60.0;
const MATE_BONUS: f64 = 10_000.0;
const PIECE_ACTIVITY_BONUS: f64 = 10.0;
const TIE_BREAK_SCALE: f64 = 0.35;

/// How many of the top candidates the randomness may pick among.
const TOP_BAND: usize = 4;

fn tie_break<O: Oracle>(position: &O, child: &O, mv: ChessMove) -> f64 {
    let mover = position.piece_at(mv.get_source()).map(|(piece, _)| piece);
    let is_capture = position.piece_at(mv.get_dest()).is_some()
        || (mover == Some(Piece::Pawn) && mv.get_source().get_file() != mv.get_dest().get_file());

    let mut bonus = 0.0;
    if is_capture {
        bonus += CAPTURE_BONUS;
    }
    if child.is_checkmate() {
        bonus += MATE_BONUS;
    } else if child.in_check() {
        bonus += CHECK_BONUS;
    }
    if mover.is_some_and(|piece| piece != Piece::Pawn) {
        bonus += PIECE_ACTIVITY_BONUS;
    }
    bonus * TIE_BREAK_SCALE
}

/// Score every root move at the given total depth, best first.
///
/// The side to move is the fixed perspective for the whole ranking. Each
/// candidate is applied and the remaining `depth - 1` plies are searched
/// with full alpha-beta bounds; a scaled heuristic bonus then separates
/// near-ties. The sort is stable, so identical inputs rank identically.
pub fn rank_moves<O: Oracle>(position: &O, depth: u8) -> Vec<ScoredMove> {
    let perspective = position.side_to_move();

    let mut scored: Vec<ScoredMove> = position
        .legal_moves()
        .into_iter()
        .map(|mv| {
            let child = position.after(mv);
            let minimax = search(&child, depth.saturating_sub(1), -INF, INF, perspective);
            let score = f64::from(minimax) + tie_break(position, &child, mv);
            debug!(mv = %format_move(mv), minimax, score, "root candidate");
            ScoredMove { mv, minimax, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

/// Select a move at the given difficulty.
///
/// Returns `None` when there is no legal move. The RNG is injected so a
/// fixed seed reproduces the engine's choices exactly.
pub fn select_move<O: Oracle, R: Rng>(
    position: &O,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<ChessMove> {
    select_move_with(position, difficulty.preset(), rng)
}

/// Select a move with an explicit preset.
///
/// With probability `preset.randomness` the choice is uniform among the top
/// `min(4, candidates)` ranked moves; otherwise it is the top-ranked move.
/// A randomness of 0 never consults the RNG.
pub fn select_move_with<O: Oracle, R: Rng>(
    position: &O,
    preset: Preset,
    rng: &mut R,
) -> Option<ChessMove> {
    let ranked = rank_moves(position, preset.depth.max(1));
    if ranked.is_empty() {
        return None;
    }

    let band = ranked.len().min(TOP_BAND);
    let pick = if preset.randomness > 0.0 && rng.gen_bool(preset.randomness.min(1.0)) {
        rng.gen_range(0..band)
    } else {
        0
    };

    let chosen = &ranked[pick];
    debug!(
        mv = %format_move(chosen.mv),
        rank = pick,
        candidates = ranked.len(),
        "selected move"
    );
    Some(chosen.mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patzer_board::{Position, parse_move};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const FREE_QUEEN_FEN: &str = "k7/8/4q3/8/8/4R3/8/K7 w - - 0 1";

    const SCHOLARS_MATE_FEN: &str =
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";

    const MATED_FEN: &str = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1";

    fn mv(notation: &str) -> ChessMove {
        let (from, to, promotion) = parse_move(notation).unwrap();
        ChessMove::new(from, to, promotion)
    }

    fn deterministic(preset_depth: u8) -> Preset {
        Preset {
            depth: preset_depth,
            randomness: 0.0,
        }
    }

    #[test]
    fn presets_match_the_difficulty_table() {
        assert_eq!(Difficulty::Easy.preset(), Preset { depth: 1, randomness: 0.35 });
        assert_eq!(Difficulty::Medium.preset(), Preset { depth: 2, randomness: 0.18 });
        assert_eq!(Difficulty::Hard.preset(), Preset { depth: 3, randomness: 0.07 });
    }

    #[test]
    fn depth_grows_and_randomness_shrinks_with_difficulty() {
        let [easy, medium, hard] = Difficulty::ALL.map(Difficulty::preset);
        assert!(easy.depth < medium.depth && medium.depth < hard.depth);
        assert!(easy.randomness > medium.randomness && medium.randomness > hard.randomness);
    }

    #[test]
    fn unknown_keys_fall_back_to_medium() {
        assert_eq!(Difficulty::from_key("easy"), Difficulty::Easy);
        assert_eq!(Difficulty::from_key("HARD"), Difficulty::Hard);
        assert_eq!(Difficulty::from_key("grandmaster"), Difficulty::Medium);
        assert_eq!(Difficulty::from_key(""), Difficulty::Medium);
    }

    #[test]
    fn free_queen_is_taken_at_every_depth() {
        let position = Position::from_fen(FREE_QUEEN_FEN).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        for depth in 1..=3 {
            let chosen = select_move_with(&position, deterministic(depth), &mut rng).unwrap();
            assert_eq!(chosen, mv("e3e6"), "Rxe6 should win at depth {depth}");
        }
    }

    #[test]
    fn mate_in_one_found_at_every_difficulty() {
        let position = Position::from_fen(SCHOLARS_MATE_FEN).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        for difficulty in Difficulty::ALL {
            let preset = deterministic(difficulty.preset().depth);
            let chosen = select_move_with(&position, preset, &mut rng).unwrap();
            assert_eq!(chosen, mv("h5f7"), "{difficulty} should find Qxf7#");
        }
    }

    #[test]
    fn deeper_search_never_scores_the_best_move_lower() {
        let position = Position::from_fen(SCHOLARS_MATE_FEN).unwrap();
        let mut previous = -INF;
        for difficulty in Difficulty::ALL {
            let best = &rank_moves(&position, difficulty.preset().depth)[0];
            assert!(
                best.minimax >= previous,
                "{difficulty} scored {} after {previous}",
                best.minimax
            );
            previous = best.minimax;
        }
    }

    #[test]
    fn no_legal_moves_returns_none() {
        let position = Position::from_fen(MATED_FEN).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(select_move(&position, Difficulty::Medium, &mut rng), None);
    }

    #[test]
    fn startpos_depth_one_candidates_all_score_zero_material() {
        let ranked = rank_moves(&Position::new(), 1);
        assert_eq!(ranked.len(), 20);
        assert!(
            ranked.iter().all(|candidate| candidate.minimax == 0),
            "no opening move changes material in one ply"
        );
    }

    #[test]
    fn selection_is_deterministic_under_a_fixed_seed() {
        let position = Position::new();
        let first = {
            let mut rng = StdRng::seed_from_u64(42);
            select_move(&position, Difficulty::Easy, &mut rng).unwrap()
        };
        let second = {
            let mut rng = StdRng::seed_from_u64(42);
            select_move(&position, Difficulty::Easy, &mut rng).unwrap()
        };
        assert_eq!(first, second);
    }

    #[test]
    fn randomness_stays_inside_the_top_band() {
        let position = Position::new();
        let ranked = rank_moves(&position, 1);
        let band: Vec<ChessMove> = ranked.iter().take(TOP_BAND).map(|c| c.mv).collect();

        let always_random = Preset {
            depth: 1,
            randomness: 1.0,
        };
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let chosen = select_move_with(&position, always_random, &mut rng).unwrap();
            assert!(band.contains(&chosen), "{chosen} is outside the top band");
        }
    }

    #[test]
    fn zero_randomness_never_consults_the_rng() {
        // Both rngs stay in lockstep because selection must not draw from them.
        let position = Position::new();
        let mut used = StdRng::seed_from_u64(7);
        let mut untouched = StdRng::seed_from_u64(7);
        select_move_with(&position, deterministic(1), &mut used).unwrap();
        assert_eq!(used.gen_range(0..1000), untouched.gen_range(0..1000));
    }

    #[test]
    fn activity_bonus_breaks_ties_among_equal_openings() {
        // All opening moves score zero material, so ordering is driven by
        // the tie-break: knight development outranks pawn pushes.
        let position = Position::new();
        let ranked = rank_moves(&position, 1);
        let top = ranked.first().unwrap();
        let (piece, _) = position.piece_at(top.mv.get_source()).unwrap();
        assert_ne!(piece, Piece::Pawn, "a non-pawn move should rank first");
    }

    #[test]
    fn tie_break_never_overrides_a_pawn_of_material() {
        let non_mate_ceiling =
            (CAPTURE_BONUS + CHECK_BONUS + PIECE_ACTIVITY_BONUS) * TIE_BREAK_SCALE;
        assert!(non_mate_ceiling < 100.0);
    }
}
