//! Integration tests for move selection across difficulty levels.
//!
//! Verifies the engine-level properties end to end: pruning equivalence,
//! checkmate dominance, reproducibility under a fixed seed, and tactical
//! soundness of the difficulty presets.

use rand::SeedableRng;
use rand::rngs::StdRng;

use patzer_board::{ChessMove, Color, Position, parse_move};
use patzer_engine::{
    Difficulty, INF, MATE_SCORE, Preset, material_for, rank_moves, search, select_move,
    select_move_with, terminal_score,
};

const SCHOLARS_MATE_FEN: &str =
    "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";

const FREE_QUEEN_FEN: &str = "k7/8/4q3/8/8/4R3/8/K7 w - - 0 1";

const ITALIAN_FEN: &str =
    "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

const STALEMATE_FEN: &str = "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1";

fn mv(notation: &str) -> ChessMove {
    let (from, to, promotion) = parse_move(notation).unwrap();
    ChessMove::new(from, to, promotion)
}

/// Unpruned minimax reference used to cross-check the alpha-beta search.
fn minimax_plain(position: &Position, depth: u8, perspective: Color) -> i32 {
    if let Some(score) = terminal_score(position, perspective) {
        return score;
    }
    if depth == 0 {
        return material_for(position, perspective);
    }
    let moves = position.legal_moves();
    if moves.is_empty() {
        return 0;
    }
    let maximizing = position.side_to_move() == perspective;
    let mut best = if maximizing { -INF } else { INF };
    for candidate in moves {
        let score = minimax_plain(&position.after(candidate), depth - 1, perspective);
        best = if maximizing { best.max(score) } else { best.min(score) };
    }
    best
}

// ── Search-level properties ───────────────────────────────────────────────────

#[test]
fn pruning_equivalence_on_middlegame_positions() {
    for fen in [ITALIAN_FEN, SCHOLARS_MATE_FEN, FREE_QUEEN_FEN] {
        let position = Position::from_fen(fen).unwrap();
        let perspective = position.side_to_move();
        for depth in 1..=2 {
            assert_eq!(
                search(&position, depth, -INF, INF, perspective),
                minimax_plain(&position, depth, perspective),
                "pruned score diverged on {fen} at depth {depth}"
            );
        }
    }
}

#[test]
fn checkmate_dominates_any_material_lead() {
    // Mate in one, against a position where White is a full queen up.
    let mate = Position::from_fen(SCHOLARS_MATE_FEN).unwrap();
    let queen_up =
        Position::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();

    let mate_score = search(&mate, 2, -INF, INF, Color::White);
    let material_score = search(&queen_up, 2, -INF, INF, Color::White);
    assert_eq!(mate_score, MATE_SCORE);
    assert!(
        mate_score > material_score,
        "mate ({mate_score}) must outrank material ({material_score})"
    );
}

#[test]
fn terminal_position_short_circuits_selection() {
    let position = Position::from_fen(STALEMATE_FEN).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        select_move(&position, Difficulty::Hard, &mut rng),
        None,
        "no move is available in a stalemate"
    );
}

// ── Selection-level properties ────────────────────────────────────────────────

#[test]
fn free_queen_captured_at_every_difficulty() {
    let position = Position::from_fen(FREE_QUEEN_FEN).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    for difficulty in Difficulty::ALL {
        let preset = Preset {
            depth: difficulty.preset().depth,
            randomness: 0.0,
        };
        let chosen = select_move_with(&position, preset, &mut rng).unwrap();
        assert_eq!(chosen, mv("e3e6"), "{difficulty} should capture the queen");
    }
}

#[test]
fn mate_preferred_over_queen_grab() {
    // Qxf7# is mate; Qxe5 wins a pawn and forks, but mate must win the ranking.
    let position = Position::from_fen(SCHOLARS_MATE_FEN).unwrap();
    let ranked = rank_moves(&position, 2);
    assert_eq!(ranked[0].mv, mv("h5f7"));
    assert_eq!(ranked[0].minimax, MATE_SCORE);
}

#[test]
fn fixed_seed_reproduces_the_full_game_opening() {
    // Play five engine moves from the start with the same seed twice.
    let line_a = play_engine_line(1234, 5);
    let line_b = play_engine_line(1234, 5);
    assert_eq!(line_a, line_b, "identical seeds must yield identical play");
}

fn play_engine_line(seed: u64, plies: usize) -> Vec<ChessMove> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut position = Position::new();
    let mut line = Vec::new();
    for _ in 0..plies {
        let Some(chosen) = select_move(&position, Difficulty::Easy, &mut rng) else {
            break;
        };
        line.push(chosen);
        position = position.after(chosen);
    }
    line
}

#[test]
fn selected_moves_are_always_legal() {
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let position = Position::from_fen(ITALIAN_FEN).unwrap();
        let chosen = select_move(&position, Difficulty::Easy, &mut rng).unwrap();
        assert!(
            position.legal_moves().contains(&chosen),
            "seed {seed} selected an illegal move"
        );
    }
}
