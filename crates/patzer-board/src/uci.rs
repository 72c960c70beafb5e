//! Coordinate-notation parsing and formatting (`e2e4`, `e7e8q`).

use chess::{ChessMove, File, Piece, Rank, Square};

use crate::error::GameError;

/// Parse a square name like `e4`.
pub fn parse_square(text: &str) -> Result<Square, GameError> {
    let invalid = || GameError::InvalidSquare {
        text: text.to_string(),
    };

    let mut chars = text.chars();
    let file = chars.next().ok_or_else(invalid)?;
    let rank = chars.next().ok_or_else(invalid)?;
    if chars.next().is_some() {
        return Err(invalid());
    }

    let file_idx = (file.to_ascii_lowercase() as i32) - ('a' as i32);
    let rank_idx = (rank as i32) - ('1' as i32);
    if !(0..8).contains(&file_idx) || !(0..8).contains(&rank_idx) {
        return Err(invalid());
    }

    Ok(Square::make_square(
        Rank::from_index(rank_idx as usize),
        File::from_index(file_idx as usize),
    ))
}

/// Format a square as its algebraic name.
pub fn format_square(square: Square) -> String {
    let file = b'a' + square.get_file().to_index() as u8;
    let rank = b'1' + square.get_rank().to_index() as u8;
    format!("{}{}", file as char, rank as char)
}

/// Parse a promotion piece letter (`n`, `b`, `r`, `q`).
pub fn promotion_piece(letter: char) -> Option<Piece> {
    match letter.to_ascii_lowercase() {
        'n' => Some(Piece::Knight),
        'b' => Some(Piece::Bishop),
        'r' => Some(Piece::Rook),
        'q' => Some(Piece::Queen),
        _ => None,
    }
}

fn promotion_letter(piece: Piece) -> Option<char> {
    match piece {
        Piece::Knight => Some('n'),
        Piece::Bishop => Some('b'),
        Piece::Rook => Some('r'),
        Piece::Queen => Some('q'),
        _ => None,
    }
}

/// Parse coordinate notation into source, destination, and optional promotion.
///
/// The result is not validated against any position; legality is the
/// caller's concern.
pub fn parse_move(text: &str) -> Result<(Square, Square, Option<Piece>), GameError> {
    let invalid = || GameError::InvalidNotation {
        text: text.to_string(),
    };

    if !(4..=5).contains(&text.len()) {
        return Err(invalid());
    }

    let from = parse_square(&text[0..2]).map_err(|_| invalid())?;
    let to = parse_square(&text[2..4]).map_err(|_| invalid())?;
    let promotion = match text.chars().nth(4) {
        Some(letter) => Some(promotion_piece(letter).ok_or_else(invalid)?),
        None => None,
    };

    Ok((from, to, promotion))
}

/// Format a move in coordinate notation.
pub fn format_move(mv: ChessMove) -> String {
    let mut out = format!(
        "{}{}",
        format_square(mv.get_source()),
        format_square(mv.get_dest())
    );
    if let Some(letter) = mv.get_promotion().and_then(promotion_letter) {
        out.push(letter);
    }
    out
}
