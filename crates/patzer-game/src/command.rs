//! Line-command parsing for the interactive front end.

use patzer_board::{Color, GameError, Piece, Square, parse_move, promotion_piece};
use patzer_engine::Difficulty;

use crate::session::GameMode;

/// A parsed front-end command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new game.
    New {
        /// Mode for the new game.
        mode: GameMode,
        /// Difficulty override, when given.
        difficulty: Option<Difficulty>,
    },
    /// Play a move given in coordinate notation.
    Move {
        /// Source square.
        from: Square,
        /// Destination square.
        to: Square,
        /// Promotion piece, for pawn promotions.
        promotion: Option<Piece>,
    },
    /// Resolve a pending promotion.
    Promote(Piece),
    /// Cancel a pending promotion.
    Cancel,
    /// Take back the last move(s).
    Undo,
    /// Print the board.
    Show,
    /// List the legal moves.
    Moves,
    /// Print the serialized game record.
    Record,
    /// Change the difficulty.
    Difficulty(Difficulty),
    /// Print command help.
    Help,
    /// Leave the program.
    Quit,
}

/// Parse one input line.
///
/// A bare move like `e2e4` is accepted without the `move` keyword. Unknown
/// difficulty keys are normalized rather than rejected, matching the preset
/// table's fallback.
pub fn parse_command(line: &str) -> Result<Command, GameError> {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Err(GameError::InvalidNotation {
            text: line.to_string(),
        });
    };

    match head.to_ascii_lowercase().as_str() {
        "new" => {
            let mut mode = GameMode::default();
            let mut difficulty = None;
            for token in tokens {
                match token.to_ascii_lowercase().as_str() {
                    "hvh" | "human" => mode = GameMode::HumanVsHuman,
                    "white" => {
                        mode = GameMode::VsEngine {
                            engine_color: Color::White,
                        }
                    }
                    "black" => {
                        mode = GameMode::VsEngine {
                            engine_color: Color::Black,
                        }
                    }
                    key => difficulty = Some(Difficulty::from_key(key)),
                }
            }
            Ok(Command::New { mode, difficulty })
        }
        "move" => {
            let text = tokens.next().unwrap_or("");
            let (from, to, promotion) = parse_move(text)?;
            Ok(Command::Move {
                from,
                to,
                promotion,
            })
        }
        "promote" => {
            let letter = tokens
                .next()
                .and_then(|token| token.chars().next())
                .unwrap_or(' ');
            let piece = promotion_piece(letter).ok_or_else(|| GameError::InvalidNotation {
                text: line.to_string(),
            })?;
            Ok(Command::Promote(piece))
        }
        "cancel" => Ok(Command::Cancel),
        "undo" => Ok(Command::Undo),
        "show" | "board" => Ok(Command::Show),
        "moves" => Ok(Command::Moves),
        "record" => Ok(Command::Record),
        "difficulty" => {
            let key = tokens.next().unwrap_or("");
            Ok(Command::Difficulty(Difficulty::from_key(key)))
        }
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => {
            // Fall back to treating the whole token as a move.
            let (from, to, promotion) = parse_move(head)?;
            Ok(Command::Move {
                from,
                to,
                promotion,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patzer_board::parse_square;

    #[test]
    fn bare_move_parses() {
        let cmd = parse_command("e2e4").unwrap();
        assert_eq!(
            cmd,
            Command::Move {
                from: parse_square("e2").unwrap(),
                to: parse_square("e4").unwrap(),
                promotion: None,
            }
        );
    }

    #[test]
    fn move_keyword_with_promotion() {
        let cmd = parse_command("move e7e8q").unwrap();
        let Command::Move { promotion, .. } = cmd else {
            panic!("expected a move");
        };
        assert_eq!(promotion, Some(Piece::Queen));
    }

    #[test]
    fn new_with_mode_and_difficulty() {
        let cmd = parse_command("new white hard").unwrap();
        assert_eq!(
            cmd,
            Command::New {
                mode: GameMode::VsEngine {
                    engine_color: Color::White,
                },
                difficulty: Some(Difficulty::Hard),
            }
        );
    }

    #[test]
    fn new_defaults_to_engine_as_black() {
        let cmd = parse_command("new").unwrap();
        assert_eq!(
            cmd,
            Command::New {
                mode: GameMode::default(),
                difficulty: None,
            }
        );
    }

    #[test]
    fn unknown_difficulty_key_normalizes() {
        let cmd = parse_command("difficulty grandmaster").unwrap();
        assert_eq!(cmd, Command::Difficulty(Difficulty::Medium));
    }

    #[test]
    fn promote_parses_piece_letter() {
        assert_eq!(parse_command("promote n").unwrap(), Command::Promote(Piece::Knight));
        assert!(parse_command("promote k").is_err());
        assert!(parse_command("promote").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_command("").is_err());
        assert!(parse_command("castle").is_err());
        assert!(parse_command("move e2").is_err());
    }
}
