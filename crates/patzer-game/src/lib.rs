//! Game sessions: mode-aware state transitions and the interactive front end.

mod command;
mod error;
mod repl;
mod session;

pub use command::{Command, parse_command};
pub use error::SessionError;
pub use patzer_engine::Difficulty;
pub use repl::Repl;
pub use session::{GameMode, MoveOutcome, PendingPromotion, SelectionTicket, Session};
