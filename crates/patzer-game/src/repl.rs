//! Event-driven interactive loop.
//!
//! A stdin reader thread and a selection worker thread feed one channel;
//! the loop owns the session and is the only place state changes. Engine
//! selections are computed off-thread and committed through the ticket
//! protocol, so a selection that outlives an undo or reset is discarded.

use std::io::{self, BufRead};
use std::sync::mpsc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, warn};

use patzer_board::{ChessMove, Color, format_move};
use patzer_engine::{Difficulty, select_move};

use crate::command::{Command, parse_command};
use crate::session::{GameMode, MoveOutcome, SelectionTicket, Session};

/// Events processed by the main loop.
enum Event {
    Input(String),
    SelectionDone {
        ticket: SelectionTicket,
        mv: Option<ChessMove>,
    },
    InputClosed,
}

/// The interactive front end, holding the session and selection state.
pub struct Repl {
    session: Session,
    rng: StdRng,
    selecting: bool,
}

impl Repl {
    /// Create a front end with a fresh session and an entropy-seeded RNG.
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Repl {
        Repl {
            session: Session::new(mode, difficulty),
            rng: StdRng::from_entropy(),
            selecting: false,
        }
    }

    /// Run the loop, reading from stdin until `quit` or input closes.
    pub fn run(mut self) {
        let (tx, rx) = mpsc::channel::<Event>();

        // Spawn stdin reader thread
        let stdin_tx = tx.clone();
        std::thread::spawn(move || {
            let stdin = io::stdin();
            let reader = stdin.lock();
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        let trimmed = line.trim().to_string();
                        if trimmed.is_empty() {
                            continue;
                        }
                        if stdin_tx.send(Event::Input(trimmed)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        let _ = stdin_tx.send(Event::InputClosed);
                        break;
                    }
                }
            }
            let _ = stdin_tx.send(Event::InputClosed);
        });

        println!("{}", self.session.game().position().pretty());
        println!("type help for commands");
        self.maybe_select(&tx);

        for event in &rx {
            match event {
                Event::Input(line) => {
                    debug!(cmd = %line, "received command");
                    if !self.handle_line(&line, &tx) {
                        break;
                    }
                }
                Event::SelectionDone { ticket, mv } => {
                    self.selecting = false;
                    self.finish_selection(ticket, mv, &tx);
                }
                Event::InputClosed => break,
            }
        }

        info!("patzer shutting down");
    }

    /// Handle one input line; returns `false` to leave the loop.
    fn handle_line(&mut self, line: &str, tx: &mpsc::Sender<Event>) -> bool {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                println!("error: {err}");
                return true;
            }
        };

        match command {
            Command::Quit => return false,
            Command::Help => print_help(),
            Command::New { mode, difficulty } => {
                let difficulty = difficulty.unwrap_or(self.session.difficulty());
                self.session = Session::new(mode, difficulty);
                println!("{}", self.session.game().position().pretty());
                self.maybe_select(tx);
            }
            Command::Move {
                from,
                to,
                promotion,
            } => match self.session.try_move(from, to, promotion) {
                Ok(outcome) => self.report_outcome(outcome, tx),
                Err(err) => println!("error: {err}"),
            },
            Command::Promote(piece) => match self.session.resolve_promotion(piece) {
                Ok(outcome) => self.report_outcome(outcome, tx),
                Err(err) => println!("error: {err}"),
            },
            Command::Cancel => {
                self.session.cancel_promotion();
            }
            Command::Undo => {
                let removed = self.session.undo();
                println!("took back {removed} plies");
                println!("{}", self.session.game().position().pretty());
            }
            Command::Show => println!("{}", self.session.game().position().pretty()),
            Command::Moves => {
                let mut notations: Vec<String> = self
                    .session
                    .game()
                    .legal_moves()
                    .into_iter()
                    .map(format_move)
                    .collect();
                notations.sort();
                println!("{}", notations.join(" "));
            }
            Command::Record => println!("{}", self.session.game().export_record()),
            Command::Difficulty(difficulty) => {
                self.session.set_difficulty(difficulty);
                println!("difficulty set to {difficulty}");
            }
        }
        true
    }

    fn report_outcome(&mut self, outcome: MoveOutcome, tx: &mpsc::Sender<Event>) {
        match outcome {
            MoveOutcome::Applied(record) => {
                println!("played {}", record.notation);
                println!("{}", self.session.game().position().pretty());
                self.announce_result();
                self.maybe_select(tx);
            }
            MoveOutcome::PromotionPending(pending) => {
                println!(
                    "promotion on {}{}: choose with promote q|r|b|n, or cancel",
                    pending.from, pending.to
                );
            }
        }
    }

    /// Kick off an engine selection when it is the engine's turn.
    fn maybe_select(&mut self, tx: &mpsc::Sender<Event>) {
        if self.selecting || !self.session.engine_to_move() {
            return;
        }

        let ticket = self.session.selection_ticket();
        let position = self.session.game().position().clone();
        let difficulty = self.session.difficulty();
        // Each selection gets its own seeded RNG so the worker owns it.
        let mut worker_rng = StdRng::seed_from_u64(self.rng.next_u64());
        let tx = tx.clone();

        self.selecting = true;
        println!("thinking...");
        std::thread::spawn(move || {
            let mv = select_move(&position, difficulty, &mut worker_rng);
            let _ = tx.send(Event::SelectionDone { ticket, mv });
        });
    }

    fn finish_selection(
        &mut self,
        ticket: SelectionTicket,
        mv: Option<ChessMove>,
        tx: &mpsc::Sender<Event>,
    ) {
        let Some(mv) = mv else {
            // No legal move: the game ended before the engine could reply.
            self.announce_result();
            return;
        };

        match self.session.commit_selected(ticket, mv) {
            Ok(MoveOutcome::Applied(record)) => {
                println!("engine plays {}", record.notation);
                println!("{}", self.session.game().position().pretty());
                self.announce_result();
                // In engine-vs-engine setups the reply may trigger another turn.
                self.maybe_select(tx);
            }
            Ok(MoveOutcome::PromotionPending(_)) => {
                // Selected moves always carry their promotion piece.
                warn!("engine selection deferred on promotion");
            }
            Err(err) => {
                warn!(error = %err, "selection not applied");
                self.maybe_select(tx);
            }
        }
    }

    fn announce_result(&self) {
        let position = self.session.game().position();
        if position.is_checkmate() {
            let winner = match position.side_to_move() {
                Color::White => "black",
                Color::Black => "white",
            };
            println!("checkmate — {winner} wins");
        } else if position.is_stalemate() {
            println!("stalemate");
        } else if position.is_threefold_repetition() {
            println!("draw by repetition");
        } else if position.is_fifty_moves() {
            println!("draw by the fifty-move rule");
        } else if position.is_insufficient_material() {
            println!("draw by insufficient material");
        } else if position.in_check() {
            println!("check");
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  new [hvh|white|black] [easy|medium|hard]   start a new game");
    println!("  <move>                                     play a move, e.g. e2e4 or e7e8q");
    println!("  promote <q|r|b|n>                          resolve a pending promotion");
    println!("  cancel                                     cancel a pending promotion");
    println!("  undo                                       take back the last move(s)");
    println!("  show | moves | record                      inspect the game");
    println!("  difficulty <easy|medium|hard>              change engine strength");
    println!("  quit                                       leave");
}
