use std::fmt;
use std::process::ExitStatus;

use log::{error, info, warn};

use crate::error::DriverError;
use crate::history::{extract_bestmove, MoveHistory};
use crate::types::DriverConfig;
use crate::uci::Session;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineCommand {
    Uci,
    IsReady,
    Position(String),
    Go,
    Quit,
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uci => f.write_str("uci"),
            Self::IsReady => f.write_str("isready"),
            Self::Position(cmd) => f.write_str(cmd),
            Self::Go => f.write_str("go"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The engine closed its output.
    EndOfStream,
    /// `max_moves` was reached and `quit` was sent.
    MoveLimit,
}

#[derive(Debug)]
pub struct RunSummary {
    pub moves: Vec<String>,
    pub termination: Termination,
    pub exit_status: Option<ExitStatus>,
}

/// Line-count driven UCI self-play loop.
///
/// The first four lines of engine output only advance the handshake; their
/// content is never inspected. Every later line is checked for `bestmove`.
pub struct Driver {
    lines_seen: usize,
    history: MoveHistory,
    max_moves: Option<usize>,
}

impl Driver {
    pub fn new(max_moves: Option<usize>) -> Self {
        Self { lines_seen: 0, history: MoveHistory::new(), max_moves }
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn into_history(self) -> MoveHistory {
        self.history
    }

    /// Advances the state machine by one line and returns what to send back.
    pub fn handle_line(&mut self, line: &str) -> Vec<EngineCommand> {
        let index = self.lines_seen;
        self.lines_seen += 1;
        match index {
            0 => Vec::new(),
            1 => vec![EngineCommand::Uci],
            2 => vec![EngineCommand::IsReady],
            3 => self.next_search(),
            _ => self.handle_reply(line),
        }
    }

    fn handle_reply(&mut self, line: &str) -> Vec<EngineCommand> {
        if !line.contains("bestmove") {
            return Vec::new();
        }
        match extract_bestmove(line) {
            Some(token) => self.history.push(token),
            None => warn!("bestmove reply without a move, repeating the search: {:?}", line),
        }
        self.next_search()
    }

    fn next_search(&self) -> Vec<EngineCommand> {
        if self.limit_reached() {
            return vec![EngineCommand::Quit];
        }
        vec![EngineCommand::Position(self.history.position_command()), EngineCommand::Go]
    }

    fn limit_reached(&self) -> bool {
        self.max_moves.is_some_and(|max| self.history.len() >= max)
    }

    /// Reads engine output until it ends or the move limit is hit.
    ///
    /// Each position command is echoed to stdout as it is sent.
    pub async fn drive(&mut self, session: &mut Session) -> Result<Termination, DriverError> {
        loop {
            let Some(line) = session.read_line().await? else {
                info!("engine closed its output after {} moves", self.history.len());
                return Ok(Termination::EndOfStream);
            };
            for command in self.handle_line(&line) {
                session.write_line(&command.to_string()).await?;
                match command {
                    EngineCommand::Position(ref cmd) => println!("{}", cmd),
                    EngineCommand::Quit => {
                        info!("move limit reached after {} moves", self.history.len());
                        return Ok(Termination::MoveLimit);
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Spawns the configured engine, drives it to completion and reaps it.
pub async fn run(config: &DriverConfig) -> Result<RunSummary, DriverError> {
    let mut session = Session::spawn(&config.engine)
        .await?
        .with_read_timeout(config.read_timeout());
    let mut driver = Driver::new(config.max_moves);

    let outcome = driver.drive(&mut session).await;
    if let Err(ref e) = outcome {
        error!("engine session failed: {}", e);
    }

    let exit_status = match session.close(config.shutdown_grace()).await {
        Ok(status) => Some(status),
        Err(e) => {
            warn!("failed to reap engine: {}", e);
            None
        }
    };

    Ok(RunSummary {
        moves: driver.into_history().into_moves(),
        termination: outcome?,
        exit_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(driver: &mut Driver, lines: &[&str]) -> Vec<String> {
        lines.iter().flat_map(|line| driver.handle_line(line)).map(|c| c.to_string()).collect()
    }

    #[test]
    fn handshake_then_two_searches() {
        let mut driver = Driver::new(None);
        let sent = feed(
            &mut driver,
            &["info ...", "uciok", "readyok", "bestmove e2e4 ponder e7e5", "bestmove d7d5"],
        );
        assert_eq!(
            sent,
            vec![
                "uci",
                "isready",
                "position startpos",
                "go",
                "position startpos moves e2e4",
                "go",
                "position startpos moves e2e4 d7d5",
                "go",
            ]
        );
        assert_eq!(driver.history().moves(), ["e2e4", "d7d5"]);
    }

    #[test]
    fn handshake_ignores_line_content() {
        let mut driver = Driver::new(None);
        let sent = feed(
            &mut driver,
            &["bestmove a2a3", "bestmove b2b3", "bestmove c2c3", "bestmove d2d3"],
        );
        assert_eq!(sent, vec!["uci", "isready", "position startpos", "go"]);
        assert!(driver.history().is_empty());
    }

    #[test]
    fn history_grows_once_per_bestmove() {
        let mut driver = Driver::new(None);
        feed(&mut driver, &["a", "b", "c", "d"]);
        let replies = ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"];
        for (n, mv) in replies.iter().enumerate() {
            driver.handle_line(&format!("bestmove {}", mv));
            assert_eq!(driver.history().len(), n + 1);
        }
        assert_eq!(driver.history().moves(), replies);
        assert_eq!(
            driver.history().position_command(),
            "position startpos moves e2e4 e7e5 g1f3 b8c6 f1b5"
        );
    }

    #[test]
    fn non_bestmove_reply_is_silently_skipped() {
        let mut driver = Driver::new(None);
        feed(&mut driver, &["a", "b", "c", "d"]);
        assert!(driver.handle_line("info depth 20 score cp 15 pv e2e4").is_empty());
        assert!(driver.handle_line("readyok").is_empty());
        assert!(driver.history().is_empty());

        let sent = driver.handle_line("bestmove e2e4");
        assert_eq!(
            sent,
            vec![EngineCommand::Position("position startpos moves e2e4".into()), EngineCommand::Go]
        );
    }

    #[test]
    fn none_move_is_recorded_literally() {
        let mut driver = Driver::new(None);
        feed(&mut driver, &["a", "b", "c", "d", "bestmove (none)"]);
        assert_eq!(driver.history().moves(), ["(none)"]);
    }

    #[test]
    fn bare_bestmove_repeats_the_search() {
        let mut driver = Driver::new(None);
        feed(&mut driver, &["a", "b", "c", "d", "bestmove e2e4"]);

        let sent = driver.handle_line("bestmove");
        assert_eq!(
            sent,
            vec![EngineCommand::Position("position startpos moves e2e4".into()), EngineCommand::Go]
        );
        assert_eq!(driver.history().moves(), ["e2e4"]);

        let sent = feed(&mut driver, &["bestmove   ", "bestmove e7e5"]);
        assert_eq!(
            sent,
            vec!["position startpos moves e2e4", "go", "position startpos moves e2e4 e7e5", "go"]
        );
    }

    #[test]
    fn move_limit_sends_quit_instead_of_search() {
        let mut driver = Driver::new(Some(2));
        let sent = feed(&mut driver, &["a", "b", "c", "d", "bestmove e2e4", "bestmove e7e5"]);
        assert_eq!(sent.last().map(String::as_str), Some("quit"));
        assert_eq!(sent.iter().filter(|c| *c == "go").count(), 2);
        assert_eq!(driver.history().len(), 2);
    }

    #[test]
    fn zero_move_limit_quits_after_handshake() {
        let mut driver = Driver::new(Some(0));
        let sent = feed(&mut driver, &["a", "b", "c", "d"]);
        assert_eq!(sent, vec!["uci", "isready", "quit"]);
    }
}
