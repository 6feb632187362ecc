const BASE_POSITION: &str = "position startpos";
const BESTMOVE: &str = "bestmove";

/// Moves reported by the engine, in the order the replies arrived.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<String>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.moves.push(token.into());
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn into_moves(self) -> Vec<String> {
        self.moves
    }

    /// `position startpos`, followed by ` moves` and every recorded token once
    /// the history is non-empty.
    pub fn position_command(&self) -> String {
        let mut cmd = String::from(BASE_POSITION);
        if !self.moves.is_empty() {
            cmd.push_str(" moves");
            for m in &self.moves {
                cmd.push(' ');
                cmd.push_str(m);
            }
        }
        cmd
    }
}

/// Returns the first token after the first `bestmove` in `line`.
///
/// `None` when the keyword is absent or nothing follows it. The token is taken
/// as-is, so `bestmove (none)` yields `(none)` and a trailing ponder move is
/// skipped.
pub fn extract_bestmove(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(BESTMOVE)?;
    rest.split_whitespace().next()
}
