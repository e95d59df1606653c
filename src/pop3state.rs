use crate::pop3command::Command;

/// Session phases as seen by the client. There is no UPDATE work to do on
/// this side, `Update` only marks that QUIT was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum POP3State {
    Authorization,
    Transaction,
    Update,
}

impl POP3State {
    pub fn permits(self, command: &Command) -> bool {
        match (self, *command) {
            (POP3State::Authorization, Command::User(_))
            | (POP3State::Authorization, Command::Pass(_))
            | (POP3State::Authorization, Command::Quit) => true,
            (POP3State::Transaction, Command::User(_)) | (POP3State::Transaction, Command::Pass(_)) => false,
            (POP3State::Transaction, _) => true,
            _ => false,
        }
    }

    /// The phase after the server accepted `command`.
    pub fn next(self, command: &Command) -> POP3State {
        match (self, *command) {
            (POP3State::Authorization, Command::Pass(_)) => POP3State::Transaction,
            (_, Command::Quit) => POP3State::Update,
            (state, _) => state,
        }
    }
}
