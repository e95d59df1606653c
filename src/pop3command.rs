use std::fmt;

use crate::errors::*;

/// One POP3 command line, without its terminator.
///
/// `Display` renders the exact wire form: the verb, then an optional
/// argument separated by a single space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    User(&'a str),
    Pass(&'a str),
    Stat,
    List(Option<u32>),
    Retr(u32),
    Dele(u32),
    Noop,
    Rset,
    Quit,
    Uidl(Option<u32>),
}

impl<'a> Command<'a> {
    pub fn verb(&self) -> &'static str {
        match *self {
            Command::User(_) => "USER",
            Command::Pass(_) => "PASS",
            Command::Stat => "STAT",
            Command::List(_) => "LIST",
            Command::Retr(_) => "RETR",
            Command::Dele(_) => "DELE",
            Command::Noop => "NOOP",
            Command::Rset => "RSET",
            Command::Quit => "QUIT",
            Command::Uidl(_) => "UIDL",
        }
    }

    /// Refuses text arguments that would smuggle a second command onto the
    /// wire.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Command::User(arg) | Command::Pass(arg) => {
                if arg.contains(|c: char| c == '\r' || c == '\n') {
                    bail!(ErrorKind::InvalidArgument(self.verb().to_string()));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// The command as it may appear in logs.
    pub fn redacted(&self) -> String {
        match *self {
            Command::Pass(_) => "PASS ********".to_string(),
            _ => self.to_string(),
        }
    }
}

impl<'a> fmt::Display for Command<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Command::User(arg) | Command::Pass(arg) => write!(f, "{} {}", self.verb(), arg),
            Command::List(Some(msgnum))
            | Command::Uidl(Some(msgnum))
            | Command::Retr(msgnum)
            | Command::Dele(msgnum) => write!(f, "{} {}", self.verb(), msgnum),
            _ => f.write_str(self.verb()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_forms() {
        assert_eq!(Command::User("testuser").to_string(), "USER testuser");
        assert_eq!(Command::Pass("secret").to_string(), "PASS secret");
        assert_eq!(Command::Stat.to_string(), "STAT");
        assert_eq!(Command::List(None).to_string(), "LIST");
        assert_eq!(Command::List(Some(1)).to_string(), "LIST 1");
        assert_eq!(Command::Retr(12).to_string(), "RETR 12");
        assert_eq!(Command::Dele(3).to_string(), "DELE 3");
        assert_eq!(Command::Noop.to_string(), "NOOP");
        assert_eq!(Command::Rset.to_string(), "RSET");
        assert_eq!(Command::Quit.to_string(), "QUIT");
        assert_eq!(Command::Uidl(None).to_string(), "UIDL");
        assert_eq!(Command::Uidl(Some(4)).to_string(), "UIDL 4");
    }

    #[test]
    fn line_breaks_in_arguments_are_refused() {
        assert!(Command::User("bob").validate().is_ok());
        assert!(Command::User("").validate().is_ok());

        match Command::User("bob\r\nDELE 1").validate() {
            Err(Error(ErrorKind::InvalidArgument(ref verb), _)) => assert_eq!(verb, "USER"),
            other => panic!("unexpected: {:?}", other),
        }
        match Command::Pass("pw\n").validate() {
            Err(Error(ErrorKind::InvalidArgument(ref verb), _)) => assert_eq!(verb, "PASS"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn password_is_redacted() {
        assert_eq!(Command::Pass("hunter2").redacted(), "PASS ********");
        assert_eq!(Command::User("bob").redacted(), "USER bob");
        assert_eq!(Command::Dele(2).redacted(), "DELE 2");
    }
}
