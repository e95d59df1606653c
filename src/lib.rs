//! A blocking POP3 client.
//!
//! `POP3Connection` issues one command at a time over a single owned stream
//! and returns typed results. Every `-ERR` reply comes back as
//! `ErrorKind::ServerRejected`; nothing is retried.

#[macro_use]
extern crate log;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
extern crate openssl;
extern crate regex;

use openssl::ssl::{SslConnector, SslMethod};
use std::net::TcpStream;

pub mod errors {
    error_chain! {
        foreign_links {
            Io(::std::io::Error);
            SslStack(::openssl::error::ErrorStack);
            SslHandshake(::openssl::ssl::HandshakeError<::std::net::TcpStream>);
            Utf8(::std::string::FromUtf8Error);
        }

        errors {
            MalformedResponse(line: String) {
                description("malformed response")
                display("malformed response: {}", line)
            }
            UnknownResponse(line: String) {
                description("unknown response")
                display("unknown response: {}", line)
            }
            ServerRejected(message: String) {
                description("server rejected the command")
                display("{}", message)
            }
            InvalidFields(reason: String, line: String) {
                description("unexpected response payload")
                display("{}: {}", reason, line)
            }
            InvalidResponse(command: String, detail: String) {
                description("invalid response")
                display("invalid {} response: {}", command, detail)
            }
            InvalidArgument(command: String) {
                description("invalid command argument")
                display("{} argument contains a line break", command)
            }
            InvalidPhase(command: String, phase: String) {
                description("command not allowed in this session phase")
                display("{} is not allowed in the {} phase", command, phase)
            }
            UnknownSecurity(mode: String) {
                description("unknown security mode")
                display("unknown security mode: {}", mode)
            }
            AlreadyEncrypted {
                description("stream is already encrypted")
                display("stream is already encrypted")
            }
            PendingInput(len: usize) {
                description("unread input before stream switch")
                display("{} unread bytes before stream switch", len)
            }
        }
    }

    impl Error {
        /// The text of a `-ERR` reply, if that is what this error is.
        pub fn server_message(&self) -> Option<&str> {
            match *self.kind() {
                ErrorKind::ServerRejected(ref message) => Some(message.as_str()),
                _ => None,
            }
        }
    }
}
use errors::*;

mod account;
mod pop3command;
pub mod pop3result;
mod pop3resultimpl;
mod pop3state;
mod tcpstream;
mod textconn;

pub use account::{AccountConfig, Security};
pub use pop3command::Command;
pub use pop3result::{EmailMetadata, EmailUid, POP3Stat};
pub use pop3state::POP3State;
pub use tcpstream::{POP3Stream, Transport};
pub use textconn::{parse_response, TextConn};

use pop3resultimpl::{invalid_response, parse_listing};

pub struct POP3Connection<S: Transport> {
    conn: TextConn<S>,
    greeting: String,
    state: POP3State,
    enforce_phases: bool,
}

impl POP3Connection<POP3Stream> {
    /// Opens a socket to the account's server, wraps it in TLS when the
    /// account asks for it, and reads the greeting.
    pub fn connect(account: &AccountConfig) -> Result<POP3Connection<POP3Stream>> {
        trace!("Initiate POP3 Connection");
        let tcp_stream = TcpStream::connect((&account.host[..], account.port))?;
        let stream = POP3Stream::Plain(tcp_stream);
        // Timeouts go on the socket before the TLS handshake starts.
        stream.set_timeout(account.timeout_duration())?;
        let stream = match account.security {
            Security::Plain => {
                debug!("Creating a Plain TCP Connection");
                stream
            }
            Security::SSL => {
                debug!("Creating a SSL Connection");
                let connector = SslConnector::builder(SslMethod::tls())?.build();
                stream.upgrade(&connector, &account.host[..])?
            }
        };
        trace!("Connection Established");

        let mut ctx = POP3Connection::new(stream)?;
        ctx.set_phase_checks(account.enforce_phases);
        Ok(ctx)
    }
}

impl<S: Transport> POP3Connection<S> {
    /// Takes over an already connected stream and reads the server greeting.
    /// No connection is returned unless the greeting is a positive reply.
    pub fn new(stream: S) -> Result<POP3Connection<S>> {
        let mut conn = TextConn::new(stream);
        trace!("Reading Greeting from Server");
        let greeting = conn.read_response()?;
        let ctx = POP3Connection {
            conn,
            greeting,
            state: POP3State::Authorization,
            enforce_phases: false,
        };
        debug!("POP3State::{:?}", ctx.state);
        Ok(ctx)
    }

    /// The text of the server's greeting, after the status token.
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn state(&self) -> POP3State {
        self.state
    }

    /// When on, commands the current phase does not allow fail with
    /// `ErrorKind::InvalidPhase` before anything is written.
    pub fn set_phase_checks(&mut self, enforce: bool) {
        self.enforce_phases = enforce;
    }

    pub fn user(&mut self, name: &str) -> Result<()> {
        self.simple_command(Command::User(name))
    }

    pub fn pass(&mut self, password: &str) -> Result<()> {
        self.simple_command(Command::Pass(password))
    }

    /// USER followed by PASS. Stops at the first rejection.
    pub fn login(&mut self, name: &str, password: &str) -> Result<()> {
        trace!("Attempting to Login");
        self.user(name)?;
        self.pass(password)
    }

    pub fn stat(&mut self) -> Result<POP3Stat> {
        let text = self.send_command(Command::Stat)?;
        POP3Stat::parse(&text).map_err(|e| invalid_response("STAT", e))
    }

    pub fn list(&mut self, msgnum: u32) -> Result<EmailMetadata> {
        let text = self.send_command(Command::List(Some(msgnum)))?;
        EmailMetadata::parse(&text).map_err(|e| invalid_response("LIST", e))
    }

    pub fn list_all(&mut self) -> Result<Vec<EmailMetadata>> {
        self.send_command(Command::List(None))?;
        let lines = self.conn.read_lines()?;
        parse_listing("LIST", &lines, EmailMetadata::parse)
    }

    /// The raw message, lines joined with CRLF. Dot-stuffing is left as
    /// the server sent it; bytes that are not UTF-8 become U+FFFD.
    pub fn retr(&mut self, msgnum: u32) -> Result<String> {
        self.send_command(Command::Retr(msgnum))?;
        self.conn.read_to_period()
    }

    pub fn uidl(&mut self, msgnum: u32) -> Result<EmailUid> {
        let text = self.send_command(Command::Uidl(Some(msgnum)))?;
        EmailUid::parse(&text).map_err(|e| invalid_response("UIDL", e))
    }

    pub fn uidl_all(&mut self) -> Result<Vec<EmailUid>> {
        self.send_command(Command::Uidl(None))?;
        let lines = self.conn.read_lines()?;
        parse_listing("UIDL", &lines, EmailUid::parse)
    }

    /// Marks a message deleted. The server removes it only when the session
    /// ends with a successful QUIT.
    pub fn dele(&mut self, msgnum: u32) -> Result<()> {
        self.simple_command(Command::Dele(msgnum))
    }

    pub fn noop(&mut self) -> Result<()> {
        self.simple_command(Command::Noop)
    }

    pub fn rset(&mut self) -> Result<()> {
        self.simple_command(Command::Rset)
    }

    pub fn quit(&mut self) -> Result<()> {
        self.simple_command(Command::Quit)
    }

    /// Closes the underlying stream. Does not send QUIT.
    pub fn close(self) -> Result<()> {
        trace!("Closing POP3 Connection");
        self.conn.close()
    }

    fn simple_command(&mut self, command: Command) -> Result<()> {
        let _ = self.send_command(command)?;
        Ok(())
    }

    /// Sends one command and returns the text of its positive status line.
    /// Multi-line commands leave their block to the caller.
    fn send_command(&mut self, command: Command) -> Result<String> {
        if self.enforce_phases && !self.state.permits(&command) {
            bail!(ErrorKind::InvalidPhase(
                command.verb().to_string(),
                format!("{:?}", self.state)
            ));
        }
        trace!("Cmd: {}", command.verb());
        let text = self.conn.command(&command)?;

        let next = self.state.next(&command);
        if next != self.state {
            self.state = next;
            debug!("POP3State::{:?}", self.state);
        }
        Ok(text)
    }
}
