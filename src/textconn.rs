use std::io::{BufRead, BufReader, Write};

use crate::errors::*;
use crate::pop3command::Command;
use crate::tcpstream::{unexpected_eof, Transport};

const LF: u8 = 0x0a;
const CR: u8 = 0x0d;
const CRLF: &str = "\r\n";

/// Line framing over a single owned stream.
///
/// The reader buffers the stream; writes bypass the buffer through
/// `get_mut`, so there is exactly one handle to the socket.
pub struct TextConn<S: Transport> {
    reader: BufReader<S>,
}

impl<S: Transport> TextConn<S> {
    pub fn new(stream: S) -> TextConn<S> {
        TextConn { reader: BufReader::new(stream) }
    }

    /// Writes `line` followed by CRLF in one write and flushes.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let mut buf = Vec::with_capacity(line.len() + CRLF.len());
        buf.extend_from_slice(line.as_bytes());
        buf.extend_from_slice(CRLF.as_bytes());
        let stream = self.reader.get_mut();
        stream.write_all(&buf)?;
        stream.flush()?;
        Ok(())
    }

    pub fn send(&mut self, command: &Command) -> Result<()> {
        command.validate()?;
        info!("C: {}", command.redacted());
        self.write_line(&command.to_string())
    }

    /// Reads one line, terminator stripped, as raw bytes.
    fn read_raw_line(&mut self) -> Result<Vec<u8>> {
        let mut buff = Vec::new();
        let read = self.reader.read_until(LF, &mut buff)?;
        if read == 0 || buff.last() != Some(&LF) {
            return Err(unexpected_eof().into());
        }
        buff.pop();
        if buff.last() == Some(&CR) {
            buff.pop();
        }
        Ok(buff)
    }

    /// Reads one line and strips its `\n` or `\r\n` terminator. The line
    /// must be UTF-8.
    pub fn read_line(&mut self) -> Result<String> {
        Ok(String::from_utf8(self.read_raw_line()?)?)
    }

    /// Reads lines up to the lone "." sentinel, which is not returned.
    /// Dot-stuffed lines are returned as received. Bytes that are not UTF-8
    /// become U+FFFD; the block is always consumed up to the sentinel.
    pub fn read_lines(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        loop {
            let raw = self.read_raw_line()?;
            if raw == b"." {
                trace!("S: . ({} lines)", lines.len());
                return Ok(lines);
            }
            let line = String::from_utf8_lossy(&raw).into_owned();
            trace!("S: {}", line);
            lines.push(line);
        }
    }

    pub fn read_to_period(&mut self) -> Result<String> {
        Ok(self.read_lines()?.join(CRLF))
    }

    pub fn read_response(&mut self) -> Result<String> {
        let line = self.read_line()?;
        info!("S: {}", line);
        parse_response(&line)
    }

    /// Sends `command` and classifies its status line. Any multi-line block
    /// that follows a positive reply is left for the caller to read.
    pub fn command(&mut self, command: &Command) -> Result<String> {
        self.send(command)?;
        self.read_response()
    }

    /// Hands the raw stream to `upgrade` and frames whatever it returns,
    /// e.g. a TLS session negotiated over the same socket. Refused while the
    /// read buffer still holds bytes the server sent before the switch.
    pub fn replace_stream<T, F>(self, upgrade: F) -> Result<TextConn<T>>
    where
        T: Transport,
        F: FnOnce(S) -> Result<T>,
    {
        if !self.reader.buffer().is_empty() {
            bail!(ErrorKind::PendingInput(self.reader.buffer().len()));
        }
        let stream = upgrade(self.reader.into_inner())?;
        Ok(TextConn::new(stream))
    }

    pub fn close(self) -> Result<()> {
        self.reader.into_inner().close()?;
        Ok(())
    }
}

/// Classifies one status line.
///
/// The status token ends at the first space; a line without any space is
/// malformed, so "+OK" fails while "+OK " succeeds with empty text. "-ERR"
/// becomes `ErrorKind::ServerRejected` with the server's text.
pub fn parse_response(line: &str) -> Result<String> {
    let index = match line.find(' ') {
        Some(index) => index,
        None => return Err(ErrorKind::MalformedResponse(line.to_string()).into()),
    };
    let (status, text) = (&line[..index], &line[index + 1..]);
    if status.eq_ignore_ascii_case("+OK") {
        Ok(text.to_string())
    } else if status.eq_ignore_ascii_case("-ERR") {
        Err(ErrorKind::ServerRejected(text.to_string()).into())
    } else {
        Err(ErrorKind::UnknownResponse(line.to_string()).into())
    }
}
