use std::cell::{Cell, RefCell};
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;

use pop3_client::Transport;

/// Plays back a canned server transcript and records what the client sends.
pub struct ScriptedServer {
    input: Cursor<Vec<u8>>,
    written: Rc<RefCell<Vec<u8>>>,
    closed: Rc<Cell<bool>>,
}

/// What the test keeps after the connection takes ownership of the stream.
pub struct Recording {
    written: Rc<RefCell<Vec<u8>>>,
    closed: Rc<Cell<bool>>,
}

impl Recording {
    pub fn sent(&self) -> String {
        String::from_utf8(self.written.borrow().clone()).unwrap()
    }

    pub fn closed(&self) -> bool {
        self.closed.get()
    }
}

/// Builds a server from `\n`-separated lines, sent with CRLF endings.
pub fn server(script: &str) -> (ScriptedServer, Recording) {
    server_bytes(crlf(script).into_bytes())
}

/// Builds a server that sends exactly `script`.
pub fn server_bytes(script: Vec<u8>) -> (ScriptedServer, Recording) {
    let written = Rc::new(RefCell::new(Vec::new()));
    let closed = Rc::new(Cell::new(false));
    let server = ScriptedServer {
        input: Cursor::new(script),
        written: written.clone(),
        closed: closed.clone(),
    };
    (server, Recording { written, closed })
}

pub fn crlf(text: &str) -> String {
    text.replace('\n', "\r\n")
}

impl Read for ScriptedServer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for ScriptedServer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed.get() {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "stream closed"));
        }
        self.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for ScriptedServer {
    fn close(&mut self) -> io::Result<()> {
        self.closed.set(true);
        Ok(())
    }
}
