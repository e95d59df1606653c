use openssl::ssl::{SslConnector, SslStream};
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use crate::errors::*;

/// The byte stream a POP3 connection runs over.
///
/// Reads block until data or end of stream. Writes need not flush on their
/// own, the line writer flushes after every command.
pub trait Transport: Read + Write {
    /// Closes the stream. Further reads and writes fail.
    fn close(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

impl Transport for SslStream<TcpStream> {
    fn close(&mut self) -> io::Result<()> {
        // A peer that already hung up after QUIT makes close_notify fail.
        if let Err(e) = self.shutdown() {
            debug!("TLS shutdown failed: {}", e);
        }
        self.get_ref().shutdown(Shutdown::Both)
    }
}

#[derive(Debug)]
pub enum POP3Stream {
    Plain(TcpStream),
    SSL(SslStream<TcpStream>),
}

impl POP3Stream {
    pub fn is_encrypted(&self) -> bool {
        match *self {
            POP3Stream::Plain(_) => false,
            POP3Stream::SSL(_) => true,
        }
    }

    /// Swaps a plaintext socket for a TLS session on the same socket.
    ///
    /// Issuing whatever command the server expects before the handshake is up
    /// to the caller.
    pub fn upgrade(self, connector: &SslConnector, domain: &str) -> Result<POP3Stream> {
        match self {
            POP3Stream::Plain(tcp) => {
                debug!("Upgrading plain connection to SSL");
                Ok(POP3Stream::SSL(connector.connect(domain, tcp)?))
            }
            POP3Stream::SSL(_) => Err(ErrorKind::AlreadyEncrypted.into()),
        }
    }

    fn tcp(&self) -> &TcpStream {
        match *self {
            POP3Stream::Plain(ref stream) => stream,
            POP3Stream::SSL(ref stream) => stream.get_ref(),
        }
    }

    pub fn set_timeout(&self, timeout: Option<::std::time::Duration>) -> Result<()> {
        let tcp = self.tcp();
        tcp.set_read_timeout(timeout)?;
        tcp.set_write_timeout(timeout)?;
        Ok(())
    }
}

impl Write for POP3Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match *self {
            POP3Stream::Plain(ref mut stream) => stream.write(buf),
            POP3Stream::SSL(ref mut stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match *self {
            POP3Stream::Plain(ref mut stream) => stream.flush(),
            POP3Stream::SSL(ref mut stream) => stream.flush(),
        }
    }
}

impl Read for POP3Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match *self {
            POP3Stream::Plain(ref mut stream) => stream.read(buf),
            POP3Stream::SSL(ref mut stream) => stream.read(buf),
        }
    }
}

impl Transport for POP3Stream {
    fn close(&mut self) -> io::Result<()> {
        match *self {
            POP3Stream::Plain(ref mut stream) => stream.close(),
            POP3Stream::SSL(ref mut stream) => stream.close(),
        }
    }
}

pub(crate) fn unexpected_eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed by server")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use openssl::ssl::SslMethod;

    fn socket_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();
        (client, server)
    }

    #[test]
    fn plain_stream_reads_and_writes() {
        let (client, mut server) = socket_pair();
        let mut stream = POP3Stream::Plain(client);
        assert!(!stream.is_encrypted());

        stream.write_all(b"NOOP\r\n").unwrap();
        stream.flush().unwrap();
        let mut buf = [0u8; 6];
        server.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"NOOP\r\n");

        server.write_all(b"+OK\r\n").unwrap();
        let mut buf = [0u8; 5];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"+OK\r\n");
    }

    #[test]
    fn close_ends_the_peer_read() {
        let (client, mut server) = socket_pair();
        let mut stream = POP3Stream::Plain(client);
        stream.close().unwrap();
        let mut buf = Vec::new();
        assert_eq!(server.read_to_end(&mut buf).unwrap(), 0);
    }

    #[test]
    fn timeout_applies_to_socket() {
        let (client, _server) = socket_pair();
        let stream = POP3Stream::Plain(client);
        let timeout = Some(::std::time::Duration::from_secs(3));
        stream.set_timeout(timeout).unwrap();
        assert_eq!(stream.tcp().read_timeout().unwrap(), timeout);
        assert_eq!(stream.tcp().write_timeout().unwrap(), timeout);
    }

    #[test]
    fn upgrade_against_closed_peer_fails_handshake() {
        let (client, server) = socket_pair();
        drop(server);
        let connector = SslConnector::builder(SslMethod::tls()).unwrap().build();
        let result = POP3Stream::Plain(client).upgrade(&connector, "localhost");
        match result {
            Err(Error(ErrorKind::SslHandshake(_), _)) => {}
            other => panic!("unexpected upgrade result: {:?}", other.map(|_| ())),
        }
    }
}
