use crate::error::ClientError;
use crate::utf;
use log::{debug, info};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

/// Port the echo server listens on.
pub const PORT: u16 = 7896;
/// Request/reply pairs per run.
pub const ROUNDS: usize = 3;

/// An open connection to the echo server.
///
/// `close` consumes the connection, so it can run at most once.
pub struct Connection {
    stream: TcpStream,
}

impl Connection {
    pub fn open(host: &str, port: u16) -> Result<Self, ClientError> {
        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|e| {
                ClientError::Resolve(io::Error::new(e.kind(), format!("{}: {}", host, e)))
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ClientError::Resolve(io::Error::new(
                ErrorKind::NotFound,
                format!("{}: no addresses found", host),
            )));
        }
        debug!("{} resolved to {:?}", host, addrs);

        let stream = TcpStream::connect(&addrs[..]).map_err(ClientError::Io)?;
        info!("Connected to {}:{}", host, port);
        Ok(Connection { stream })
    }

    pub fn stream_mut(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Shuts the stream down in both directions and releases the socket.
    pub fn close(self) -> io::Result<()> {
        let result = match self.stream.shutdown(Shutdown::Both) {
            // the peer already tore the connection down
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            other => other,
        };
        debug!("Connection closed");
        result
    }
}

/// Text of the request sent in round `index`.
pub fn message(tag: &str, index: usize) -> String {
    format!("{} {}", tag, index)
}

/// Sends `rounds` tagged requests, waiting for one reply after each.
///
/// Stops at the first failure without sending anything further.
pub fn exchange<S, F>(
    stream: &mut S,
    tag: &str,
    rounds: usize,
    mut on_reply: F,
) -> Result<(), ClientError>
where
    S: Read + Write,
    F: FnMut(&str),
{
    for index in 0..rounds {
        let request = message(tag, index);
        debug!("Sending {:?}", request);
        utf::write_utf(stream, &request).map_err(ClientError::from_transfer)?;

        let reply = utf::read_utf(stream).map_err(ClientError::from_transfer)?;
        debug!("Received {:?}", reply);
        on_reply(&reply);
    }
    Ok(())
}

/// Outcome of one client run.
#[derive(Debug, Default)]
pub struct Report {
    pub received: usize,
    pub failure: Option<ClientError>,
    pub close_failure: Option<ClientError>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failure.is_none() && self.close_failure.is_none()
    }

    /// Diagnostic lines in the order they are printed. A close failure never
    /// replaces the failure that ended the exchange.
    pub fn diagnostics(&self) -> Vec<String> {
        self.failure
            .iter()
            .chain(self.close_failure.iter())
            .map(ToString::to_string)
            .collect()
    }
}

/// Connects to `host:port`, runs `ROUNDS` exchanges and closes the
/// connection on every path that opened it. `on_reply` sees each reply as
/// soon as it arrives.
pub fn run<F: FnMut(&str)>(tag: &str, host: &str, port: u16, mut on_reply: F) -> Report {
    let mut report = Report::default();
    let mut conn = match Connection::open(host, port) {
        Ok(conn) => conn,
        Err(e) => {
            report.failure = Some(e);
            return report;
        }
    };

    let mut received = 0;
    let result = exchange(conn.stream_mut(), tag, ROUNDS, |reply| {
        received += 1;
        on_reply(reply);
    });
    report.received = received;
    report.failure = result.err();

    if let Err(e) = conn.close() {
        report.close_failure = Some(ClientError::Close(e));
    }
    report
}
