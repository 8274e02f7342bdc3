use std::fmt;
use std::io::{self, ErrorKind};

/// Failures of a client run. Every one ends the run; none is retried.
#[derive(Debug)]
pub enum ClientError {
    /// The host name could not be resolved.
    Resolve(io::Error),
    /// The peer closed the stream before a whole reply arrived.
    Eof(io::Error),
    /// Any other failure while connecting, sending or receiving.
    Io(io::Error),
    /// Releasing the connection failed.
    Close(io::Error),
}

impl ClientError {
    /// Classifies a failure from the send/receive phase.
    pub fn from_transfer(err: io::Error) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof => ClientError::Eof(err),
            _ => ClientError::Io(err),
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            ClientError::Resolve(_) => "Socket:",
            ClientError::Eof(_) => "EOF:",
            ClientError::Io(_) => "readline:",
            ClientError::Close(_) => "close:",
        }
    }

    pub fn io_error(&self) -> &io::Error {
        match self {
            ClientError::Resolve(e)
            | ClientError::Eof(e)
            | ClientError::Io(e)
            | ClientError::Close(e) => e,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix(), self.io_error())
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.io_error())
    }
}
