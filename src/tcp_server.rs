use crate::utf;
use anyhow::Context;
use log::{debug, error, info};
use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::thread;

pub fn serve(address: &str) -> anyhow::Result<()> {
    let listener =
        TcpListener::bind(address).with_context(|| format!("Failed to bind {}", address))?;
    serve_on(listener)
}

/// Accepts connections forever, echoing every message back on its own thread.
pub fn serve_on(listener: TcpListener) -> anyhow::Result<()> {
    info!("Listening on {}", listener.local_addr()?);
    loop {
        let (stream, _) = listener.accept()?;
        thread::spawn(move || {
            handler(stream).unwrap_or_else(|error| error!("{:#}", error));
        });
    }
}

fn handler(mut stream: TcpStream) -> anyhow::Result<()> {
    let peer = stream.peer_addr()?;
    debug!("Handling data from {}", peer);

    loop {
        let data = match utf::read_utf(&mut stream) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                debug!("Connection closed by {}", peer);
                return Ok(());
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read from {}", peer)),
        };

        info!("{}: {}", peer, data);
        utf::write_utf(&mut stream, &data)
            .with_context(|| format!("Failed to reply to {}", peer))?;
    }
}
