//! Length-prefixed text echo over TCP: the `client` binary sends three tagged
//! messages to port 7896 and prints the replies, the `server` binary echoes
//! them back.

pub mod error;
pub mod tcp_client;
pub mod tcp_server;
pub mod utf;
