//! TCP service that answers every chunk a client sends with its MD5 digest.
//!
//! The server accepts connections on a Tokio `TcpListener` and hands each one
//! to its own task. A task reads up to [`config::MAX_CHUNK_SIZE`] bytes at a
//! time and writes back the lowercase hex digest of exactly those bytes. There
//! is no framing: one read is one unit to hash, so a message that arrives in
//! two reads gets two digests.
//!
//! - [`cli`] parses the command-line interface for server and client modes.
//! - [`config`] holds the explicit settings passed into the server and client.
//! - [`digest`] computes the hex digest of a chunk.
//! - [`error`] enumerates the failure kinds of each site.
//! - [`server`] binds the listener and runs the accept loop.
//! - [`worker`] services one connection until the peer goes away.
//! - [`client`] sends a fixed list of messages and collects the digests.

pub mod cli;
pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod server;
pub mod worker;
