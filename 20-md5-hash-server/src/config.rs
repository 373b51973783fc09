//! Settings handed to the server and client at startup.

use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

pub const DEFAULT_PORT: u16 = 5555;

/// Upper bound on the bytes taken by a single read. Each read is hashed on its own.
pub const MAX_CHUNK_SIZE: usize = 1024;

pub const DEFAULT_BACKLOG: u32 = 5;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub backlog: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            backlog: DEFAULT_BACKLOG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    pub server: SocketAddr,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}
