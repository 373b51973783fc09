//! Per-connection loop: read a chunk, answer with its digest, repeat.

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::{config::MAX_CHUNK_SIZE, digest::hex_digest, error::ConnectionError};

/// Services one connection until the peer closes it or an I/O error occurs.
///
/// Every read is hashed independently; nothing is carried over between reads.
/// Returns the number of chunks answered. The stream is owned here and dropped
/// (closed) on every return path.
pub async fn serve_connection<S>(mut stream: S, peer: SocketAddr) -> Result<u64, ConnectionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = [0u8; MAX_CHUNK_SIZE];
    let mut answered = 0u64;

    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(answered);
        }

        let digest = hex_digest(&buf[..n]);
        debug!(%peer, bytes = n, %digest, "hashed chunk");
        stream.write_all(digest.as_bytes()).await?;
        answered += 1;
    }
}

/// Runs [`serve_connection`] and reports how it ended. Errors never leave the worker.
pub async fn run_worker<S>(stream: S, peer: SocketAddr)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match serve_connection(stream, peer).await {
        Ok(chunks) => info!(%peer, chunks, "client disconnected"),
        Err(ConnectionError::Reset(_)) => warn!(%peer, "connection reset by client"),
        Err(err) => warn!(%peer, error = ?err, "connection closed with error"),
    }
    info!(%peer, "closed connection");
}
