use std::{
    future::{self, Future},
    io,
    net::SocketAddr,
};

use tokio::{
    net::{TcpListener, TcpSocket, TcpStream},
    select,
    task::{JoinError, JoinSet},
};
use tracing::{error, info, warn};

use crate::{
    config::ServerConfig,
    error::{ServerError, is_per_connection_accept_error},
    worker::run_worker,
};

pub struct Server {
    listener: TcpListener,
}

impl Server {
    pub fn new(listener: TcpListener) -> Self {
        Self { listener }
    }

    /// Binds `config.listen` and starts listening with `config.backlog` pending slots.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let listener = listen(config).map_err(|source| ServerError::Bind {
            addr: config.listen,
            source,
        })?;
        Ok(Self::new(listener))
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` resolves or the listener fails.
    ///
    /// Each connection gets its own task. Once the loop ends the listening
    /// socket is closed, and the call returns after the in-flight workers have
    /// finished on their own.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        self.run_until_with_abort(shutdown, future::pending()).await
    }

    /// Like [`run_until`](Self::run_until), but `abort` resolving while open
    /// connections drain drops them instead of waiting.
    ///
    /// `abort` is only polled after the accept loop has ended.
    pub async fn run_until_with_abort<F, A>(self, shutdown: F, abort: A) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
        A: Future<Output = ()> + Send,
    {
        let Server { listener } = self;
        let mut workers = JoinSet::new();
        let outcome = accept_loop(&listener, &mut workers, shutdown).await;

        drop(listener);
        drain_workers(&mut workers, abort).await;
        info!("server terminated");

        outcome
    }

    /// Stops accepting on the first Ctrl+C; a second one abandons open connections.
    pub async fn run_until_ctrl_c(self) -> Result<(), ServerError> {
        self.run_until_with_abort(wait_for_ctrl_c(), wait_for_ctrl_c()).await
    }
}

async fn wait_for_ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = ?err, "failed to install ctrl-c handler");
        // Without a handler there is no interrupt to wait for.
        future::pending::<()>().await;
    }
}

async fn accept_loop<F>(
    listener: &TcpListener,
    workers: &mut JoinSet<()>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    tokio::pin!(shutdown);

    loop {
        select! {
            _ = &mut shutdown => {
                info!("shutdown requested, no longer accepting connections");
                return Ok(());
            }
            accept_result = listener.accept() => {
                if let Err(err) = handle_accept_result(accept_result, workers) {
                    error!(error = ?err, "error in accept loop");
                    return Err(err);
                }
            }
            Some(joined) = workers.join_next(), if !workers.is_empty() => {
                reap_worker(joined);
            }
        }
    }
}

async fn drain_workers<A>(workers: &mut JoinSet<()>, abort: A)
where
    A: Future<Output = ()> + Send,
{
    if workers.is_empty() {
        return;
    }
    info!(in_flight = workers.len(), "waiting for open connections to finish");
    tokio::pin!(abort);

    loop {
        select! {
            joined = workers.join_next() => match joined {
                Some(joined) => {
                    reap_worker(joined);
                }
                None => return,
            },
            _ = &mut abort => {
                warn!(abandoned = workers.len(), "interrupted again, dropping open connections");
                workers.shutdown().await;
                return;
            }
        }
    }
}

fn listen(config: &ServerConfig) -> io::Result<TcpListener> {
    let socket = match config.listen {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.bind(config.listen)?;
    socket.listen(config.backlog)
}

fn handle_accept_result(
    result: io::Result<(TcpStream, SocketAddr)>,
    workers: &mut JoinSet<()>,
) -> Result<(), ServerError> {
    match result {
        Ok((stream, peer)) => {
            info!(%peer, "accepted connection");
            workers.spawn(run_worker(stream, peer));
            Ok(())
        }
        Err(err) if is_per_connection_accept_error(&err) => {
            warn!(error = ?err, "failed to accept connection");
            Ok(())
        }
        Err(err) => Err(ServerError::Accept(err)),
    }
}

/// Logs a worker that panicked. Returns whether it did.
fn reap_worker(joined: Result<(), JoinError>) -> bool {
    match joined {
        Err(err) if err.is_panic() => {
            error!(error = ?err, "connection worker panicked");
            true
        }
        _ => false,
    }
}
