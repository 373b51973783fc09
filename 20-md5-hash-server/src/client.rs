use std::{future::Future, net::SocketAddr, time::Duration};

use tokio::{
    io::{self, AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};
use tracing::warn;

use crate::{
    config::{ClientConfig, MAX_CHUNK_SIZE},
    error::ClientError,
};

/// Messages sent by [`run`], in order.
pub const MESSAGES: [&str; 10] = [
    "First message: Hello, server!",
    "Second message: How are you?",
    "Third message: I am fine.",
    "Fourth message: What is your name?",
    "Fifth message: My name is Client.",
    "Sixth message: What is the time?",
    "Seventh message: It is 12:00 PM.",
    "Eighth message: What is the date?",
    "Ninth message: Today is Monday.",
    "Tenth message: Goodbye!",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub message: String,
    pub digest: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every message got a response.
    Completed,
    /// The server closed the connection before answering; later messages were not sent.
    ServerClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientReport {
    pub exchanges: Vec<Exchange>,
    pub outcome: Outcome,
}

pub async fn run(config: &ClientConfig) -> Result<ClientReport, ClientError> {
    run_messages(config, &MESSAGES).await
}

/// Sends each message in one write and reads exactly one response for it.
pub async fn run_messages(
    config: &ClientConfig,
    messages: &[&str],
) -> Result<ClientReport, ClientError> {
    write_stdout(&format!("*** connecting to {}", config.server)).await?;
    let mut stream = establish_connection(config).await?;

    let result = exchange_messages(&mut stream, messages).await;
    shutdown_connection(&mut stream).await;
    let report = result?;

    match report.outcome {
        Outcome::Completed => write_stdout("*** all messages sent").await?,
        Outcome::ServerClosed => {
            write_stderr("!!! no response received (server may have closed)").await?
        }
    }
    write_stdout("*** closing connection").await?;

    Ok(report)
}

async fn establish_connection(config: &ClientConfig) -> Result<TcpStream, ClientError> {
    connect_within(
        config.server,
        config.connect_timeout,
        TcpStream::connect(config.server),
    )
    .await
}

/// Awaits `connect` for at most `limit`, mapping the failure onto a [`ClientError`].
async fn connect_within<F, T>(
    addr: SocketAddr,
    limit: Duration,
    connect: F,
) -> Result<T, ClientError>
where
    F: Future<Output = io::Result<T>>,
{
    match timeout(limit, connect).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(err)) => Err(ClientError::connect(addr, err)),
        Err(_) => Err(ClientError::TimedOut { addr }),
    }
}

async fn exchange_messages(
    stream: &mut TcpStream,
    messages: &[&str],
) -> Result<ClientReport, ClientError> {
    let mut exchanges = Vec::with_capacity(messages.len());
    let mut buf = [0u8; MAX_CHUNK_SIZE];

    for (index, message) in messages.iter().enumerate() {
        write_stdout(&format!("-> sending message {}: {message}", index + 1)).await?;
        stream.write_all(message.as_bytes()).await?;

        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(ClientReport {
                exchanges,
                outcome: Outcome::ServerClosed,
            });
        }

        let digest = String::from_utf8_lossy(&buf[..n]).into_owned();
        write_stdout(&format!("<- received digest: {digest}")).await?;
        exchanges.push(Exchange {
            message: message.to_string(),
            digest,
        });
    }

    Ok(ClientReport {
        exchanges,
        outcome: Outcome::Completed,
    })
}

async fn shutdown_connection(stream: &mut TcpStream) {
    if let Err(error) = stream.shutdown().await {
        warn!(?error, "failed to shutdown client writer cleanly");
    }
}

/// Operator-facing lines for a client failure.
pub fn describe_error(err: &ClientError) -> Vec<String> {
    match err {
        ClientError::Refused { addr } => vec![
            format!("!!! connection refused, could not connect to {addr}"),
            "!!! is the server running?".to_string(),
        ],
        ClientError::TimedOut { addr } => vec![format!(
            "!!! connection to {addr} timed out, server might be slow or unreachable"
        )],
        other => vec![format!("!!! an error occurred: {other}")],
    }
}

pub async fn report_error(err: &ClientError) -> io::Result<()> {
    for line in describe_error(err) {
        write_stderr(&line).await?;
    }
    Ok(())
}

async fn write_stdout(line: &str) -> io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

async fn write_stderr(line: &str) -> io::Result<()> {
    let mut stderr = tokio::io::stderr();
    stderr.write_all(line.as_bytes()).await?;
    stderr.write_all(b"\n").await?;
    stderr.flush().await
}
