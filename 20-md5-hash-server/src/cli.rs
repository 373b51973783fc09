use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use crate::config::{ClientConfig, DEFAULT_BACKLOG, DEFAULT_CONNECT_TIMEOUT, ServerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the hash server, answering each received chunk with its MD5 digest.
    Server(ServerArgs),
    /// Send the fixed message list to a server and print each digest.
    Client(ClientArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Socket address the server should bind to. Use port 0 for an ephemeral port.
    #[arg(long, default_value = "0.0.0.0:5555")]
    pub listen: SocketAddr,

    /// Maximum number of pending connections queued by the kernel.
    #[arg(long, default_value_t = DEFAULT_BACKLOG)]
    pub backlog: u32,
}

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Address of the server to connect to.
    #[arg(long, default_value = "127.0.0.1:5555")]
    pub server: SocketAddr,

    /// Seconds to wait for the connection to be established.
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs())]
    pub connect_timeout_secs: u64,
}

impl From<&ServerArgs> for ServerConfig {
    fn from(args: &ServerArgs) -> Self {
        ServerConfig {
            listen: args.listen,
            backlog: args.backlog,
        }
    }
}

impl From<&ClientArgs> for ClientConfig {
    fn from(args: &ClientArgs) -> Self {
        ClientConfig {
            server: args.server,
            connect_timeout: std::time::Duration::from_secs(args.connect_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_addresses() {
        let cli = Cli::try_parse_from(["md5-hash-server", "server"]).expect("parse server");
        let Command::Server(args) = cli.command else {
            panic!("expected server subcommand");
        };
        let config = ServerConfig::from(&args);
        assert_eq!(config, ServerConfig::default());

        let cli = Cli::try_parse_from(["md5-hash-server", "client"]).expect("parse client");
        let Command::Client(args) = cli.command else {
            panic!("expected client subcommand");
        };
        let config = ClientConfig::from(&args);
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn explicit_arguments_override_defaults() {
        let cli = Cli::try_parse_from([
            "md5-hash-server",
            "client",
            "--server",
            "127.0.0.1:6000",
            "--connect-timeout-secs",
            "1",
        ])
        .expect("parse client");
        let Command::Client(args) = cli.command else {
            panic!("expected client subcommand");
        };
        let config = ClientConfig::from(&args);
        assert_eq!(config.server, "127.0.0.1:6000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.connect_timeout, std::time::Duration::from_secs(1));
    }
}
