use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the course service in the foreground
    Serve(ServeArgs),
    /// Start a local service if needed and open the terminal client
    Open(ServeArgs),
    /// Report whether a recorded service process is still running
    Status(RuntimeArgs),
    /// Stop a running service (using the runtime info file)
    Shutdown(RuntimeArgs),
    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Service bind address
    #[arg(long, env = "STUDYPOSTS_ADDR", default_value = "127.0.0.1:5000")]
    pub addr: String,

    /// Path of the JSON database document (default: ~/.studyposts/db.json)
    #[arg(long, env = "STUDYPOSTS_DB")]
    pub db: Option<PathBuf>,

    /// Runtime info file used by status/shutdown
    /// (default: ~/.studyposts/runtime.json)
    #[arg(long, env = "STUDYPOSTS_RUNTIME_FILE")]
    pub runtime_file: Option<PathBuf>,
}

impl ServeArgs {
    /// Validate CLI/environment-derived arguments.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid STUDYPOSTS_ADDR '{}': {e}", self.addr))
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

#[derive(Args, Debug, Clone)]
pub struct RuntimeArgs {
    /// Runtime info file written by `serve`
    #[arg(long, env = "STUDYPOSTS_RUNTIME_FILE")]
    pub runtime_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_args_validate_the_bind_address() {
        let cli = Cli::parse_from([PKG_NAME, "serve", "--addr", "127.0.0.1:5000"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert!(args.socket_addr().is_ok());
        assert_eq!(args.base_url(), "http://127.0.0.1:5000");

        let cli = Cli::parse_from([PKG_NAME, "serve", "--addr", "not-an-addr"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert!(args.socket_addr().is_err());
    }

    #[test]
    fn db_and_runtime_paths_default_to_unset() {
        let cli = Cli::parse_from([PKG_NAME, "serve"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert!(args.db.is_none());
        assert!(args.runtime_file.is_none());
    }
}
