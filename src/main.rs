mod board;
mod cli;
mod client;
mod error;
mod forms;
mod http;
mod metadata;
mod runtime;
mod service;
mod storage;
mod types;
mod ui;

use std::path::PathBuf;
use std::process::{Child, Command as ProcessCommand, Stdio};
use std::time::{Duration, Instant};

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, RuntimeArgs, ServeArgs};
use crate::service::CourseService;
use crate::storage::Database;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args),
        Command::Open(args) => open(args),
        Command::Status(args) => {
            status(&args);
            Ok(())
        }
        Command::Shutdown(args) => {
            shutdown(&args);
            Ok(())
        }
        Command::Version => {
            println!("{} {}", metadata::PKG_NAME, metadata::PKG_VERSION);
            Ok(())
        }
    }
}

fn db_path(args: &ServeArgs) -> PathBuf {
    args.db.clone().unwrap_or_else(Database::default_path)
}

fn runtime_path(args: &Option<PathBuf>) -> PathBuf {
    args.clone().unwrap_or_else(runtime::default_path)
}

/// Run the REST service in the foreground until ctrl-c.
fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let addr = args.socket_addr().map_err(std::io::Error::other)?;
    let db = db_path(&args);
    let runtime_file = runtime_path(&args.runtime_file);

    runtime::write(&runtime_file, &runtime::RuntimeInfo::current(&args.addr, &db))?;

    let service = CourseService::new(Database::new(db));
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async {
        tokio::select! {
            res = http::serve(addr, service) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    });
    runtime::remove(&runtime_file);
    result.map_err(|e| -> Box<dyn std::error::Error> { e })?;
    Ok(())
}

/// The desktop-shell flow: make sure a service is running, open the client
/// on top of it, and stop the service again if this process started it.
fn open(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    args.socket_addr().map_err(std::io::Error::other)?;
    let base_url = args.base_url();
    let runtime_file = runtime_path(&args.runtime_file);

    let mut spawned: Option<Child> = None;
    if !server_answers(&base_url) {
        tracing::info!("starting background service on {}", args.addr);
        spawned = Some(spawn_service(&args)?);
        wait_until_up(&base_url, Duration::from_secs(5));
    }

    let result = if server_answers(&base_url) {
        ui::run(&base_url)
    } else {
        Err(format!("service did not come up on {}", args.addr).into())
    };

    if let Some(mut child) = spawned {
        tracing::info!("stopping background service");
        let _ = child.kill();
        let _ = child.wait();
        // The child never got to clean up after itself.
        runtime::remove(&runtime_file);
    }
    result
}

fn spawn_service(args: &ServeArgs) -> std::io::Result<Child> {
    let exe = std::env::current_exe()?;
    let mut command = ProcessCommand::new(exe);
    command.arg("serve").arg("--addr").arg(&args.addr);
    if let Some(db) = &args.db {
        command.arg("--db").arg(db);
    }
    if let Some(file) = &args.runtime_file {
        command.arg("--runtime-file").arg(file);
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

fn wait_until_up(base_url: &str, limit: Duration) {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if server_answers(base_url) {
            return;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}

fn server_answers(base_url: &str) -> bool {
    ureq::get(&format!("{base_url}/courses"))
        .timeout(Duration::from_millis(500))
        .call()
        .is_ok()
}

fn status(args: &RuntimeArgs) {
    let path = runtime_path(&args.runtime_file);
    match runtime::read(&path) {
        Some(info) if runtime::is_alive(info.pid) => {
            println!(
                "{} pid {} on http://{} (db {}, started {})",
                "running".green().bold(),
                info.pid,
                info.addr,
                info.db.display(),
                info.started_at
            );
        }
        Some(info) => {
            println!(
                "{} (stale runtime info for pid {})",
                "not running".red(),
                info.pid
            );
        }
        None => println!("{}", "not running".red()),
    }
}

fn shutdown(args: &RuntimeArgs) {
    let path = runtime_path(&args.runtime_file);
    match runtime::read(&path) {
        Some(info) => {
            if runtime::kill(info.pid) {
                println!("{} pid {}", "stopped".green().bold(), info.pid);
            } else {
                println!("process {} was already gone", info.pid);
            }
            runtime::remove(&path);
        }
        None => println!("{}", "not running".red()),
    }
}
