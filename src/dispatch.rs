//! Command surface of the minimal core.
//!
//! Mirrors the engine's CLI (`run`, `check`, `version`, `nekobox`) without any
//! networking. `run` and `nekobox` block on a [`ShutdownSignal`] instead of
//! serving traffic.
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::shutdown::ShutdownSignal;
use crate::version::VersionInfo;

/// Simulated listening endpoints printed by `run`. Nothing is bound.
pub const SOCKS_ENDPOINT: &str = "127.0.0.1:2080";
pub const HTTP_ENDPOINT: &str = "127.0.0.1:2081";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Version { json: bool },
    Help,
    Check { config: PathBuf },
    Run { config: PathBuf },
    /// `nekobox`: service mode for the CLI/Web frontends.
    Service,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No command specified")]
    NoCommand,
    #[error("Configuration file required for '{0}' command")]
    MissingConfig(&'static str),
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
}

impl DispatchError {
    /// Follow-up lines printed after the error message.
    pub fn hint(&self) -> &'static [&'static str] {
        match self {
            DispatchError::NoCommand => &["Use --help for usage information"],
            DispatchError::MissingConfig("run") => &["Usage: nekobox_core run <config.json>"],
            DispatchError::MissingConfig(_) => &["Usage: nekobox_core check <config.json>"],
            DispatchError::UnknownCommand(_) => &["Use --help for available commands"],
        }
    }
}

pub const USAGE: &str = "\
Usage: nekobox_core [options] <command>
A minimal proxy core implementation for NekoRay

Options:
  -v, --version    Show version information
  -h, --help       Show this help

Commands:
  run <config>     Run with config file
  nekobox          Run in NekoBox mode (gRPC)
  version [--json] Show version
  check <config>   Check configuration

Note: This is a minimal implementation for demonstration.
For full functionality, use the complete sing-box binary.";

fn config_arg(command: &'static str, arg: Option<OsString>) -> Result<PathBuf, DispatchError> {
    arg.filter(|a| !a.is_empty())
        .map(PathBuf::from)
        .ok_or(DispatchError::MissingConfig(command))
}

/// Parse process arguments (without the program name).
///
/// Config paths are kept as raw OS strings; only keywords must be UTF-8.
pub fn parse_command<I>(args: I) -> Result<Command, DispatchError>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let first = args.next().ok_or(DispatchError::NoCommand)?;
    match first.to_str() {
        // Flags win over subcommands.
        Some("--version" | "-v" | "version") => Ok(Command::Version {
            json: args.any(|a| a.as_os_str() == "--json"),
        }),
        Some("--help" | "-h") => Ok(Command::Help),
        Some("check") => Ok(Command::Check {
            config: config_arg("check", args.next())?,
        }),
        Some("run") => Ok(Command::Run {
            config: config_arg("run", args.next())?,
        }),
        Some("nekobox") => Ok(Command::Service),
        _ => Err(DispatchError::UnknownCommand(
            first.to_string_lossy().into_owned(),
        )),
    }
}

/// Run a parsed command. Service commands return only once `shutdown` fires.
pub fn execute(
    command: &Command,
    versions: &VersionInfo,
    out: &mut dyn Write,
    shutdown: &ShutdownSignal,
) -> io::Result<()> {
    match command {
        Command::Version { json: false } => writeln!(out, "{}", versions.banner())?,
        Command::Version { json: true } => {
            let json = versions.to_json().map_err(io::Error::other)?;
            writeln!(out, "{json}")?;
        }
        Command::Help => writeln!(out, "{USAGE}")?,
        Command::Check { config } => {
            writeln!(out, "Checking configuration: {}", config.display())?;
            writeln!(out, "Configuration check passed (minimal validation)")?;
        }
        Command::Run { config } => {
            writeln!(out, "Running with configuration: {}", config.display())?;
            writeln!(out, "Note: This minimal core provides basic proxy functionality")?;
            writeln!(out, "Proxy server started on default ports:")?;
            writeln!(out, "  SOCKS5: {SOCKS_ENDPOINT}")?;
            writeln!(out, "  HTTP:   {HTTP_ENDPOINT}")?;
            out.flush()?;
            shutdown.wait();
        }
        Command::Service => {
            writeln!(out, "NekoBox Core mode - gRPC server mode")?;
            writeln!(
                out,
                "Note: gRPC server implementation simplified for standalone version"
            )?;
            writeln!(out, "Core is ready for NekoRay CLI/Web communication")?;
            writeln!(out, "Status: Ready for configuration and proxy operations")?;
            out.flush()?;
            shutdown.wait();
        }
    }
    Ok(())
}
