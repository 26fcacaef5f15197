use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::exec::{Platform, Supervision};
use crate::role::{Role, RoleError};

#[derive(Debug)]
pub struct LauncherConfig {
    pub work_dir: PathBuf, // directory containing the running executable
    pub invocation: String, // base name of argv[0]
    pub role_override: Option<Role>, // --role
    pub supervision: Supervision, // --wait
    pub show_help: bool,
    pub platform: Platform,
}

/// Flags accepted by `nekoray-updater`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LauncherArgs {
    pub role: Option<Role>,
    pub wait: bool,
    pub help: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine executable path: {0}")]
    NoExecutable(#[source] std::io::Error),
    #[error("executable path has no parent directory: {}", .0.display())]
    NoParentDir(PathBuf),
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),
    #[error(transparent)]
    Role(#[from] RoleError),
}

fn parse_role(value: &OsStr) -> Result<Role, ConfigError> {
    match value.to_str() {
        Some(v) => Ok(v.parse()?),
        None => Err(RoleError::Unknown(value.to_string_lossy().into_owned()).into()),
    }
}

/// Parse launcher flags (without the program name). Non-UTF-8 flags are unknown.
pub fn parse_launcher_args<I, S>(args: I) -> Result<LauncherArgs, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut parsed = LauncherArgs::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        match arg.to_str() {
            Some("--wait") => parsed.wait = true,
            Some("-h" | "--help") => parsed.help = true,
            Some("--role") => {
                let value = iter.next().ok_or(ConfigError::MissingValue("--role"))?;
                parsed.role = Some(parse_role(value.as_ref())?);
            }
            Some(flag) => match flag.strip_prefix("--role=") {
                Some(value) => parsed.role = Some(value.parse()?),
                None => return Err(ConfigError::UnknownArgument(flag.to_string())),
            },
            None => {
                return Err(ConfigError::UnknownArgument(
                    arg.to_string_lossy().into_owned(),
                ))
            }
        }
    }
    Ok(parsed)
}

/// Base name the process was started with; falls back to the executable name.
pub fn invocation_identity(argv0: Option<&OsStr>, exe_path: &Path) -> String {
    argv0
        .and_then(|a| Path::new(a).file_name())
        .or_else(|| exe_path.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn launcher_config() -> Result<LauncherConfig, ConfigError> {
    let exe_path = std::env::current_exe().map_err(ConfigError::NoExecutable)?;
    let work_dir = exe_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::NoParentDir(exe_path.clone()))?;

    let mut argv = std::env::args_os();
    let argv0 = argv.next();
    let args = parse_launcher_args(argv)?;

    let invocation = invocation_identity(argv0.as_deref(), &exe_path);
    let supervision = if args.wait {
        Supervision::WaitForExit
    } else {
        Supervision::Detached
    };

    Ok(LauncherConfig {
        work_dir,
        invocation,
        role_override: args.role,
        supervision,
        show_help: args.help,
        platform: Platform::current(),
    })
}
