use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Platform family, which decides the candidate names installed alongside us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Graphical desktop (Windows builds ship `.exe` GUI binaries).
    Desktop,
    Posix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Desktop
        } else {
            Platform::Posix
        }
    }
}

/// One executable that may be started. List position is its priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCandidate {
    pub platform: Platform,
    pub relative_path: &'static str,
    pub args: &'static [&'static str],
}

const fn candidate(
    platform: Platform,
    relative_path: &'static str,
    args: &'static [&'static str],
) -> LaunchCandidate {
    LaunchCandidate {
        platform,
        relative_path,
        args,
    }
}

/// Default Web API port handed to the daemon by the launcher role.
pub const DEFAULT_DAEMON_PORT: &str = "8080";

const DESKTOP_MAIN: &[LaunchCandidate] = &[
    candidate(Platform::Desktop, "nekoray.exe", &[]),
    candidate(Platform::Desktop, "nekobox.exe", &[]),
];

const POSIX_MAIN: &[LaunchCandidate] = &[
    candidate(Platform::Posix, "nekoray-daemon", &[]),
    candidate(Platform::Posix, "nekoray", &[]),
    candidate(Platform::Posix, "nekobox", &[]),
];

const DESKTOP_LAUNCHER: &[LaunchCandidate] = &[
    candidate(
        Platform::Desktop,
        "nekoray-daemon.exe",
        &["--port", DEFAULT_DAEMON_PORT],
    ),
    candidate(Platform::Desktop, "nekoray-cli.exe", &["daemon"]),
];

const POSIX_LAUNCHER: &[LaunchCandidate] = &[
    candidate(
        Platform::Posix,
        "nekoray-daemon",
        &["--port", DEFAULT_DAEMON_PORT],
    ),
    candidate(Platform::Posix, "nekoray-cli", &["daemon"]),
];

/// Candidates for "the main application", started after an update run.
pub fn main_app_candidates(platform: Platform) -> &'static [LaunchCandidate] {
    match platform {
        Platform::Desktop => DESKTOP_MAIN,
        Platform::Posix => POSIX_MAIN,
    }
}

/// Candidates for the launcher role: the daemon, else the CLI in daemon mode.
pub fn launcher_candidates(platform: Platform) -> &'static [LaunchCandidate] {
    match platform {
        Platform::Desktop => DESKTOP_LAUNCHER,
        Platform::Posix => POSIX_LAUNCHER,
    }
}

/// What to do with a child once it is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Supervision {
    /// Fire-and-forget: stdio goes to null and the handle is dropped.
    #[default]
    Detached,
    /// Inherit stdio and block until the child exits.
    WaitForExit,
}

#[derive(Debug)]
pub enum LaunchOutcome {
    Detached { pid: u32 },
    Exited(ExitStatus),
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to wait for {}: {source}", path.display())]
    Wait {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// First candidate, in priority order, whose file exists in `work_dir`.
pub fn select_candidate<'a>(
    work_dir: &Path,
    candidates: &'a [LaunchCandidate],
) -> Option<&'a LaunchCandidate> {
    candidates
        .iter()
        .find(|c| work_dir.join(c.relative_path).exists())
}

/// Start `candidate` from `work_dir` under the given supervision policy.
pub fn spawn_candidate(
    work_dir: &Path,
    candidate: &LaunchCandidate,
    supervision: Supervision,
) -> Result<LaunchOutcome, LaunchError> {
    let path = work_dir.join(candidate.relative_path);
    let mut command = Command::new(&path);
    command.args(candidate.args).current_dir(work_dir);

    if supervision == Supervision::Detached {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
    }

    let mut child = command.spawn().map_err(|source| LaunchError::Spawn {
        path: path.clone(),
        source,
    })?;

    match supervision {
        Supervision::Detached => Ok(LaunchOutcome::Detached { pid: child.id() }),
        Supervision::WaitForExit => child
            .wait()
            .map(LaunchOutcome::Exited)
            .map_err(|source| LaunchError::Wait { path, source }),
    }
}

/// Select and start the first existing candidate. `Ok(None)` if none exists.
pub fn launch_first<'a>(
    work_dir: &Path,
    candidates: &'a [LaunchCandidate],
    supervision: Supervision,
) -> Result<Option<(&'a LaunchCandidate, LaunchOutcome)>, LaunchError> {
    let Some(candidate) = select_candidate(work_dir, candidates) else {
        return Ok(None);
    };
    let outcome = spawn_candidate(work_dir, candidate, supervision)?;
    Ok(Some((candidate, outcome)))
}
