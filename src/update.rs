use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Components the updater knows about, in reporting order.
pub const COMPONENTS: [&str; 4] = ["nekoray-cli", "nekoray-web", "nekoray-daemon", "nekobox_core"];

/// Suffix of a staged (pending) artifact.
pub const STAGED_SUFFIX: &str = ".new";

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("failed to read {}: {source}", path.display())]
    ReadStaged {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install {}: {source}", path.display())]
    WriteInstalled {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub enum ComponentOutcome {
    /// No staged artifact.
    Skipped,
    Updated,
    /// Staged artifact left in place for the next run.
    Failed(UpdateError),
}

#[derive(Debug)]
pub struct ComponentReport {
    pub name: String,
    pub outcome: ComponentOutcome,
}

#[derive(Debug, Default)]
pub struct UpdateReport {
    pub components: Vec<ComponentReport>,
}

impl UpdateReport {
    pub fn updated(&self) -> impl Iterator<Item = &str> {
        self.components
            .iter()
            .filter(|c| matches!(c.outcome, ComponentOutcome::Updated))
            .map(|c| c.name.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ComponentReport> {
        self.components
            .iter()
            .filter(|c| matches!(c.outcome, ComponentOutcome::Failed(_)))
    }
}

pub fn staged_path(work_dir: &Path, name: &str) -> PathBuf {
    work_dir.join(format!("{name}{STAGED_SUFFIX}"))
}

pub fn installed_path(work_dir: &Path, name: &str) -> PathBuf {
    work_dir.join(name)
}

/// Apply a pending update for one component.
///
/// Returns `Ok(false)` when nothing is staged. The staged bytes are written to a
/// temp file beside the installed artifact, marked executable, then renamed over
/// it, so the installed path only ever holds a complete old or new artifact.
/// The staged file is removed only after the rename succeeded. A read-only
/// installed artifact is refused rather than renamed over.
pub fn apply_component(work_dir: &Path, name: &str) -> Result<bool, UpdateError> {
    let staged = staged_path(work_dir, name);
    match staged.try_exists() {
        Ok(true) => {}
        Ok(false) => return Ok(false),
        Err(source) => return Err(UpdateError::ReadStaged { path: staged, source }),
    }
    eprintln!("[nekoray] Updating {name}...");

    let bytes = std::fs::read(&staged).map_err(|source| UpdateError::ReadStaged {
        path: staged.clone(),
        source,
    })?;

    let installed = installed_path(work_dir, name);
    install_bytes(work_dir, &installed, &bytes).map_err(|source| UpdateError::WriteInstalled {
        path: installed.clone(),
        source,
    })?;

    // Installed is already current; a leftover staged file re-applies the same bytes.
    if let Err(e) = std::fs::remove_file(&staged) {
        eprintln!(
            "[nekoray] warning: could not remove {}: {}",
            staged.display(),
            e
        );
    }
    Ok(true)
}

fn ensure_replaceable(installed: &Path) -> std::io::Result<()> {
    match std::fs::metadata(installed) {
        Ok(meta) if meta.permissions().readonly() => Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "installed artifact is read-only",
        )),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn install_bytes(work_dir: &Path, installed: &Path, bytes: &[u8]) -> std::io::Result<()> {
    ensure_replaceable(installed)?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".nekoray-")
        .suffix(".swap")
        .tempfile_in(work_dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    set_executable(tmp.path())?;
    tmp.persist(installed).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Scan every component in order. A failure never stops the scan.
pub fn apply_updates(work_dir: &Path, names: &[&str]) -> UpdateReport {
    let mut report = UpdateReport::default();
    for name in names {
        let outcome = match apply_component(work_dir, name) {
            Ok(true) => {
                eprintln!("[nekoray] \u{2705} Updated {name}");
                ComponentOutcome::Updated
            }
            Ok(false) => ComponentOutcome::Skipped,
            Err(e) => {
                eprintln!("[nekoray] \u{274c} Failed to update {name}: {e}");
                ComponentOutcome::Failed(e)
            }
        };
        report.components.push(ComponentReport {
            name: name.to_string(),
            outcome,
        });
    }
    eprintln!("[nekoray] Update process completed");
    report
}
