// main.rs: role resolution and orchestration only.
// Updating, launching and role detection live in the library modules.
use anyhow::Context;

use nekoray_tools::config::{launcher_config, LauncherConfig};
use nekoray_tools::exec::{
    launch_first, launcher_candidates, main_app_candidates, LaunchCandidate, LaunchOutcome,
};
use nekoray_tools::role::{detect_role, Role};
use nekoray_tools::update::{apply_updates, COMPONENTS};
use nekoray_tools::version::UPDATER_VERSION;

const USAGE: &str = "\
Usage:
  updater    - Update NekoRay components
  launcher   - Launch NekoRay daemon/CLI

The role comes from the executable name, or explicitly:
  nekoray-updater --role <updater|launcher> [--wait]";

fn main() -> anyhow::Result<()> {
    println!("NekoRay Updater v{UPDATER_VERSION}");
    let config = launcher_config()?;

    if config.show_help {
        println!("{USAGE}");
        return Ok(());
    }

    std::env::set_current_dir(&config.work_dir).with_context(|| {
        format!(
            "failed to enter working directory {}",
            config.work_dir.display()
        )
    })?;
    eprintln!("[nekoray] executable: {}", config.invocation);
    eprintln!("[nekoray] working directory: {}", config.work_dir.display());

    let role = match config.role_override {
        Some(role) => role,
        None => detect_role(&config.invocation)?,
    };

    match role {
        Role::Updater => {
            eprintln!("[nekoray] === NekoRay Update Process ===");
            let report = apply_updates(&config.work_dir, &COMPONENTS);
            let updated: Vec<&str> = report.updated().collect();
            if !updated.is_empty() {
                eprintln!("[nekoray] updated: {}", updated.join(", "));
            }
            let failed = report.failed().count();
            if failed > 0 {
                eprintln!("[nekoray] {failed} component(s) left staged for the next run");
            }
            // Update failures never block the launch.
            start(
                &config,
                main_app_candidates(config.platform),
                "main application",
                "No main application found to start",
            );
        }
        Role::Launcher => {
            eprintln!("[nekoray] === NekoRay Launcher ===");
            start(
                &config,
                launcher_candidates(config.platform),
                "component",
                "No NekoRay components found to launch",
            );
        }
        Role::Unrecognized => println!("{USAGE}"),
    }
    Ok(())
}

/// Launch the first existing candidate; every outcome is reported, none is fatal.
fn start(config: &LauncherConfig, candidates: &[LaunchCandidate], what: &str, none_found: &str) {
    match launch_first(&config.work_dir, candidates, config.supervision) {
        Ok(Some((candidate, outcome))) => report_launch(candidate, &outcome, what),
        Ok(None) => eprintln!("[nekoray] {none_found}"),
        Err(e) => eprintln!("[nekoray] {e}"),
    }
}

fn report_launch(candidate: &LaunchCandidate, outcome: &LaunchOutcome, what: &str) {
    let name = candidate.relative_path;
    match outcome {
        LaunchOutcome::Detached { pid } => {
            eprintln!("[nekoray] Started {what} {name} (pid {pid})");
        }
        LaunchOutcome::Exited(status) => {
            eprintln!("[nekoray] {what} {name} exited: {status}");
        }
    }
}
