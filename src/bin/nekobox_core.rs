// nekobox_core: minimal stand-in for the proxy engine's command surface.
use std::io::Write;
use std::process::ExitCode;

use nekoray_tools::dispatch::{execute, parse_command};
use nekoray_tools::shutdown;
use nekoray_tools::version::CORE_VERSIONS;

fn main() -> anyhow::Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", CORE_VERSIONS.header())?;
    writeln!(out)?;

    let command = match parse_command(std::env::args_os().skip(1)) {
        Ok(c) => c,
        Err(e) => {
            out.flush()?;
            eprintln!("Error: {e}");
            for line in e.hint() {
                eprintln!("{line}");
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    // Held for the life of the process: service modes end only on external termination.
    let (_trigger, signal) = shutdown::channel();
    execute(&command, &CORE_VERSIONS, &mut out, &signal)?;
    Ok(ExitCode::SUCCESS)
}
