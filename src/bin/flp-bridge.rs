use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use flp_bridge::{Cli, TempFileSink, diagnostics::init_tracing, dispatch};

fn main() -> ExitCode {
    let root = runtime_root();
    // Logging failure must never mask the outcome of the command itself.
    let _telemetry = init_tracing(root.join("logs")).ok();

    let cli = Cli::parse();
    let sink = TempFileSink::new(root.join("tmp"));

    match dispatch(cli, &sink) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            // Diagnostics go to stdout: the host reads this stream back.
            println!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// Staging and log directories live next to the executable, so behavior
/// does not depend on the host's working directory.
fn runtime_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
