use std::{path::PathBuf, str::FromStr};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Parser;
use thiserror::Error;

use crate::{
    format,
    handle::{HandleError, InfosPatch, ProjectHandle},
    sink::TempFileSink,
};

const SET_GUIDANCE: &str = "Please provide json data to 'set' command";

/// Positional argv contract spoken by the host application. Every operand
/// is optional at the clap level so the dispatcher can answer with the
/// exact diagnostic the host expects.
#[derive(Debug, Parser)]
#[command(name = "flp-bridge")]
#[command(about = "Reads and rewrites FL Studio project metadata for a host application")]
pub struct Cli {
    /// info | export | set | samples
    pub command: Option<String>,
    /// Path to a .flp file, or base64-encoded project bytes
    pub file: Option<String>,
    /// Base directory used to relocate sampler paths
    pub project_dir: Option<String>,
    /// base64-encoded JSON metadata patch (set only)
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Info,
    Export,
    Set,
    Samples,
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "info" => Ok(Self::Info),
            "export" => Ok(Self::Export),
            "set" => Ok(Self::Set),
            "samples" => Ok(Self::Samples),
            _ => Err(CliError::Argument("Invalid command")),
        }
    }
}

/// Everything the dispatcher can answer with. Argument and decode
/// problems carry their host-visible line verbatim and are never logged;
/// handle failures already logged their detail.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Argument(&'static str),
    #[error("{0}")]
    Decode(&'static str),
    #[error("Error while parsing the file: {0}")]
    Load(#[source] HandleError),
    #[error(transparent)]
    Handle(#[from] HandleError),
    #[error(transparent)]
    Stage(#[from] anyhow::Error),
}

/// Runs one command end to end and returns the staged result path that
/// main prints on stdout.
pub fn dispatch(cli: Cli, sink: &TempFileSink) -> Result<PathBuf, CliError> {
    let command = cli
        .command
        .ok_or(CliError::Argument("Please provide a command"))?;
    let command = Command::from_str(&command)?;
    let file = cli
        .file
        .ok_or(CliError::Argument("Please provide a file path"))?;
    let project_dir = cli
        .project_dir
        .ok_or(CliError::Argument("Please provide a project dir"))?;
    // An empty operand means no relocation base was configured host-side.
    let project_dir = (!project_dir.is_empty()).then_some(project_dir);

    let mut handle = load_handle(&file, project_dir)?;

    let result = match command {
        Command::Info => handle.infos_json()?,
        Command::Set => {
            let patch = decode_patch(cli.payload)?;
            handle.set_infos(&patch)?;
            handle.export(true)?
        }
        Command::Samples => {
            handle.relocate_samples()?;
            handle.export(false)?
        }
        Command::Export => handle.export(false)?,
    };

    Ok(sink.write(&result)?)
}

fn load_handle(file: &str, project_dir: Option<String>) -> Result<ProjectHandle, CliError> {
    let dotted_ext = format!(".{}", format::PROJECT_EXT);
    if file.ends_with(&dotted_ext) {
        ProjectHandle::from_path(file.as_ref(), project_dir).map_err(CliError::Load)
    } else {
        let bytes = BASE64
            .decode(file.as_bytes())
            .map_err(|_| CliError::Decode("Invalid file"))?;
        ProjectHandle::from_bytes(&bytes, project_dir).map_err(CliError::Load)
    }
}

fn decode_patch(payload: Option<String>) -> Result<InfosPatch, CliError> {
    let payload = payload.ok_or(CliError::Decode(SET_GUIDANCE))?;
    let decoded = BASE64
        .decode(payload.as_bytes())
        .map_err(|_| CliError::Decode(SET_GUIDANCE))?;
    serde_json::from_slice(&decoded).map_err(|_| CliError::Decode(SET_GUIDANCE))
}
