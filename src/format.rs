//! Project-file codec. Everything that knows the on-disk byte layout lives
//! here; the rest of the crate treats loaded projects as opaque.

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use tracing::{debug, instrument};

use crate::model::Project;

pub const PROJECT_EXT: &str = "flp";

const MAGIC: &[u8; 4] = b"FLPB";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = MAGIC.len() + 1;

#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn parse(bytes: &[u8]) -> Result<Project> {
    ensure!(bytes.len() > HEADER_LEN, "project payload too short");
    ensure!(&bytes[..MAGIC.len()] == MAGIC, "bad container magic");
    let version = bytes[MAGIC.len()];
    ensure!(
        version == FORMAT_VERSION,
        "unsupported container version: {version}"
    );

    let project: Project =
        serde_json::from_slice(&bytes[HEADER_LEN..]).context("invalid project body")?;
    debug!(title = %project.title, channels = project.channels.len(), "project parsed");
    Ok(project)
}

#[instrument(skip(project), fields(title = %project.title))]
pub fn save(project: &Project) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(project).context("failed to serialize project")?;
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(MAGIC);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&body);
    Ok(out)
}

#[instrument(fields(path = %path.display()))]
pub fn load_file(path: &Path) -> Result<Project> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read project file: {}", path.display()))?;
    parse(&bytes)
}

#[instrument(skip(project), fields(path = %path.display()))]
pub fn save_file(path: &Path, project: &Project) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let bytes = save(project)?;
    let mut temp_file = tempfile::NamedTempFile::new_in(
        path.parent()
            .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf),
    )
    .context("failed to create temp project file")?;

    use std::io::Write;
    temp_file
        .write_all(&bytes)
        .context("failed to write temp project file")?;
    temp_file
        .persist(path)
        .map_err(|error| anyhow::anyhow!(error.error))
        .with_context(|| format!("failed to persist project: {}", path.display()))?;
    Ok(())
}
