use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::format;
use crate::model::{Channel, Project};

#[derive(Debug, Error)]
pub enum HandleError {
    #[error("Error while parsing the file")]
    Load,
    #[error("Error while getting infos")]
    Read,
    #[error("Error while setting infos")]
    SetInfos,
    #[error("Error while set samples")]
    SetSamples,
    #[error("Error while exporting file")]
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    Read,
    Write,
    Export,
}

impl HandleError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandleError::Load => ErrorKind::Load,
            HandleError::Read => ErrorKind::Read,
            HandleError::SetInfos | HandleError::SetSamples => ErrorKind::Write,
            HandleError::Export => ErrorKind::Export,
        }
    }
}

/// Flat metadata record handed back to the host. Key spelling is part of
/// the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfos {
    pub title: String,
    pub artist: String,
    pub description: String,
    pub genre: String,
    pub version: String,
    pub tempo: f64,
    pub created_at: i64,
    pub work_time: f64,
    pub samples: Vec<String>,
    pub plugins: Vec<PluginCredit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginCredit {
    pub name: String,
    pub by: String,
}

/// Partial metadata update; absent keys leave the project untouched.
/// Values are coerced the way the host already sends them (numbers may
/// arrive as strings).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InfosPatch {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub tempo: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ExportEnvelope {
    #[serde(flatten)]
    pub infos: Option<ProjectInfos>,
    pub file: String,
}

#[derive(Debug, Clone)]
pub struct ProjectHandle {
    project: Project,
    project_dir: Option<String>,
}

impl ProjectHandle {
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn from_bytes(bytes: &[u8], project_dir: Option<String>) -> Result<Self, HandleError> {
        let project = format::parse(bytes).map_err(|cause| {
            error!(%cause, "project load failed");
            HandleError::Load
        })?;
        info!(
            title = %project.title,
            channels = project.channels.len(),
            samplers = project.sampler_count(),
            "project loaded"
        );
        Ok(Self {
            project,
            project_dir,
        })
    }

    #[instrument(fields(path = %path.display()))]
    pub fn from_path(path: &Path, project_dir: Option<String>) -> Result<Self, HandleError> {
        let bytes = std::fs::read(path).map_err(|cause| {
            error!(%cause, "project file unreadable");
            HandleError::Load
        })?;
        Self::from_bytes(&bytes, project_dir)
    }

    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    #[must_use]
    pub fn project_dir(&self) -> Option<&str> {
        self.project_dir.as_deref()
    }

    /// Extracts the metadata record without mutating the project.
    #[instrument(skip(self), fields(title = %self.project.title))]
    pub fn infos(&self) -> Result<ProjectInfos, HandleError> {
        // The source library formats tempo as text; reparse to keep its
        // formatting authoritative.
        let tempo = self
            .project
            .tempo
            .to_string()
            .parse::<f64>()
            .map_err(|cause| {
                error!(%cause, "tempo reparse failed");
                HandleError::Read
            })?;

        let mut samples = Vec::new();
        let mut plugins: Vec<PluginCredit> = Vec::new();
        for channel in &self.project.channels {
            match channel {
                Channel::Sampler(sampler) => {
                    if let Some(path) = &sampler.sample_path
                        && !path.is_empty()
                    {
                        samples.push(path.clone());
                    }
                }
                Channel::Instrument(instrument) => {
                    // A channel with no plugin attached is a normal case,
                    // not a failure.
                    if let Some(plugin) = &instrument.plugin
                        && !plugins.iter().any(|credit| credit.name == plugin.name)
                    {
                        plugins.push(PluginCredit {
                            name: plugin.name.clone(),
                            by: plugin.vendor.clone(),
                        });
                    }
                }
                Channel::Other(_) => {}
            }
        }

        Ok(ProjectInfos {
            title: self.project.title.clone(),
            artist: self.project.artist.clone(),
            description: self.project.comments.clone(),
            genre: self.project.genre.clone(),
            version: self.project.version.clone(),
            tempo,
            created_at: self.project.created_at.timestamp(),
            work_time: self.project.time_spent_seconds,
            samples,
            plugins,
        })
    }

    pub fn infos_json(&self) -> Result<String, HandleError> {
        let infos = self.infos()?;
        serde_json::to_string(&infos).map_err(|cause| {
            error!(%cause, "infos serialization failed");
            HandleError::Read
        })
    }

    /// Applies the fields present in `patch`, then relocates sampler paths
    /// when a project directory is known.
    #[instrument(skip(self, patch), fields(title = %self.project.title))]
    pub fn set_infos(&mut self, patch: &InfosPatch) -> Result<(), HandleError> {
        if let Some(title) = &patch.title {
            self.project.title = title.clone();
        }
        if let Some(artist) = &patch.artist {
            self.project.artist = artist.clone();
        }
        if let Some(description) = &patch.description {
            self.project.comments = description.clone();
        }
        if let Some(genre) = &patch.genre {
            self.project.genre = genre.clone();
        }
        if let Some(tempo) = patch.tempo {
            if !tempo.is_finite() || tempo <= 0.0 {
                error!(tempo, "rejected tempo value");
                return Err(HandleError::SetInfos);
            }
            self.project.tempo = tempo;
        }

        let relocated = self.relocate_sampler_paths();
        info!(relocated, "infos patched");
        Ok(())
    }

    /// Sampler-path relocation alone, without touching any other field.
    #[instrument(skip(self), fields(title = %self.project.title))]
    pub fn relocate_samples(&mut self) -> Result<usize, HandleError> {
        let relocated = self.relocate_sampler_paths();
        info!(relocated, "samples relocated");
        Ok(relocated)
    }

    fn relocate_sampler_paths(&mut self) -> usize {
        let Some(project_dir) = self.project_dir.as_deref() else {
            return 0;
        };

        let mut relocated = 0;
        for channel in &mut self.project.channels {
            if let Channel::Sampler(sampler) = channel
                && let Some(path) = &sampler.sample_path
                && !path.is_empty()
            {
                sampler.sample_path = Some(relocated_sample_path(project_dir, path));
                relocated += 1;
            }
        }
        relocated
    }

    /// Serializes the project and wraps the base64 bytes in the result
    /// envelope, optionally bundling the metadata record.
    #[instrument(skip(self), fields(title = %self.project.title, bundle_infos))]
    pub fn export(&self, bundle_infos: bool) -> Result<String, HandleError> {
        let bytes = format::save(&self.project).map_err(|cause| {
            error!(%cause, "project serialization failed");
            HandleError::Export
        })?;

        let envelope = ExportEnvelope {
            infos: if bundle_infos {
                Some(self.infos().map_err(|_| HandleError::Export)?)
            } else {
                None
            },
            file: BASE64.encode(bytes),
        };
        serde_json::to_string(&envelope).map_err(|cause| {
            error!(%cause, "export envelope serialization failed");
            HandleError::Export
        })
    }
}

/// `<projectDir>/samples/<basename>`, forward slashes only. Basenames are
/// taken after normalizing both separator styles so Windows-authored
/// projects relocate cleanly on any host.
fn relocated_sample_path(project_dir: &str, original: &str) -> String {
    let normalized = original.replace('\\', "/");
    let basename = normalized.rsplit('/').next().unwrap_or(&normalized);
    let dir = project_dir.replace('\\', "/");
    let dir = dir.trim_end_matches('/');
    format!("{dir}/samples/{basename}")
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        Some(serde_json::Value::Number(number)) => Ok(Some(number.to_string())),
        Some(serde_json::Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string-like value, got {other}"
        ))),
    }
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(number)) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| de::Error::custom("tempo out of range")),
        Some(serde_json::Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(de::Error::custom),
        Some(other) => Err(de::Error::custom(format!(
            "expected a number-like value, got {other}"
        ))),
    }
}
