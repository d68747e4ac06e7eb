use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub title: String,
    pub artist: String,
    pub comments: String,
    pub genre: String,
    pub version: String,
    pub tempo: f64,
    pub created_at: DateTime<Utc>,
    pub time_spent_seconds: f64,
    pub channels: Vec<Channel>,
}

impl Project {
    #[must_use]
    pub fn new(title: impl Into<String>, tempo: f64) -> Self {
        Self {
            title: title.into(),
            artist: String::new(),
            comments: String::new(),
            genre: String::new(),
            version: "21.0.0".to_string(),
            tempo,
            created_at: Utc::now(),
            time_spent_seconds: 0.0,
            channels: Vec::new(),
        }
    }

    #[must_use]
    pub fn sampler_count(&self) -> usize {
        self.channels
            .iter()
            .filter(|channel| matches!(channel, Channel::Sampler(_)))
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sampler(SamplerChannel),
    Instrument(InstrumentChannel),
    Other(OtherChannel),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SamplerChannel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentChannel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<Plugin>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OtherChannel {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plugin {
    pub name: String,
    pub vendor: String,
}
