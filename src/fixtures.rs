use chrono::{DateTime, Utc};

use crate::model::{Channel, InstrumentChannel, OtherChannel, Plugin, Project, SamplerChannel};

#[must_use]
pub fn demo_project() -> Project {
    let mut project = Project::new("Night Drive", 174.0);
    project.artist = "demo artist".to_string();
    project.comments = "late session sketch".to_string();
    project.genre = "dnb".to_string();
    project.version = "21.0.3".to_string();
    project.created_at = DateTime::parse_from_rfc3339("2026-02-23T00:00:00Z")
        .expect("fixture timestamp should be valid")
        .with_timezone(&Utc);
    project.time_spent_seconds = 5_400.0;

    project.channels = vec![
        Channel::Sampler(SamplerChannel {
            name: "Kick".to_string(),
            sample_path: Some(r"C:\audio\kick.wav".to_string()),
        }),
        Channel::Instrument(InstrumentChannel {
            name: "Bass".to_string(),
            plugin: Some(Plugin {
                name: "Serum".to_string(),
                vendor: "Xfer Records".to_string(),
            }),
        }),
        Channel::Sampler(SamplerChannel {
            name: "Ambience".to_string(),
            sample_path: None,
        }),
        Channel::Instrument(InstrumentChannel {
            name: "Lead".to_string(),
            plugin: Some(Plugin {
                name: "Serum".to_string(),
                vendor: "Xfer Records".to_string(),
            }),
        }),
        Channel::Instrument(InstrumentChannel {
            name: "Init patch".to_string(),
            plugin: None,
        }),
        Channel::Sampler(SamplerChannel {
            name: "Hat".to_string(),
            sample_path: Some("/home/demo/loops/hat.wav".to_string()),
        }),
        Channel::Other(OtherChannel {
            name: "Automation".to_string(),
        }),
    ];
    project
}
