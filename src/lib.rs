pub mod cli;
pub mod diagnostics;
pub mod fixtures;
pub mod format;
pub mod handle;
pub mod model;
pub mod sink;

pub use cli::{Cli, CliError, Command, dispatch};
pub use diagnostics::{TelemetryGuard, init_tracing};
pub use handle::{
    ErrorKind, ExportEnvelope, HandleError, InfosPatch, PluginCredit, ProjectHandle, ProjectInfos,
};
pub use model::{Channel, InstrumentChannel, OtherChannel, Plugin, Project, SamplerChannel};
pub use sink::TempFileSink;
