//! gaze-bridge: turns the raw byte stream of an external eye-tracking core
//! into enriched, timestamped gaze records over the source file open in the
//! host editor.
//!
//! The pipeline: socket bytes → [`protocol`] decoding → [`connection`]
//! state machine → [`session`] record assembly, with [`mapping`] converting
//! screen pixels to text positions and tokens along the way. The host editor
//! and display are reached only through the narrow traits in [`host`], and
//! finished records leave through the [`sink`] interface.

pub mod config;
pub mod connection;
pub mod host;
pub mod mapping;
pub mod notify;
pub mod protocol;
pub mod session;
pub mod settings;
pub mod sink;
mod utils;

#[cfg(test)]
mod testutil;

pub use config::BridgeConfig;
pub use connection::{ConnectionManager, ConnectionState, SocketEvent};
pub use host::{
    DisplayInfo, DisplayMetrics, DocumentContext, MarkerId, PointTarget, Position, TextRange,
    WordSpan,
};
pub use mapping::{CoordinateMapper, HighlightController, HighlightMode, WordLocator};
pub use notify::{LogNotifier, Notifier};
pub use session::{GazeRecord, Session, SessionController};
pub use settings::SettingsStore;
pub use sink::{JsonLinesSink, JsonLinesSinkFactory, RecordSink, SinkFactory, SinkSpec};

/// Initialize logging for embedders that have no logger of their own
/// (reads `RUST_LOG`, defaults to info).
pub fn init_logging() {
    logging_builder().init();
}

fn logging_builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
}
