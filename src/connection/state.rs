use serde::{Deserialize, Serialize};

/// Lifecycle of the link to the tracking core.
///
/// `Disconnected → Connecting → Connected → Started → Stopped → Disconnected`
/// is the normal cycle. `Locked` is a reserved terminal-error state; nothing
/// transitions into it yet, but a locked bridge refuses to connect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Started,
    Stopped,
    Locked,
}

impl Default for ConnectionState {
    fn default() -> Self {
        ConnectionState::Disconnected
    }
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Connected => "Connected",
            ConnectionState::Started => "Started",
            ConnectionState::Stopped => "Stopped",
            ConnectionState::Locked => "Locked",
        }
    }
}
