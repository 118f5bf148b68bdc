/// Tunable constants for the bridge, with the endpoint the tracking core
/// listens on by default.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Host the eye-tracking core serves its gaze stream from.
    pub host: String,
    pub port: u16,

    /// Pixels added to the bounds/work-area delta on each axis to account for
    /// host chrome (title bars, OS insets) that work-area metrics miss.
    pub fixed_border_px: f64,

    /// Per-direction cap on the word-boundary scan. Defends against
    /// pathological lines that contain no delimiter at all.
    pub word_scan_limit: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8008,
            fixed_border_px: 8.0,
            word_scan_limit: 100,
        }
    }
}

impl BridgeConfig {
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
