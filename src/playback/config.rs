use std::time::Duration;

/// Bounded wait applied while a media playlist is not ready yet
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Delay between polls of the variant store
    pub poll_interval: Duration,

    /// Total time a request may wait for a ready playlist
    pub wait_timeout: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            wait_timeout: Duration::from_secs(10),
        }
    }
}
