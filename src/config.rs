use crate::lifecycle::PublishConfig;
use crate::media::SegmenterOptions;
use crate::playback::PlaybackConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub auth: AuthConfig,
    pub playback: PlaybackSettings,
    pub segmenter: SegmenterSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Endpoint receiving `{"StreamKey": ...}`
    pub url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackSettings {
    pub poll_interval_ms: u64,
    pub wait_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct SegmenterSettings {
    pub target_duration_secs: u64,
    pub playlist_length: usize,
}

impl Config {
    /// Load from an optional file at `path` (extension inferred) over the
    /// built-in defaults, then apply `GATEWAY__SECTION__KEY` overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "stream-gateway")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 7935_i64)?
            .set_default("auth.url", "http://localhost:8001/auth")?
            .set_default("auth.timeout_ms", 5000_i64)?
            .set_default("playback.poll_interval_ms", 1000_i64)?
            .set_default("playback.wait_timeout_ms", 10_000_i64)?
            .set_default("segmenter.target_duration_secs", 8_i64)?
            .set_default("segmenter.playlist_length", 3_i64)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("GATEWAY").separator("__"))
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        Ok(settings.try_deserialize()?)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth.timeout_ms)
    }

    pub fn publish_config(&self) -> PublishConfig {
        PublishConfig {
            segmenter: SegmenterOptions {
                segment_length: Duration::from_secs(self.segmenter.target_duration_secs),
            },
            playlist_length: self.segmenter.playlist_length,
            ..PublishConfig::default()
        }
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            poll_interval: Duration::from_millis(self.playback.poll_interval_ms),
            wait_timeout: Duration::from_millis(self.playback.wait_timeout_ms),
        }
    }
}
