//! Playback dispatch
//!
//! Serves master playlists, media playlists and segments out of the session
//! registry. Never writes to it.

mod config;
mod dispatcher;

pub use config::PlaybackConfig;
pub use dispatcher::{MasterResolution, PlayResolver, Playback, PlaylistDocument};
