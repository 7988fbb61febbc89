pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod media;
pub mod path;
pub mod playback;
pub mod session;

pub use auth::{AuthClient, StreamKeyAuthenticator};
pub use config::Config;
pub use error::{AuthError, GatewayError, GatewayResult, StoreError};
pub use http::{create_router, AppState};
pub use lifecycle::{PublishAuthorizer, PublishConfig, PublishController, PublishEndHandler, PublishHandler};
pub use media::{
    ChannelIngest, ChunkSegmenter, IngestHandle, MediaChunk, MemoryStoreFactory,
    MemoryVariantStore, Segmenter, SegmenterOptions, VariantStore, VariantStoreFactory,
};
pub use playback::{MasterResolution, PlayResolver, Playback, PlaybackConfig, PlaylistDocument};
pub use session::{PublishIdentity, SessionInfo, SessionRegistry};
