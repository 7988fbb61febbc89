//! Media pipeline collaborators
//!
//! The control plane only talks to these through traits:
//! - `IngestHandle` - receiving side of a live publish
//! - `VariantStore` - live segment/playlist store of one variant
//! - `VariantStoreFactory` - creates the store of each new variant
//! - `Segmenter` - task turning an ingest into segments

pub mod ingest;
pub mod playlist;
pub mod segmenter;
pub mod store;

pub use ingest::{ChannelIngest, IngestHandle, IngestSender, MediaChunk};
pub use playlist::{MasterPlaylist, MediaPlaylist, SegmentRef, VariantRef};
pub use segmenter::{ChunkSegmenter, Segmenter, SegmenterOptions};
pub use store::{
    MemoryStoreFactory, MemoryVariantStore, Segment, StoreResult, VariantStore, VariantStoreFactory,
};
