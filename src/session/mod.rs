//! Publish session state
//!
//! This module provides the shared state of the gateway:
//! - `PublishSession` - one active ingest and its segmentation task
//! - `MasterEntry` / `VariantEntry` - the playable artifacts of a session
//! - `SessionRegistry` - owner of all three collections

mod entry;
mod registry;

pub use entry::{MasterEntry, PublishIdentity, PublishSession, SessionInfo, VariantEntry};
pub use registry::{RemovedSession, SessionRegistry};
