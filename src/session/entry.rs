use crate::error::GatewayResult;
use crate::media::{IngestHandle, MasterPlaylist, VariantStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Identifiers minted when a publish is authorized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishIdentity {
    pub session_id: String,
    pub manifest_id: String,
    pub variant_id: String,
}

impl PublishIdentity {
    /// Fresh session and variant ids (UUID v4) for an authorized manifest
    pub fn generate(manifest_id: impl Into<String>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            manifest_id: manifest_id.into(),
            variant_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Snapshot of a session for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub manifest_id: String,
    pub variant_id: String,
    pub started_at: DateTime<Utc>,
}

/// One active ingest
pub struct PublishSession {
    identity: PublishIdentity,
    started_at: DateTime<Utc>,
    ingest: Arc<dyn IngestHandle>,
    cancel: CancellationToken,
    /// Segmentation task, attached once it has been spawned
    task: Mutex<Option<JoinHandle<GatewayResult<()>>>>,
}

impl PublishSession {
    pub fn new(identity: PublishIdentity, ingest: Arc<dyn IngestHandle>) -> Self {
        Self {
            identity,
            started_at: Utc::now(),
            ingest,
            cancel: CancellationToken::new(),
            task: Mutex::new(None),
        }
    }

    pub fn identity(&self) -> &PublishIdentity {
        &self.identity
    }

    pub fn ingest(&self) -> Arc<dyn IngestHandle> {
        Arc::clone(&self.ingest)
    }

    /// Token the segmentation task observes
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    pub async fn attach_task(&self, handle: JoinHandle<GatewayResult<()>>) {
        let mut task = self.task.lock().await;
        *task = Some(handle);
    }

    /// Signal the segmentation task to stop
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the segmentation task and log how it ended
    pub async fn join(&self) {
        let handle = {
            let mut task = self.task.lock().await;
            task.take()
        };

        if let Some(handle) = handle {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(
                    "Segmentation for session {} had failed: {}",
                    self.identity.session_id, e
                ),
                Err(e) => error!(
                    "Segmentation task for session {} panicked: {}",
                    self.identity.session_id, e
                ),
            }
        }
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.identity.session_id.clone(),
            manifest_id: self.identity.manifest_id.clone(),
            variant_id: self.identity.variant_id.clone(),
            started_at: self.started_at,
        }
    }
}

/// Top-level playable manifest
#[derive(Debug, Clone)]
pub struct MasterEntry {
    pub manifest_id: String,
    pub playlist: MasterPlaylist,
}

/// One playable variant and its backing store
pub struct VariantEntry {
    pub variant_id: String,
    pub manifest_id: String,
    pub store: Arc<dyn VariantStore>,
}
