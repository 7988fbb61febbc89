use crate::session::PublishIdentity;
use bytes::Bytes;
use std::sync::{Arc, OnceLock};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A slice of live media as received from the publisher
#[derive(Debug, Clone)]
pub struct MediaChunk {
    /// Raw container bytes (MPEG-TS packets)
    pub data: Bytes,
    /// Milliseconds since the publish started
    pub timestamp_ms: u64,
}

/// Receiving side of a live publish
///
/// The transport layer owns the producing end. The app-data slot carries the
/// publish identity from authorization through to the lifecycle handlers.
#[async_trait::async_trait]
pub trait IngestHandle: Send + Sync {
    /// Next chunk, or `None` once the publish has ended or the handle is closed
    async fn recv(&self) -> Option<MediaChunk>;

    /// Close the handle so the transport observes the failure
    fn close(&self);

    fn is_closed(&self) -> bool;

    /// Resolves when the handle is closed
    async fn closed(&self);

    fn app_data(&self) -> Option<&PublishIdentity>;

    /// Returns false if the slot was already filled
    fn set_app_data(&self, identity: PublishIdentity) -> bool;

    /// Request path the publish arrived on, for logging
    fn path(&self) -> &str;
}

pub type IngestSender = mpsc::Sender<MediaChunk>;

/// Ingest handle fed through a bounded channel
pub struct ChannelIngest {
    path: String,
    rx: Mutex<mpsc::Receiver<MediaChunk>>,
    closed: CancellationToken,
    app_data: OnceLock<PublishIdentity>,
}

impl ChannelIngest {
    pub fn new(path: impl Into<String>, capacity: usize) -> (Arc<Self>, IngestSender) {
        let (tx, rx) = mpsc::channel(capacity);
        let ingest = Arc::new(Self {
            path: path.into(),
            rx: Mutex::new(rx),
            closed: CancellationToken::new(),
            app_data: OnceLock::new(),
        });
        (ingest, tx)
    }
}

#[async_trait::async_trait]
impl IngestHandle for ChannelIngest {
    async fn recv(&self) -> Option<MediaChunk> {
        let mut rx = self.rx.lock().await;
        tokio::select! {
            biased;
            _ = self.closed.cancelled() => None,
            chunk = rx.recv() => chunk,
        }
    }

    fn close(&self) {
        if !self.closed.is_cancelled() {
            debug!("Closing ingest {}", self.path);
            self.closed.cancel();
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    async fn closed(&self) {
        self.closed.cancelled().await
    }

    fn app_data(&self) -> Option<&PublishIdentity> {
        self.app_data.get()
    }

    fn set_app_data(&self, identity: PublishIdentity) -> bool {
        self.app_data.set(identity).is_ok()
    }

    fn path(&self) -> &str {
        &self.path
    }
}
