use crate::error::GatewayResult;
use crate::media::IngestHandle;
use crate::session::PublishIdentity;
use std::sync::Arc;

/// Decides whether a publish may start and mints its identity
#[async_trait::async_trait]
pub trait PublishAuthorizer: Send + Sync {
    async fn authorize(&self, path: &str) -> GatewayResult<PublishIdentity>;
}

/// Takes an authorized ingest live
///
/// The ingest's app-data slot must hold the identity from `authorize`.
#[async_trait::async_trait]
pub trait PublishHandler: Send + Sync {
    async fn on_publish(&self, ingest: Arc<dyn IngestHandle>) -> GatewayResult<PublishIdentity>;
}

/// Tears a session down once its ingest has ended or failed
#[async_trait::async_trait]
pub trait PublishEndHandler: Send + Sync {
    async fn on_publish_end(&self, ingest: &dyn IngestHandle) -> GatewayResult<()>;
}
