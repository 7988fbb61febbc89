use crate::lifecycle::{PublishAuthorizer, PublishController, PublishEndHandler, PublishHandler};
use crate::playback::Playback;
use crate::session::SessionRegistry;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Live sessions (read-only from the HTTP layer)
    pub registry: Arc<SessionRegistry>,

    pub authorizer: Arc<dyn PublishAuthorizer>,
    pub publish_handler: Arc<dyn PublishHandler>,
    pub end_handler: Arc<dyn PublishEndHandler>,

    pub playback: Arc<Playback>,
}

impl AppState {
    /// Wire every publish hook to the same controller
    pub fn new(controller: Arc<PublishController>, playback: Arc<Playback>) -> Self {
        Self {
            registry: Arc::clone(controller.registry()),
            authorizer: controller.clone(),
            publish_handler: controller.clone(),
            end_handler: controller,
            playback,
        }
    }
}
