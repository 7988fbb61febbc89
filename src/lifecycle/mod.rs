//! Publish lifecycle
//!
//! A publish moves through `authorize` -> `on_publish` -> `on_publish_end`.
//! Each step is its own trait so the transport can be wired against them
//! independently; `PublishController` implements all three.

mod config;
mod controller;
mod hooks;

pub use config::PublishConfig;
pub use controller::PublishController;
pub use hooks::{PublishAuthorizer, PublishEndHandler, PublishHandler};
