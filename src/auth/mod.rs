pub mod client;
pub mod messages;

pub use client::{AuthClient, StreamKeyAuthenticator};
pub use messages::{AuthRequest, AuthResponse};
