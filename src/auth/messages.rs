use serde::{Deserialize, Serialize};

/// Body sent to the auth endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthRequest {
    #[serde(rename = "StreamKey")]
    pub stream_key: String,
}

/// Body returned by the auth endpoint
///
/// A missing manifest id decodes as empty, which is passed through as is.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "ManifestID", alias = "manifestID", alias = "manifestId", default)]
    pub manifest_id: String,
}
