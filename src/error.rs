use std::time::Duration;
use thiserror::Error;

/// Failure of the publish credential exchange
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("auth request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("auth endpoint rejected stream key with status {0}")]
    Rejected(u16),

    #[error("auth response could not be decoded: {0}")]
    Decode(String),
}

/// Outcomes reported by a variant backing store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("playlist not ready")]
    NotReady,

    #[error("end of stream")]
    EndOfStream,

    #[error("segment not found: {0}")]
    SegmentNotFound(String),

    #[error("store closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum GatewayError {
    /// No identifier could be extracted from the request path
    #[error("could not parse identifier from path: {0}")]
    Parse(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("no matching stream: {0}")]
    NoSuchStream(String),

    #[error("playlist for {id} not ready after {waited:?}")]
    NotReadyTimeout { id: String, waited: Duration },

    #[error("stream ended: {0}")]
    EndOfStream(String),

    #[error("segmentation pipeline failed: {0}")]
    Pipeline(String),

    #[error("manifest already publishing: {0}")]
    AlreadyPublishing(String),

    #[error("ingest handle carries no publish identity")]
    MissingAppData,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
