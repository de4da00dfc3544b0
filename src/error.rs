//! Error types for the Subsonic catalog client.

use thiserror::Error;

/// Errors surfaced by [`crate::SubsonicClient`] operations.
///
/// Nothing in this crate retries: every request is at-most-once, and the
/// caller decides whether a failure aborts or is skipped.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: connection, timeout, or TLS.
    #[error("network error calling {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP succeeded but the body was not a valid Subsonic envelope.
    #[error("protocol error from {endpoint}: {detail}")]
    Protocol { endpoint: String, detail: String },

    /// The server reported a failure inside the envelope.
    #[error("subsonic error {code}: {message}")]
    Subsonic { code: i64, message: String },

    /// Mutation attempted on a playlist owned by someone else. Raised
    /// before any network call is made.
    #[error("playlist is owned by {owner}; only the owner may modify it")]
    NotOwner { owner: String },

    /// A delete-then-recreate transaction deleted the playlist but could
    /// not recreate it. The name and ordered track ids are carried so the
    /// caller can retry instead of losing the playlist.
    #[error("playlist {name:?} was deleted but could not be recreated: {source}")]
    RecreateFailed {
        name: String,
        song_ids: Vec<String>,
        #[source]
        source: Box<ClientError>,
    },

    /// Client construction rejected the supplied configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
