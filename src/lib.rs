//! Client library for Subsonic-compatible music servers (Navidrome).
//!
//! The client authenticates every request with a fresh salted MD5 token,
//! normalizes the API's object-or-list JSON quirks, caches expensive
//! listing calls in an explicit no-expiry cache, and can stream an entire
//! library song by song with accurate progress and cooperative
//! cancellation.
//!
//! ```no_run
//! use navitone::{CancelToken, ClientConfig, StreamOptions, SubsonicClient};
//!
//! # async fn run() -> navitone::Result<()> {
//! let client = SubsonicClient::new(
//!     ClientConfig::new("https://nav.example.com", "alice", "sesame"),
//! )?;
//! client.ping().await?;
//!
//! let cancel = CancelToken::new();
//! let mut stream = client
//!     .stream_library(
//!         StreamOptions::default(),
//!         |done, total| eprintln!("{done}/{total}"),
//!         cancel.clone(),
//!     )
//!     .await?;
//! while let Some(song) = stream.next().await {
//!     println!("{}", song.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod error;
pub mod stream;

pub use api::models::{Album, Playlist, Song};
pub use api::{ClientConfig, SubsonicClient};
pub use auth::AuthToken;
pub use cache::{CacheStats, ResponseCache};
pub use error::{ClientError, Result};
pub use stream::{CancelToken, LibraryStream, StreamOptions};
