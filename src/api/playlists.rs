//! Playlist operations: listing, CRUD, and the delete-then-recreate
//! replacement transaction.
//!
//! The upstream API has no reorder primitive; changing track order means
//! deleting the playlist and creating it again with the new order, which
//! also assigns a new id. [`SubsonicClient::replace_playlist`] wraps that
//! window as one logical transaction.

use super::models::{Playlist, PlaylistDetail, PlaylistsPayload, Song};
use super::{extract, extract_opt, SubsonicClient};
use crate::error::{ClientError, Result};
use tracing::warn;

impl SubsonicClient {
    /// Playlist summaries. Uncached: playlists mutate frequently.
    pub async fn get_playlists(&self) -> Result<Vec<Playlist>> {
        let envelope = self.get("getPlaylists.view", &[]).await?;
        let payload: PlaylistsPayload = extract(&envelope, "playlists", "getPlaylists.view")?;
        Ok(payload.playlist)
    }

    /// Tracks of one playlist in authoritative server order. Uncached.
    pub async fn get_playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Song>> {
        let envelope = self.get("getPlaylist.view", &[("id", playlist_id)]).await?;
        let detail: Option<PlaylistDetail> =
            extract_opt(&envelope, "playlist", "getPlaylist.view")?;
        Ok(detail.map(|d| d.entry).unwrap_or_default())
    }

    /// Create a playlist whose order follows `song_ids`. Returns the new
    /// playlist id.
    pub async fn create_playlist(&self, name: &str, song_ids: &[String]) -> Result<String> {
        let envelope = self
            .post("createPlaylist.view", &[("name", name)], Some(song_ids))
            .await?;
        let playlist: Option<Playlist> = extract_opt(&envelope, "playlist", "createPlaylist.view")?;
        match playlist.map(|p| p.id).filter(|id| !id.is_empty()) {
            Some(id) => Ok(id),
            None => Err(ClientError::Protocol {
                endpoint: "createPlaylist.view".to_string(),
                detail: "no playlist id in response".to_string(),
            }),
        }
    }

    /// Partial update: only the provided fields are sent.
    pub async fn update_playlist(
        &self,
        playlist_id: &str,
        name: Option<&str>,
        public: Option<bool>,
    ) -> Result<()> {
        let mut params = vec![("playlistId", playlist_id)];
        if let Some(name) = name {
            params.push(("name", name));
        }
        if let Some(public) = public {
            params.push(("public", if public { "true" } else { "false" }));
        }
        self.post("updatePlaylist.view", &params, None).await?;
        Ok(())
    }

    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<()> {
        self.post("deletePlaylist.view", &[("id", playlist_id)], None)
            .await?;
        Ok(())
    }

    /// Replace a playlist's contents and order by deleting and recreating
    /// it. Returns the new playlist id; the old id must never be used
    /// again after this call.
    ///
    /// The ownership check runs before any network I/O, so a non-owner
    /// mutation never leaves the process. There is a window in which the
    /// playlist does not exist server-side; do not interleave other
    /// mutations on the same playlist during this call. If the recreate
    /// step fails it is attempted once more; a persistent failure returns
    /// [`ClientError::RecreateFailed`] carrying the name and ordered track
    /// ids so the caller can recover the playlist.
    pub async fn replace_playlist(
        &self,
        playlist: &Playlist,
        song_ids: &[String],
    ) -> Result<String> {
        if !playlist.is_owned_by(&self.config().username) {
            return Err(ClientError::NotOwner {
                owner: playlist
                    .owner
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            });
        }

        self.delete_playlist(&playlist.id).await?;

        match self.create_playlist(&playlist.name, song_ids).await {
            Ok(new_id) => Ok(new_id),
            Err(first) => {
                warn!(
                    playlist = %playlist.name,
                    error = %first,
                    "recreate failed after delete, retrying once"
                );
                match self.create_playlist(&playlist.name, song_ids).await {
                    Ok(new_id) => Ok(new_id),
                    Err(_) => Err(ClientError::RecreateFailed {
                        name: playlist.name.clone(),
                        song_ids: song_ids.to_vec(),
                        source: Box::new(first),
                    }),
                }
            }
        }
    }
}
