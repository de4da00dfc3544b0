//! Read-oriented catalog operations: ping, search, and album listing.

use super::models::{Album, AlbumDetail, AlbumListPayload, SearchResultPayload, Song};
use super::{extract, extract_opt, SubsonicClient};
use crate::error::Result;
use tracing::debug;

impl SubsonicClient {
    /// True iff the server answered with an ok envelope. Auth or transport
    /// problems surface as errors.
    pub async fn ping(&self) -> Result<bool> {
        self.get("ping.view", &[]).await?;
        Ok(true)
    }

    /// Full-text song search via `search3`.
    pub async fn search_songs(&self, query: &str, count: u32, offset: u32) -> Result<Vec<Song>> {
        let envelope = self
            .get(
                "search3.view",
                &[
                    ("query", query),
                    ("songCount", &count.to_string()),
                    ("songOffset", &offset.to_string()),
                ],
            )
            .await?;
        let result: SearchResultPayload = extract(&envelope, "searchResult3", "search3.view")?;
        Ok(result.song)
    }

    /// One page of the album catalog, cached by `{base_url, list_type,
    /// size, offset}` until the cache is cleared.
    pub async fn get_album_list(
        &self,
        list_type: &str,
        size: u32,
        offset: u32,
    ) -> Result<Vec<Album>> {
        let cache_key = format!(
            "{}:getAlbumList2:{list_type}:{size}:{offset}",
            self.config().base_url
        );
        if let Some(cache) = self.cache() {
            if let Some(albums) = cache.get_json::<Vec<Album>>(&cache_key) {
                debug!(list_type, size, offset, "cache hit for album list page");
                return Ok(albums);
            }
            debug!(list_type, size, offset, "cache miss for album list page");
        }

        let envelope = self
            .get(
                "getAlbumList2.view",
                &[
                    ("type", list_type),
                    ("size", &size.to_string()),
                    ("offset", &offset.to_string()),
                ],
            )
            .await?;
        let page: AlbumListPayload = extract(&envelope, "albumList2", "getAlbumList2.view")?;

        if let Some(cache) = self.cache() {
            cache.put_json(cache_key, &page.album);
        }
        Ok(page.album)
    }

    /// Every song of one album, cached by `{base_url, album_id}`.
    pub async fn get_album_songs(&self, album_id: &str) -> Result<Vec<Song>> {
        let cache_key = format!("{}:getAlbum:{album_id}", self.config().base_url);
        if let Some(cache) = self.cache() {
            if let Some(songs) = cache.get_json::<Vec<Song>>(&cache_key) {
                debug!(album_id, "cache hit for album songs");
                return Ok(songs);
            }
            debug!(album_id, "cache miss for album songs");
        }

        let envelope = self.get("getAlbum.view", &[("id", album_id)]).await?;
        let detail: Option<AlbumDetail> = extract_opt(&envelope, "album", "getAlbum.view")?;
        let songs = detail.map(|d| d.song).unwrap_or_default();

        if let Some(cache) = self.cache() {
            cache.put_json(cache_key, &songs);
        }
        Ok(songs)
    }
}
