//! Two-pass traversal of the entire song library.
//!
//! Pass 1 pages through the album catalog eagerly, summing each album's
//! reported `songCount` so progress can report an accurate total before
//! the first song is yielded. Pass 2 fetches albums lazily, one at a time,
//! as the caller pulls songs. The stream is finite and non-restartable;
//! to start over, construct a new one.

use crate::api::models::{Album, Song};
use crate::api::SubsonicClient;
use crate::error::Result;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Knobs for the library walk.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Album list type passed to `getAlbumList2`.
    pub list_type: String,
    /// Albums requested per page; a shorter page marks the catalog end.
    pub page_size: u32,
    /// Safety cap on the number of pages fetched in pass 1.
    pub max_pages: u32,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            list_type: "alphabeticalByName".to_string(),
            page_size: 500,
            max_pages: 10_000,
        }
    }
}

/// Cooperative cancellation token polled at page and song boundaries.
/// Cancellation never interrupts an in-flight request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Pull-based song stream produced by [`SubsonicClient::stream_library`].
pub struct LibraryStream<'a, P>
where
    P: FnMut(usize, usize),
{
    client: &'a SubsonicClient,
    albums: VecDeque<Album>,
    pending: VecDeque<Song>,
    total: usize,
    fetched: usize,
    progress: P,
    cancel: CancelToken,
    finished: bool,
}

impl SubsonicClient {
    /// Walk the whole catalog. Pass 1 runs here; songs are fetched lazily
    /// through [`LibraryStream::next`].
    ///
    /// `progress` is called with `(0, total)` once pass 1 completes (even
    /// for an empty catalog), after every yielded song, and once more on
    /// natural exhaustion. The reported count never exceeds the pass-1
    /// total. If `cancel` fires during pass 1 the stream finishes without
    /// any progress call; during pass 2 it ends the stream silently with
    /// no error.
    pub async fn stream_library<P>(
        &self,
        options: StreamOptions,
        mut progress: P,
        cancel: CancelToken,
    ) -> Result<LibraryStream<'_, P>>
    where
        P: FnMut(usize, usize),
    {
        let mut albums = VecDeque::new();
        let mut total = 0usize;
        let mut offset = 0u32;
        let mut pages = 0u32;
        let mut cancelled = false;

        while pages < options.max_pages {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let page = self
                .get_album_list(&options.list_type, options.page_size, offset)
                .await?;
            if page.is_empty() {
                break;
            }
            let short_page = (page.len() as u32) < options.page_size;
            for album in page {
                total += album.song_count as usize;
                albums.push_back(album);
            }
            if short_page {
                break;
            }
            offset += options.page_size;
            pages += 1;
        }

        debug!(total, albums = albums.len(), "library walk pass 1 complete");

        if !cancelled {
            progress(0, total);
        }

        Ok(LibraryStream {
            client: self,
            albums: if cancelled { VecDeque::new() } else { albums },
            pending: VecDeque::new(),
            total,
            fetched: 0,
            progress,
            cancel,
            finished: cancelled,
        })
    }

    /// Convenience wrapper that drains a library walk into one `Vec`,
    /// without progress reporting or cancellation.
    pub async fn fetch_all_songs(&self, options: StreamOptions) -> Result<Vec<Song>> {
        let mut stream = self
            .stream_library(options, |_, _| {}, CancelToken::new())
            .await?;
        let mut songs = Vec::new();
        while let Some(song) = stream.next().await {
            songs.push(song);
        }
        Ok(songs)
    }
}

impl<P> LibraryStream<'_, P>
where
    P: FnMut(usize, usize),
{
    /// Pass-1 song total; `0` is a legitimate value for an empty catalog.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Songs yielded so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// Pull the next song. Albums that fail to fetch are skipped, never
    /// aborting the traversal. Returns `None` once the catalog is
    /// exhausted or the token is cancelled.
    pub async fn next(&mut self) -> Option<Song> {
        if self.finished {
            return None;
        }

        loop {
            if self.cancel.is_cancelled() {
                self.finished = true;
                return None;
            }

            if let Some(song) = self.pending.pop_front() {
                self.fetched += 1;
                (self.progress)(self.fetched.min(self.total), self.total);
                return Some(song);
            }

            let Some(album) = self.albums.pop_front() else {
                self.finished = true;
                (self.progress)(self.fetched.min(self.total), self.total);
                return None;
            };
            if album.id.is_empty() {
                continue;
            }

            match self.client.get_album_songs(&album.id).await {
                Ok(songs) => self.pending = songs.into(),
                Err(err) => {
                    warn!(album = %album.id, error = %err, "skipping album after fetch failure");
                }
            }
        }
    }
}
