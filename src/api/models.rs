//! Subsonic data model and envelope payload types.
//!
//! The upstream API is loosely typed: most fields are optional in practice,
//! and any list-shaped field may arrive as a bare object when it holds a
//! single element. [`one_or_many`] is the single point where that shape
//! inconsistency is normalized away.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a field that is either a JSON array, a single object, or
/// absent, always producing a `Vec`.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(OneOrMany::Many(items)) => Ok(items),
        Some(OneOrMany::One(item)) => Ok(vec![item]),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Song {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default, alias = "albumId")]
    pub album_id: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub track: Option<u32>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, alias = "contentType")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Album {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default, alias = "songCount")]
    pub song_count: u32,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default, alias = "songCount")]
    pub song_count: u32,
    #[serde(default)]
    pub duration: u32,
}

impl Playlist {
    /// Ownership predicate used by policy checks before mutations.
    /// Comparison is case-insensitive, matching server behavior for
    /// usernames. A playlist without an owner field belongs to nobody.
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner
            .as_deref()
            .map(|owner| owner.eq_ignore_ascii_case(username))
            .unwrap_or(false)
    }
}

// Payload containers extracted from the envelope, one per endpoint family.

#[derive(Debug, Deserialize, Default)]
pub(crate) struct PlaylistsPayload {
    #[serde(default, deserialize_with = "one_or_many")]
    pub playlist: Vec<Playlist>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: Playlist,
    #[serde(default, deserialize_with = "one_or_many")]
    pub entry: Vec<Song>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct SearchResultPayload {
    #[serde(default, deserialize_with = "one_or_many")]
    pub song: Vec<Song>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct AlbumListPayload {
    #[serde(default, deserialize_with = "one_or_many")]
    pub album: Vec<Album>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlbumDetail {
    #[serde(flatten)]
    pub album: Album,
    #[serde(default, deserialize_with = "one_or_many")]
    pub song: Vec<Song>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_field_accepts_array() {
        let payload: AlbumListPayload = serde_json::from_value(json!({
            "album": [{"id": "1", "name": "A"}, {"id": "2", "name": "B"}]
        }))
        .unwrap();
        assert_eq!(payload.album.len(), 2);
    }

    #[test]
    fn singleton_object_normalizes_to_one_element_vec() {
        let payload: AlbumDetail = serde_json::from_value(json!({
            "id": "al-1",
            "name": "Lone",
            "song": {"id": "s-1", "title": "Only Track"}
        }))
        .unwrap();
        assert_eq!(payload.song.len(), 1);
        assert_eq!(payload.song[0].title, "Only Track");
    }

    #[test]
    fn absent_list_field_is_empty() {
        let payload: PlaylistsPayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.playlist.is_empty());
    }

    #[test]
    fn song_tolerates_sparse_records() {
        let song: Song = serde_json::from_value(json!({"id": "s-9"})).unwrap();
        assert_eq!(song.id, "s-9");
        assert_eq!(song.title, "");
        assert_eq!(song.duration, 0);
        assert!(song.artist.is_none());
    }

    #[test]
    fn playlist_detail_flattens_summary_and_entries() {
        let detail: PlaylistDetail = serde_json::from_value(json!({
            "id": "pl-1",
            "name": "Mix",
            "owner": "alice",
            "songCount": 2,
            "entry": [{"id": "a", "title": "One"}, {"id": "b", "title": "Two"}]
        }))
        .unwrap();
        assert_eq!(detail.playlist.name, "Mix");
        assert_eq!(detail.playlist.song_count, 2);
        assert_eq!(detail.entry.len(), 2);
    }

    #[test]
    fn ownership_is_case_insensitive() {
        let playlist = Playlist {
            owner: Some("Alice".to_string()),
            ..Playlist::default()
        };
        assert!(playlist.is_owned_by("alice"));
        assert!(!playlist.is_owned_by("bob"));
    }

    #[test]
    fn ownerless_playlist_belongs_to_nobody() {
        let playlist = Playlist::default();
        assert!(!playlist.is_owned_by("alice"));
    }
}
