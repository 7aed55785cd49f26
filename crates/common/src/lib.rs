use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scan origin. Directory sources own the files under their root;
/// manifest sources own whatever the manifest file enumerates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Directory,
    Manifest,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub location: String,
    pub kind: SourceKind,
    pub scanning: bool,
    #[serde(default)]
    pub last_scanned_at: Option<u64>,
}

impl Source {
    pub fn new(location: &str, kind: SourceKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            location: location.to_string(),
            kind,
            scanning: false,
            last_scanned_at: None,
        }
    }
}

/// One audio file. A track is shared between every source that claims
/// it and carries at most one filesystem identity at a time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub location: String,
    pub filesystem_id: String,
    pub size: u64,
    pub mtime: u64,
    pub name: Option<String>,
    pub num: Option<u16>,
    pub duration_ms: Option<u32>,
    pub comment: Option<String>,
    pub composer: Option<String>,
    pub date: Option<String>,
    pub original_date: Option<String>,
    pub group: Option<String>,
    pub lyrics: Option<String>,
    pub mood: Option<String>,
    pub subtitle: Option<String>,
    pub disc_id: Option<String>,
    pub genre_id: Option<String>,
    pub track_artist_id: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Track {
    pub fn new_at_location(location: &str) -> Self {
        let now = now_secs();
        Self {
            id: Uuid::new_v4().to_string(),
            location: location.to_string(),
            filesystem_id: String::new(),
            size: 0,
            mtime: 0,
            name: None,
            num: None,
            duration_ms: None,
            comment: None,
            composer: None,
            date: None,
            original_date: None,
            group: None,
            lyrics: None,
            mood: None,
            subtitle: None,
            disc_id: None,
            genre_id: None,
            track_artist_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A track that was created but never fully refreshed (interrupted
    /// scan) still needs its attributes read.
    pub fn is_incomplete(&self) -> bool {
        self.filesystem_id.is_empty() || self.mtime == 0
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlbumArtist {
    pub id: String,
    pub name: String,
    pub sort_name: Option<String>,
}

impl AlbumArtist {
    pub fn new(name: &str, sort_name: Option<String>) -> Self {
        Self {
            id: stable_id(&format!("album_artist:{}", normalize_name(name))),
            name: name.to_string(),
            sort_name,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub album_artist_id: String,
    pub total_discs: Option<u16>,
}

impl Album {
    pub fn new(name: &str, album_artist_id: &str, total_discs: Option<u16>) -> Self {
        Self {
            id: stable_id(&format!(
                "album:{}:{}",
                album_artist_id,
                normalize_name(name)
            )),
            name: name.to_string(),
            album_artist_id: album_artist_id.to_string(),
            total_discs,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Disc {
    pub id: String,
    pub num: Option<u16>,
    pub album_id: String,
    pub subtitle: Option<String>,
    pub total_tracks: Option<u16>,
}

impl Disc {
    pub fn new(
        num: Option<u16>,
        album_id: &str,
        subtitle: Option<String>,
        total_tracks: Option<u16>,
    ) -> Self {
        Self {
            id: stable_id(&format!("disc:{}:{}", album_id, num.unwrap_or(0))),
            num,
            album_id: album_id.to_string(),
            subtitle,
            total_tracks,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: String,
    pub name: String,
    pub sort_name: Option<String>,
}

impl TrackArtist {
    pub fn new(name: &str, sort_name: Option<String>) -> Self {
        Self {
            id: stable_id(&format!("track_artist:{}", normalize_name(name))),
            name: name.to_string(),
            sort_name,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

impl Genre {
    pub fn new(name: &str) -> Self {
        Self {
            id: stable_id(&format!("genre:{}", normalize_name(name))),
            name: name.to_string(),
        }
    }
}

/// Embedded artwork, deduplicated by content hash of the raw bytes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub data: Vec<u8>,
}

impl Image {
    pub fn for_data(data: Vec<u8>) -> Self {
        Self {
            id: blake3::hash(&data).to_hex().to_string(),
            data,
        }
    }
}

/// Canonical comparison key for free-text fields: case-folded, with
/// runs of whitespace and punctuation collapsed to single spaces.
pub fn normalize_name(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_space = true;
    for ch in value.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Stable identity for a file across renames on one filesystem.
pub fn filesystem_id(dev: u64, ino: u64) -> String {
    format!("{}-{}", dev, ino)
}

pub fn stable_id(input: &str) -> String {
    blake3::hash(input.as_bytes()).to_hex().to_string()
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs()
}
