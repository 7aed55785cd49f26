use std::path::Path;

use lofty::error::LoftyError;
use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};
use lofty::tag::Tag;

/// Flat attribute map produced by one tag read. Field names are the
/// fixed vocabulary the catalog mapper consumes.
#[derive(Debug, Default, Clone)]
pub struct TagAttributes {
    pub album: Option<String>,
    pub album_sort_order: Option<String>,
    pub composer: Option<String>,
    pub compilation: bool,
    pub date: Option<String>,
    pub disc_subtitle: Option<String>,
    pub length_ms: Option<u32>,
    pub genre: Option<String>,
    pub group: Option<String>,
    pub lyrics: Option<String>,
    pub mood: Option<String>,
    pub original_date: Option<String>,
    pub subtitle: Option<String>,
    pub artist: Option<String>,
    pub artist_sort_order: Option<String>,
    pub title: Option<String>,
    pub title_sort_order: Option<String>,
    pub comment: Option<String>,
    pub album_artist: Option<String>,
    pub album_artist_sort_order: Option<String>,
    pub album_art: Vec<Vec<u8>>,
    pub track_number: Option<u16>,
    pub disc_number: Option<u16>,
}

#[derive(Debug)]
pub enum MetadataError {
    Io(std::io::Error),
    Lofty(LoftyError),
}

impl std::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataError::Io(err) => write!(f, "io error: {}", err),
            MetadataError::Lofty(err) => write!(f, "tag error: {}", err),
        }
    }
}

impl std::error::Error for MetadataError {}

impl From<std::io::Error> for MetadataError {
    fn from(err: std::io::Error) -> Self {
        MetadataError::Io(err)
    }
}

impl From<LoftyError> for MetadataError {
    fn from(err: LoftyError) -> Self {
        MetadataError::Lofty(err)
    }
}

/// Tag-decoder seam. The catalog only depends on this trait; scans can
/// run against any decoder that yields the attribute vocabulary.
pub trait TagReader: Send + Sync {
    fn read_tags(&self, path: &Path) -> Result<TagAttributes, MetadataError>;
}

/// Production decoder backed by lofty.
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Result<TagAttributes, MetadataError> {
        let tagged_file = lofty::read_from_path(path)?;
        let properties = tagged_file.properties();

        let mut attrs = TagAttributes::default();

        let duration_ms = properties.duration().as_millis();
        if duration_ms > 0 {
            attrs.length_ms = Some(duration_ms.min(u128::from(u32::MAX)) as u32);
        }

        if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
            read_text_items(tag, &mut attrs);
            attrs.track_number = tag.get_string(&ItemKey::TrackNumber).and_then(parse_u16);
            attrs.disc_number = tag.get_string(&ItemKey::DiscNumber).and_then(parse_u16);
            attrs.compilation = tag
                .get_string(&ItemKey::FlagCompilation)
                .map(|v| v.trim() == "1")
                .unwrap_or(false);
            attrs.album_art = tag
                .pictures()
                .iter()
                .map(|picture| picture.data().to_vec())
                .collect();
        }

        Ok(attrs)
    }
}

fn read_text_items(tag: &Tag, attrs: &mut TagAttributes) {
    let get = |key: &ItemKey| tag.get_string(key).map(|v| v.to_string());

    attrs.album = get(&ItemKey::AlbumTitle);
    attrs.album_sort_order = get(&ItemKey::AlbumTitleSortOrder);
    attrs.composer = get(&ItemKey::Composer);
    attrs.date = get(&ItemKey::RecordingDate).or_else(|| get(&ItemKey::Year));
    attrs.disc_subtitle = get(&ItemKey::SetSubtitle);
    attrs.genre = get(&ItemKey::Genre);
    attrs.group = get(&ItemKey::ContentGroup);
    attrs.lyrics = get(&ItemKey::Lyrics);
    attrs.mood = get(&ItemKey::Mood);
    attrs.original_date = get(&ItemKey::OriginalReleaseDate);
    attrs.subtitle = get(&ItemKey::TrackSubtitle);
    attrs.artist = get(&ItemKey::TrackArtist);
    attrs.artist_sort_order = get(&ItemKey::TrackArtistSortOrder);
    attrs.title = get(&ItemKey::TrackTitle);
    attrs.title_sort_order = get(&ItemKey::TrackTitleSortOrder);
    attrs.comment = get(&ItemKey::Comment);
    attrs.album_artist = get(&ItemKey::AlbumArtist);
    attrs.album_artist_sort_order = get(&ItemKey::AlbumArtistSortOrder);
}

fn parse_u16(text: &str) -> Option<u16> {
    let head = text.split('/').next().unwrap_or(text).trim();
    head.parse().ok()
}
