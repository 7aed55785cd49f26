use std::fs;
use std::path::Path;
use std::sync::Arc;

use common::{
    normalize_name, Album, AlbumArtist, Disc, Genre, Image, Source, SourceKind, Track, TrackArtist,
};
use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::CatalogError;

const KEY_SEP: char = '\x1f';

const SOURCES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sources");
const TRACKS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tracks");
const TRACKS_BY_LOCATION_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("tracks_by_location");
const TRACKS_BY_FSID_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tracks_by_fsid");
const ALBUM_ARTISTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("album_artists");
const ALBUM_ARTISTS_BY_KEY_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("album_artists_by_key");
const ALBUMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("albums");
const ALBUMS_BY_KEY_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("albums_by_key");
const TRACK_ARTISTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("track_artists");
const TRACK_ARTISTS_BY_KEY_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("track_artists_by_key");
const DISCS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("discs");
const DISCS_BY_KEY_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("discs_by_key");
const GENRES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("genres");
const GENRES_BY_KEY_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("genres_by_key");
const IMAGES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("images");
const IMAGES_BY_KEY_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("images_by_key");
const SOURCE_TRACKS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("source_tracks");
const TRACK_SOURCES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("track_sources");
const TRACK_IMAGES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("track_images");
const IMAGE_TRACKS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("image_tracks");

/// Deduplicated entity with a natural key. The key string is already
/// normalized; textually different but logically equal inputs must
/// produce the same key.
pub trait UniqueEntity: Serialize + for<'de> Deserialize<'de> {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]>;
    const KEY_TABLE: TableDefinition<'static, &'static str, &'static [u8]>;

    fn id(&self) -> &str;
    fn natural_key(&self) -> String;
}

impl UniqueEntity for AlbumArtist {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]> = ALBUM_ARTISTS_TABLE;
    const KEY_TABLE: TableDefinition<'static, &'static str, &'static [u8]> =
        ALBUM_ARTISTS_BY_KEY_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        normalize_name(&self.name)
    }
}

impl UniqueEntity for Album {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]> = ALBUMS_TABLE;
    const KEY_TABLE: TableDefinition<'static, &'static str, &'static [u8]> = ALBUMS_BY_KEY_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        join_key(&self.album_artist_id, &normalize_name(&self.name))
    }
}

impl UniqueEntity for TrackArtist {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]> = TRACK_ARTISTS_TABLE;
    const KEY_TABLE: TableDefinition<'static, &'static str, &'static [u8]> =
        TRACK_ARTISTS_BY_KEY_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        normalize_name(&self.name)
    }
}

impl UniqueEntity for Disc {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]> = DISCS_TABLE;
    const KEY_TABLE: TableDefinition<'static, &'static str, &'static [u8]> = DISCS_BY_KEY_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        join_key(&self.album_id, &self.num.unwrap_or(0).to_string())
    }
}

impl UniqueEntity for Genre {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]> = GENRES_TABLE;
    const KEY_TABLE: TableDefinition<'static, &'static str, &'static [u8]> = GENRES_BY_KEY_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        normalize_name(&self.name)
    }
}

impl UniqueEntity for Image {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]> = IMAGES_TABLE;
    const KEY_TABLE: TableDefinition<'static, &'static str, &'static [u8]> = IMAGES_BY_KEY_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> String {
        // content hash doubles as the natural key
        self.id.clone()
    }
}

#[derive(Clone)]
pub struct CatalogStore {
    db: Arc<Database>,
}

impl CatalogStore {
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let db = if path.exists() {
            Database::open(path)?
        } else {
            Database::create(path)?
        };
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        Ok(store)
    }

    /// Creates every table up front so read paths never race table
    /// creation.
    fn ensure_tables(&self) -> Result<(), CatalogError> {
        let write_txn = self.db.begin_write()?;
        {
            write_txn.open_table(SOURCES_TABLE)?;
            write_txn.open_table(TRACKS_TABLE)?;
            write_txn.open_table(TRACKS_BY_LOCATION_TABLE)?;
            write_txn.open_table(TRACKS_BY_FSID_TABLE)?;
            write_txn.open_table(ALBUM_ARTISTS_TABLE)?;
            write_txn.open_table(ALBUM_ARTISTS_BY_KEY_TABLE)?;
            write_txn.open_table(ALBUMS_TABLE)?;
            write_txn.open_table(ALBUMS_BY_KEY_TABLE)?;
            write_txn.open_table(TRACK_ARTISTS_TABLE)?;
            write_txn.open_table(TRACK_ARTISTS_BY_KEY_TABLE)?;
            write_txn.open_table(DISCS_TABLE)?;
            write_txn.open_table(DISCS_BY_KEY_TABLE)?;
            write_txn.open_table(GENRES_TABLE)?;
            write_txn.open_table(GENRES_BY_KEY_TABLE)?;
            write_txn.open_table(IMAGES_TABLE)?;
            write_txn.open_table(IMAGES_BY_KEY_TABLE)?;
            write_txn.open_table(SOURCE_TRACKS_TABLE)?;
            write_txn.open_table(TRACK_SOURCES_TABLE)?;
            write_txn.open_table(TRACK_IMAGES_TABLE)?;
            write_txn.open_table(IMAGE_TRACKS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Create-or-fetch by natural key. The lookup and insert share one
    /// write transaction, so two concurrent calls with logically equal
    /// keys converge on a single row instead of racing.
    pub fn find_or_create<E: UniqueEntity>(&self, candidate: E) -> Result<E, CatalogError> {
        let key = candidate.natural_key();
        let write_txn = self.db.begin_write()?;
        let existing = {
            let key_table = write_txn.open_table(E::KEY_TABLE)?;
            let entity_table = write_txn.open_table(E::TABLE)?;
            let id = match key_table.get(key.as_str())? {
                Some(value) => Some(string_value(value.value())),
                None => None,
            };
            match id {
                Some(id) => match entity_table.get(id.as_str())? {
                    Some(value) => Some(decode_value::<E>(value.value())?),
                    None => None,
                },
                None => None,
            }
        };
        if let Some(entity) = existing {
            write_txn.abort()?;
            return Ok(entity);
        }
        {
            let mut key_table = write_txn.open_table(E::KEY_TABLE)?;
            let mut entity_table = write_txn.open_table(E::TABLE)?;
            let bytes = encode_value(&candidate)?;
            entity_table.insert(candidate.id(), bytes.as_slice())?;
            key_table.insert(key.as_str(), candidate.id().as_bytes())?;
        }
        write_txn.commit()?;
        Ok(candidate)
    }

    pub fn get_entity<E: UniqueEntity>(&self, id: &str) -> Result<Option<E>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(E::TABLE)?;
        let entity = match table.get(id)? {
            Some(value) => Some(decode_value(value.value())?),
            None => None,
        };
        Ok(entity)
    }

    // --- sources ---

    pub fn create_source(&self, location: &str, kind: SourceKind) -> Result<Source, CatalogError> {
        let source = Source::new(location, kind);
        self.save_source(&source)?;
        Ok(source)
    }

    pub fn save_source(&self, source: &Source) -> Result<(), CatalogError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SOURCES_TABLE)?;
            let bytes = encode_value(source)?;
            table.insert(source.id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn source(&self, id: &str) -> Result<Option<Source>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SOURCES_TABLE)?;
        let source = match table.get(id)? {
            Some(value) => Some(decode_value(value.value())?),
            None => None,
        };
        Ok(source)
    }

    pub fn list_sources(&self) -> Result<Vec<Source>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SOURCES_TABLE)?;
        let mut sources = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            sources.push(decode_value(entry.1.value())?);
        }
        Ok(sources)
    }

    pub fn source_by_location(
        &self,
        location: &str,
        kind: SourceKind,
    ) -> Result<Option<Source>, CatalogError> {
        for source in self.list_sources()? {
            if source.kind == kind && source.location == location {
                return Ok(Some(source));
            }
        }
        Ok(None)
    }

    pub fn set_scanning(&self, id: &str, scanning: bool) -> Result<(), CatalogError> {
        if let Some(mut source) = self.source(id)? {
            source.scanning = scanning;
            self.save_source(&source)?;
        }
        Ok(())
    }

    pub fn set_last_scanned(&self, id: &str, timestamp: u64) -> Result<(), CatalogError> {
        if let Some(mut source) = self.source(id)? {
            source.last_scanned_at = Some(timestamp);
            self.save_source(&source)?;
        }
        Ok(())
    }

    /// Drops the source and its track associations. The tracks stay
    /// behind for the orphan sweep.
    pub fn delete_source(&self, id: &str) -> Result<(), CatalogError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut sources = write_txn.open_table(SOURCES_TABLE)?;
            sources.remove(id)?;

            let mut source_tracks = write_txn.open_table(SOURCE_TRACKS_TABLE)?;
            let mut track_sources = write_txn.open_table(TRACK_SOURCES_TABLE)?;
            let track_ids = collect_join_values(&source_tracks, id)?;
            for track_id in track_ids {
                source_tracks.remove(join_key(id, &track_id).as_str())?;
                track_sources.remove(join_key(&track_id, id).as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    // --- tracks ---

    /// Inserts or updates a track, keeping the location and
    /// filesystem-id indexes in step. A track holds exactly one
    /// filesystem-id row at any time.
    pub fn save_track(&self, track: &Track) -> Result<(), CatalogError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut tracks = write_txn.open_table(TRACKS_TABLE)?;
            let mut by_location = write_txn.open_table(TRACKS_BY_LOCATION_TABLE)?;
            let mut by_fsid = write_txn.open_table(TRACKS_BY_FSID_TABLE)?;

            let previous: Option<Track> = match tracks.get(track.id.as_str())? {
                Some(value) => Some(decode_value(value.value())?),
                None => None,
            };
            if let Some(previous) = &previous {
                if previous.location != track.location {
                    by_location.remove(previous.location.as_str())?;
                }
                if previous.filesystem_id != track.filesystem_id
                    && !previous.filesystem_id.is_empty()
                {
                    by_fsid.remove(previous.filesystem_id.as_str())?;
                }
            }

            let bytes = encode_value(track)?;
            tracks.insert(track.id.as_str(), bytes.as_slice())?;
            by_location.insert(track.location.as_str(), track.id.as_bytes())?;
            if !track.filesystem_id.is_empty() {
                by_fsid.insert(track.filesystem_id.as_str(), track.id.as_bytes())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_track(&self, id: &str) -> Result<Option<Track>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRACKS_TABLE)?;
        let track = match table.get(id)? {
            Some(value) => Some(decode_value(value.value())?),
            None => None,
        };
        Ok(track)
    }

    pub fn track_by_location(&self, location: &str) -> Result<Option<Track>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(TRACKS_BY_LOCATION_TABLE)?;
        let id = match index.get(location)? {
            Some(value) => string_value(value.value()),
            None => return Ok(None),
        };
        let tracks = read_txn.open_table(TRACKS_TABLE)?;
        let track = match tracks.get(id.as_str())? {
            Some(value) => Some(decode_value(value.value())?),
            None => None,
        };
        Ok(track)
    }

    pub fn track_by_filesystem_id(&self, fsid: &str) -> Result<Option<Track>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(TRACKS_BY_FSID_TABLE)?;
        let id = match index.get(fsid)? {
            Some(value) => string_value(value.value()),
            None => return Ok(None),
        };
        let tracks = read_txn.open_table(TRACKS_TABLE)?;
        let track = match tracks.get(id.as_str())? {
            Some(value) => Some(decode_value(value.value())?),
            None => None,
        };
        Ok(track)
    }

    pub fn list_track_ids(&self) -> Result<Vec<String>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRACKS_TABLE)?;
        let mut ids = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            ids.push(entry.0.value().to_string());
        }
        Ok(ids)
    }

    /// Removes the track, its index rows, and its join rows in both
    /// directions. Unique entities it referenced are left for the
    /// sweeps.
    pub fn delete_track(&self, id: &str) -> Result<bool, CatalogError> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut tracks = write_txn.open_table(TRACKS_TABLE)?;
            let track: Option<Track> = match tracks.get(id)? {
                Some(value) => Some(decode_value(value.value())?),
                None => None,
            };
            match track {
                Some(track) => {
                    tracks.remove(id)?;

                    let mut by_location = write_txn.open_table(TRACKS_BY_LOCATION_TABLE)?;
                    by_location.remove(track.location.as_str())?;
                    if !track.filesystem_id.is_empty() {
                        let mut by_fsid = write_txn.open_table(TRACKS_BY_FSID_TABLE)?;
                        by_fsid.remove(track.filesystem_id.as_str())?;
                    }

                    let mut track_sources = write_txn.open_table(TRACK_SOURCES_TABLE)?;
                    let mut source_tracks = write_txn.open_table(SOURCE_TRACKS_TABLE)?;
                    let source_ids = collect_join_values(&track_sources, id)?;
                    for source_id in source_ids {
                        track_sources.remove(join_key(id, &source_id).as_str())?;
                        source_tracks.remove(join_key(&source_id, id).as_str())?;
                    }

                    let mut track_images = write_txn.open_table(TRACK_IMAGES_TABLE)?;
                    let mut image_tracks = write_txn.open_table(IMAGE_TRACKS_TABLE)?;
                    let image_ids = collect_join_values(&track_images, id)?;
                    for image_id in image_ids {
                        track_images.remove(join_key(id, &image_id).as_str())?;
                        image_tracks.remove(join_key(&image_id, id).as_str())?;
                    }
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    // --- associations ---

    pub fn attach_source(&self, track_id: &str, source_id: &str) -> Result<(), CatalogError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut source_tracks = write_txn.open_table(SOURCE_TRACKS_TABLE)?;
            let mut track_sources = write_txn.open_table(TRACK_SOURCES_TABLE)?;
            source_tracks.insert(join_key(source_id, track_id).as_str(), track_id.as_bytes())?;
            track_sources.insert(join_key(track_id, source_id).as_str(), source_id.as_bytes())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn source_track_ids(&self, source_id: &str) -> Result<Vec<String>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SOURCE_TRACKS_TABLE)?;
        collect_join_values(&table, source_id)
    }

    pub fn track_source_ids(&self, track_id: &str) -> Result<Vec<String>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRACK_SOURCES_TABLE)?;
        collect_join_values(&table, track_id)
    }

    pub fn track_has_sources(&self, track_id: &str) -> Result<bool, CatalogError> {
        Ok(!self.track_source_ids(track_id)?.is_empty())
    }

    pub fn attach_image(&self, track_id: &str, image_id: &str) -> Result<(), CatalogError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut track_images = write_txn.open_table(TRACK_IMAGES_TABLE)?;
            let mut image_tracks = write_txn.open_table(IMAGE_TRACKS_TABLE)?;
            track_images.insert(join_key(track_id, image_id).as_str(), image_id.as_bytes())?;
            image_tracks.insert(join_key(image_id, track_id).as_str(), track_id.as_bytes())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn track_image_ids(&self, track_id: &str) -> Result<Vec<String>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRACK_IMAGES_TABLE)?;
        collect_join_values(&table, track_id)
    }

    pub fn image_has_tracks(&self, image_id: &str) -> Result<bool, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(IMAGE_TRACKS_TABLE)?;
        Ok(!collect_join_values(&table, image_id)?.is_empty())
    }

    pub fn list_image_ids(&self) -> Result<Vec<String>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(IMAGES_TABLE)?;
        let mut ids = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            ids.push(entry.0.value().to_string());
        }
        Ok(ids)
    }

    pub fn delete_image(&self, id: &str) -> Result<(), CatalogError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut images = write_txn.open_table(IMAGES_TABLE)?;
            images.remove(id)?;
            let mut keys = write_txn.open_table(IMAGES_BY_KEY_TABLE)?;
            keys.remove(id)?;

            let mut image_tracks = write_txn.open_table(IMAGE_TRACKS_TABLE)?;
            let mut track_images = write_txn.open_table(TRACK_IMAGES_TABLE)?;
            let track_ids = collect_join_values(&image_tracks, id)?;
            for track_id in track_ids {
                image_tracks.remove(join_key(id, &track_id).as_str())?;
                track_images.remove(join_key(&track_id, id).as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    // --- albums ---

    pub fn list_album_ids(&self) -> Result<Vec<String>, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ALBUMS_TABLE)?;
        let mut ids = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            ids.push(entry.0.value().to_string());
        }
        Ok(ids)
    }

    pub fn album_count_for_artist(&self, album_artist_id: &str) -> Result<usize, CatalogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ALBUMS_BY_KEY_TABLE)?;
        Ok(collect_join_values(&table, album_artist_id)?.len())
    }

    /// Deletes the album; when it was the album artist's last album,
    /// the artist goes with it.
    pub fn delete_album(&self, id: &str) -> Result<bool, CatalogError> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut albums = write_txn.open_table(ALBUMS_TABLE)?;
            let album: Option<Album> = match albums.get(id)? {
                Some(value) => Some(decode_value(value.value())?),
                None => None,
            };
            match album {
                Some(album) => {
                    albums.remove(id)?;
                    let mut album_keys = write_txn.open_table(ALBUMS_BY_KEY_TABLE)?;
                    album_keys.remove(album.natural_key().as_str())?;

                    let artist_orphaned =
                        collect_join_values(&album_keys, &album.album_artist_id)?.is_empty();
                    if artist_orphaned {
                        let mut artists = write_txn.open_table(ALBUM_ARTISTS_TABLE)?;
                        let artist: Option<AlbumArtist> =
                            match artists.get(album.album_artist_id.as_str())? {
                                Some(value) => Some(decode_value(value.value())?),
                                None => None,
                            };
                        if let Some(artist) = artist {
                            artists.remove(artist.id.as_str())?;
                            let mut artist_keys =
                                write_txn.open_table(ALBUM_ARTISTS_BY_KEY_TABLE)?;
                            artist_keys.remove(artist.natural_key().as_str())?;
                        }
                    }
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}

fn encode_value<T: Serialize>(value: &T) -> Result<Vec<u8>, CatalogError> {
    Ok(bincode::serialize(value)?)
}

fn decode_value<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T, CatalogError> {
    Ok(bincode::deserialize(bytes)?)
}

fn string_value(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_string()
}

fn join_key(first: &str, second: &str) -> String {
    let mut out = String::with_capacity(first.len() + second.len() + 1);
    out.push_str(first);
    out.push(KEY_SEP);
    out.push_str(second);
    out
}

fn prefix_key(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + 1);
    out.push_str(prefix);
    out.push(KEY_SEP);
    out
}

/// Values under one join-table prefix, in key order.
fn collect_join_values(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    prefix: &str,
) -> Result<Vec<String>, CatalogError> {
    let start = prefix_key(prefix);
    let mut end = start.clone();
    end.push('\u{10ffff}');
    let mut values = Vec::new();
    for entry in table.range(start.as_str()..end.as_str())? {
        let entry = entry?;
        values.push(string_value(entry.1.value()));
    }
    Ok(values)
}
