use common::{now_secs, Album, AlbumArtist, Disc, Genre, Image, Track, TrackArtist};
use metadata::TagAttributes;

use crate::resolver::FileStat;
use crate::store::CatalogStore;
use crate::CatalogError;

/// A refresh re-reads every attribute. Triggered for new tracks,
/// tracks whose persisted state never completed, files modified since
/// the last scan, and indirect (filesystem-id) matches whose cached
/// attributes cannot be trusted.
pub fn needs_refresh(
    track: &Track,
    stat: &FileStat,
    via_filesystem_id: bool,
    newly_created: bool,
) -> bool {
    newly_created || via_filesystem_id || track.is_incomplete() || stat.mtime > track.mtime
}

/// Maps one tag read into the entity graph and saves the track.
pub fn apply_tags(
    store: &CatalogStore,
    track: &mut Track,
    attrs: &TagAttributes,
    stat: &FileStat,
) -> Result<(), CatalogError> {
    // album artist falls back to the track artist; its sort name falls
    // back to the track artist's sort name
    let album_artist_name = text_or_fallback(&attrs.album_artist, &attrs.artist);
    let album_artist_sort =
        nonempty(&attrs.album_artist_sort_order).or_else(|| nonempty(&attrs.artist_sort_order));
    let album_artist = store.find_or_create(AlbumArtist::new(
        album_artist_name.as_deref().unwrap_or(""),
        album_artist_sort,
    ))?;

    let album = store.find_or_create(Album::new(
        attrs.album.as_deref().unwrap_or(""),
        &album_artist.id,
        attrs.disc_number,
    ))?;

    let disc = store.find_or_create(Disc::new(
        attrs.disc_number,
        &album.id,
        attrs.disc_subtitle.clone(),
        attrs.track_number,
    ))?;

    let track_artist = store.find_or_create(TrackArtist::new(
        attrs.artist.as_deref().unwrap_or(""),
        nonempty(&attrs.artist_sort_order),
    ))?;

    // absent genre means no link, not an empty-string entity
    let genre = match nonempty(&attrs.genre) {
        Some(name) => Some(store.find_or_create(Genre::new(&name))?),
        None => None,
    };

    track.size = stat.size;
    track.mtime = stat.mtime;
    track.filesystem_id = stat.filesystem_id();
    track.name = attrs.title.clone();
    track.num = attrs.track_number;
    track.duration_ms = attrs.length_ms;
    track.comment = attrs.comment.clone();
    track.composer = attrs.composer.clone();
    track.date = attrs.date.clone();
    track.original_date = attrs.original_date.clone();
    track.group = attrs.group.clone();
    track.lyrics = attrs.lyrics.clone();
    track.mood = attrs.mood.clone();
    track.subtitle = attrs.subtitle.clone();
    track.disc_id = Some(disc.id);
    track.genre_id = genre.map(|genre| genre.id);
    track.track_artist_id = Some(track_artist.id);
    track.updated_at = now_secs();
    store.save_track(track)?;

    // attach each distinct artwork blob; never detach here
    for blob in &attrs.album_art {
        let image = store.find_or_create(Image::for_data(blob.clone()))?;
        store.attach_image(&track.id, &image.id)?;
    }

    Ok(())
}

fn nonempty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn text_or_fallback(primary: &Option<String>, fallback: &Option<String>) -> Option<String> {
    nonempty(primary).or_else(|| nonempty(fallback))
}

#[cfg(test)]
mod tests {
    use super::{apply_tags, needs_refresh};
    use crate::resolver::FileStat;
    use crate::store::CatalogStore;
    use common::{Album, AlbumArtist, Disc, Genre, Track, TrackArtist};
    use metadata::TagAttributes;
    use tempfile::TempDir;

    fn stat() -> FileStat {
        FileStat {
            dev: 1,
            ino: 10,
            size: 2048,
            mtime: 1_000,
        }
    }

    fn attrs(artist: &str, album: &str, title: &str) -> TagAttributes {
        TagAttributes {
            artist: Some(artist.to_string()),
            album: Some(album.to_string()),
            title: Some(title.to_string()),
            track_number: Some(3),
            disc_number: Some(1),
            length_ms: Some(180_000),
            genre: Some("Rock".to_string()),
            ..TagAttributes::default()
        }
    }

    #[test]
    fn refresh_rules() {
        let mut track = Track::new_at_location("/music/a.mp3");
        let stat = stat();

        assert!(needs_refresh(&track, &stat, false, true));
        // incomplete persisted state
        assert!(needs_refresh(&track, &stat, false, false));

        track.filesystem_id = "1-10".to_string();
        track.mtime = 1_000;
        assert!(!needs_refresh(&track, &stat, false, false));
        // indirect identity match forces a refresh
        assert!(needs_refresh(&track, &stat, true, false));
        // file changed since last scan
        track.mtime = 500;
        assert!(needs_refresh(&track, &stat, false, false));
    }

    #[test]
    fn builds_the_entity_graph_from_one_tag_read() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(&dir.path().join("catalog.redb")).unwrap();

        let mut track = Track::new_at_location("/music/a.mp3");
        apply_tags(&store, &mut track, &attrs("X", "Y", "Opening"), &stat()).unwrap();

        let saved = store.get_track(&track.id).unwrap().unwrap();
        assert_eq!(saved.name.as_deref(), Some("Opening"));
        assert_eq!(saved.num, Some(3));
        assert_eq!(saved.duration_ms, Some(180_000));
        assert_eq!(saved.size, 2048);
        assert_eq!(saved.filesystem_id, "1-10");

        let disc = store
            .get_entity::<Disc>(saved.disc_id.as_deref().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(disc.num, Some(1));
        assert_eq!(disc.total_tracks, Some(3));

        let album = store.get_entity::<Album>(&disc.album_id).unwrap().unwrap();
        assert_eq!(album.name, "Y");
        assert_eq!(album.total_discs, Some(1));

        let album_artist = store
            .get_entity::<AlbumArtist>(&album.album_artist_id)
            .unwrap()
            .unwrap();
        // album artist fell back to the track artist
        assert_eq!(album_artist.name, "X");

        let track_artist = store
            .get_entity::<TrackArtist>(saved.track_artist_id.as_deref().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(track_artist.name, "X");

        let genre = store
            .get_entity::<Genre>(saved.genre_id.as_deref().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(genre.name, "Rock");
    }

    #[test]
    fn album_artist_sort_name_falls_back_to_artist_sort_order() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(&dir.path().join("catalog.redb")).unwrap();

        let mut tag = attrs("The Band", "Y", "T");
        tag.artist_sort_order = Some("Band, The".to_string());
        tag.album_artist = None;
        tag.album_artist_sort_order = None;

        let mut track = Track::new_at_location("/music/a.mp3");
        apply_tags(&store, &mut track, &tag, &stat()).unwrap();

        let saved = store.get_track(&track.id).unwrap().unwrap();
        let disc = store
            .get_entity::<Disc>(saved.disc_id.as_deref().unwrap())
            .unwrap()
            .unwrap();
        let album = store.get_entity::<Album>(&disc.album_id).unwrap().unwrap();
        let album_artist = store
            .get_entity::<AlbumArtist>(&album.album_artist_id)
            .unwrap()
            .unwrap();
        assert_eq!(album_artist.sort_name.as_deref(), Some("Band, The"));
    }

    #[test]
    fn absent_genre_creates_no_genre_entity() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(&dir.path().join("catalog.redb")).unwrap();

        let mut tag = attrs("X", "Y", "T");
        tag.genre = Some("  ".to_string());

        let mut track = Track::new_at_location("/music/a.mp3");
        apply_tags(&store, &mut track, &tag, &stat()).unwrap();
        assert!(store.get_track(&track.id).unwrap().unwrap().genre_id.is_none());
    }

    #[test]
    fn duplicate_artwork_dedupes_by_content_hash() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(&dir.path().join("catalog.redb")).unwrap();

        let mut tag = attrs("X", "Y", "T");
        tag.album_art = vec![vec![1, 2, 3], vec![1, 2, 3], vec![4, 5]];

        let mut track = Track::new_at_location("/music/a.mp3");
        apply_tags(&store, &mut track, &tag, &stat()).unwrap();

        assert_eq!(store.track_image_ids(&track.id).unwrap().len(), 2);
        assert_eq!(store.list_image_ids().unwrap().len(), 2);

        // a second refresh attaches nothing new
        apply_tags(&store, &mut track, &tag, &stat()).unwrap();
        assert_eq!(store.track_image_ids(&track.id).unwrap().len(), 2);
    }
}
