//! Orphan sweeps. Each pass is idempotent and runs at low priority so
//! scans are never starved.

use std::collections::HashSet;

use common::Disc;
use tracing::info;

use crate::store::CatalogStore;
use crate::{CatalogError, Priority};

pub const REAPER_PRIORITY: Priority = Priority::Low;

/// Deletes every track no source claims any more.
pub fn purge_orphaned_tracks(store: &CatalogStore) -> Result<usize, CatalogError> {
    let mut removed = 0;
    for track_id in store.list_track_ids()? {
        if store.track_has_sources(&track_id)? {
            continue;
        }
        if let Some(track) = store.get_track(&track_id)? {
            info!("Deleting {} from the catalog", track.location);
            store.delete_track(&track.id)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Deletes every image no track references any more.
pub fn purge_orphaned_images(store: &CatalogStore) -> Result<usize, CatalogError> {
    let mut removed = 0;
    for image_id in store.list_image_ids()? {
        if store.image_has_tracks(&image_id)? {
            continue;
        }
        store.delete_image(&image_id)?;
        removed += 1;
    }
    Ok(removed)
}

/// Deletes every album no surviving track reaches through its disc.
/// Album deletion cascades to the album artist when that was its last
/// album.
pub fn purge_orphaned_albums(store: &CatalogStore) -> Result<usize, CatalogError> {
    let mut live = HashSet::new();
    for track_id in store.list_track_ids()? {
        let Some(track) = store.get_track(&track_id)? else {
            continue;
        };
        let Some(disc_id) = track.disc_id else {
            continue;
        };
        if let Some(disc) = store.get_entity::<Disc>(&disc_id)? {
            live.insert(disc.album_id);
        }
    }

    let mut removed = 0;
    for album_id in store.list_album_ids()? {
        if live.contains(&album_id) {
            continue;
        }
        if store.delete_album(&album_id)? {
            info!("Deleting album {} from the catalog", album_id);
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper;
    use crate::resolver::FileStat;
    use common::{Image, SourceKind, Track};
    use metadata::TagAttributes;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> CatalogStore {
        CatalogStore::open(&dir.path().join("catalog.redb")).unwrap()
    }

    fn stat() -> FileStat {
        FileStat {
            dev: 1,
            ino: 7,
            size: 64,
            mtime: 100,
        }
    }

    fn attrs(artist: &str, album: &str) -> TagAttributes {
        TagAttributes {
            artist: Some(artist.to_string()),
            album: Some(album.to_string()),
            title: Some("T".to_string()),
            disc_number: Some(1),
            ..TagAttributes::default()
        }
    }

    #[test]
    fn tracks_without_sources_are_purged() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let source = store.create_source("/music", SourceKind::Directory).unwrap();

        let claimed = Track::new_at_location("/music/a.mp3");
        store.save_track(&claimed).unwrap();
        store.attach_source(&claimed.id, &source.id).unwrap();

        let orphan = Track::new_at_location("/music/b.mp3");
        store.save_track(&orphan).unwrap();

        assert_eq!(purge_orphaned_tracks(&store).unwrap(), 1);
        assert!(store.get_track(&orphan.id).unwrap().is_none());
        assert!(store.get_track(&claimed.id).unwrap().is_some());

        // nothing left to purge
        assert_eq!(purge_orphaned_tracks(&store).unwrap(), 0);
        for track_id in store.list_track_ids().unwrap() {
            assert!(store.track_has_sources(&track_id).unwrap());
        }
    }

    #[test]
    fn images_without_tracks_are_purged() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let track = Track::new_at_location("/music/a.mp3");
        store.save_track(&track).unwrap();
        let kept = store.find_or_create(Image::for_data(vec![1, 2])).unwrap();
        store.attach_image(&track.id, &kept.id).unwrap();
        store.find_or_create(Image::for_data(vec![3, 4])).unwrap();

        assert_eq!(purge_orphaned_images(&store).unwrap(), 1);
        let remaining = store.list_image_ids().unwrap();
        assert_eq!(remaining, vec![kept.id.clone()]);
        assert!(store.image_has_tracks(&kept.id).unwrap());
    }

    #[test]
    fn detaching_artwork_leaves_the_image_purgeable() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let track = Track::new_at_location("/music/a.mp3");
        store.save_track(&track).unwrap();
        let image = store.find_or_create(Image::for_data(vec![9])).unwrap();
        store.attach_image(&track.id, &image.id).unwrap();

        assert_eq!(purge_orphaned_images(&store).unwrap(), 0);
        store.delete_track(&track.id).unwrap();
        assert_eq!(purge_orphaned_images(&store).unwrap(), 1);
        assert!(store.list_image_ids().unwrap().is_empty());
    }

    #[test]
    fn albums_unreachable_from_tracks_are_purged_with_their_artist() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let mut kept = Track::new_at_location("/music/kept.mp3");
        mapper::apply_tags(&store, &mut kept, &attrs("X", "Live Album"), &stat()).unwrap();

        let mut doomed = Track::new_at_location("/music/doomed.mp3");
        let doomed_stat = FileStat {
            ino: 8,
            ..stat()
        };
        mapper::apply_tags(&store, &mut doomed, &attrs("Z", "Dead Album"), &doomed_stat)
            .unwrap();
        assert_eq!(store.list_album_ids().unwrap().len(), 2);

        let doomed_disc = store
            .get_entity::<Disc>(doomed.disc_id.as_deref().unwrap())
            .unwrap()
            .unwrap();
        let doomed_album = store
            .get_entity::<common::Album>(&doomed_disc.album_id)
            .unwrap()
            .unwrap();

        store.delete_track(&doomed.id).unwrap();
        assert_eq!(purge_orphaned_albums(&store).unwrap(), 1);

        let remaining = store.list_album_ids().unwrap();
        assert_eq!(remaining.len(), 1);
        let album = store
            .get_entity::<common::Album>(&remaining[0])
            .unwrap()
            .unwrap();
        assert_eq!(album.name, "Live Album");
        // the orphaned album's artist went with it
        assert!(store
            .get_entity::<common::AlbumArtist>(&doomed_album.album_artist_id)
            .unwrap()
            .is_none());
        assert_eq!(purge_orphaned_albums(&store).unwrap(), 0);
    }
}
