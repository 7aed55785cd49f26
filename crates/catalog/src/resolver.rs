use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

use common::{filesystem_id, Track};

use crate::store::CatalogStore;
use crate::CatalogError;

/// Stat fields the identity strategies and refresh check need.
#[derive(Clone, Copy, Debug)]
pub struct FileStat {
    pub dev: u64,
    pub ino: u64,
    pub size: u64,
    pub mtime: u64,
}

impl FileStat {
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            dev: meta.dev(),
            ino: meta.ino(),
            size: meta.len(),
            mtime: meta.mtime().max(0) as u64,
        }
    }

    pub fn filesystem_id(&self) -> String {
        filesystem_id(self.dev, self.ino)
    }
}

#[derive(Debug)]
pub enum Resolution {
    /// A catalog track matched. `via_filesystem_id` marks the indirect
    /// match (renamed or moved file); callers must force a refresh.
    Existing {
        track: Track,
        via_filesystem_id: bool,
    },
    New,
}

/// Finds the track a file corresponds to: stored location first, then
/// the device/inode composite, else New.
pub fn resolve(
    store: &CatalogStore,
    location: &str,
    stat: &FileStat,
) -> Result<Resolution, CatalogError> {
    if let Some(track) = store.track_by_location(location)? {
        return Ok(Resolution::Existing {
            track,
            via_filesystem_id: false,
        });
    }
    if let Some(track) = store.track_by_filesystem_id(&stat.filesystem_id())? {
        return Ok(Resolution::Existing {
            track,
            via_filesystem_id: true,
        });
    }
    Ok(Resolution::New)
}

#[cfg(test)]
mod tests {
    use super::{resolve, FileStat, Resolution};
    use crate::store::CatalogStore;
    use common::Track;
    use tempfile::TempDir;

    fn stat(dev: u64, ino: u64) -> FileStat {
        FileStat {
            dev,
            ino,
            size: 10,
            mtime: 100,
        }
    }

    #[test]
    fn resolves_by_location_first() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(&dir.path().join("catalog.redb")).unwrap();

        let mut track = Track::new_at_location("/music/a.mp3");
        track.filesystem_id = "1-42".to_string();
        store.save_track(&track).unwrap();

        match resolve(&store, "/music/a.mp3", &stat(9, 9)).unwrap() {
            Resolution::Existing {
                track: found,
                via_filesystem_id,
            } => {
                assert_eq!(found.id, track.id);
                assert!(!via_filesystem_id);
            }
            Resolution::New => panic!("expected location match"),
        }
    }

    #[test]
    fn falls_back_to_filesystem_id_for_moved_files() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(&dir.path().join("catalog.redb")).unwrap();

        let mut track = Track::new_at_location("/music/old.mp3");
        track.filesystem_id = "1-42".to_string();
        store.save_track(&track).unwrap();

        match resolve(&store, "/music/new.mp3", &stat(1, 42)).unwrap() {
            Resolution::Existing {
                track: found,
                via_filesystem_id,
            } => {
                assert_eq!(found.id, track.id);
                assert!(via_filesystem_id);
            }
            Resolution::New => panic!("expected filesystem-id match"),
        }
    }

    #[test]
    fn reports_new_when_nothing_matches() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(&dir.path().join("catalog.redb")).unwrap();
        assert!(matches!(
            resolve(&store, "/music/a.mp3", &stat(1, 1)).unwrap(),
            Resolution::New
        ));
    }
}
