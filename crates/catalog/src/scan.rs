use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::{now_secs, Source, SourceKind, Track};
use manifest::{file_uri_to_path, ManifestParser, ManifestRecord};
use metadata::TagReader;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::mapper;
use crate::resolver::{self, FileStat, Resolution};
use crate::store::CatalogStore;
use crate::{CatalogError, Priority};

pub const SCAN_PRIORITY: Priority = Priority::High;

const SUPPORTED_EXTENSIONS: [&str; 2] = ["mp3", "m4a"];

/// Cooperative cancellation flag, observed at item boundaries only.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub files_seen: usize,
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Lifecycle wrapper around one scan: marks the source scanning,
/// dispatches on its kind, releases the flag on every exit path, and
/// records the scan time on uncancelled success.
pub fn run_scan(
    store: &CatalogStore,
    tags: &dyn TagReader,
    manifests: &dyn ManifestParser,
    source_id: &str,
    cancel: &CancelToken,
) -> Result<ScanSummary, CatalogError> {
    let source = store
        .source(source_id)?
        .ok_or_else(|| CatalogError::SourceMissing(source_id.to_string()))?;

    store.set_scanning(source_id, true)?;
    let result = match source.kind {
        SourceKind::Directory => scan_directory(store, tags, &source, cancel),
        SourceKind::Manifest => scan_manifest(store, tags, manifests, &source, cancel),
    };
    if let Err(err) = store.set_scanning(source_id, false) {
        warn!("Failed to clear scanning flag for {}: {}", source_id, err);
    }
    if result.is_ok() && !cancel.is_cancelled() {
        store.set_last_scanned(source_id, now_secs())?;
    }
    result
}

fn scan_directory(
    store: &CatalogStore,
    tags: &dyn TagReader,
    source: &Source,
    cancel: &CancelToken,
) -> Result<ScanSummary, CatalogError> {
    let root = Path::new(&source.location);
    let mut summary = ScanSummary::default();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if cancel.is_cancelled() {
            return Ok(summary);
        }
        if !entry.file_type().is_file() || !supported_audio_file(entry.path()) {
            continue;
        }
        summary.files_seen += 1;
        match handle_file(store, tags, source, entry.path())? {
            Some(Outcome::Added) => summary.added += 1,
            Some(Outcome::Updated) => summary.updated += 1,
            _ => {}
        }
    }

    // stale entries are batched and applied after the walk, never
    // interleaved with it
    let mut stale = Vec::new();
    for track_id in store.source_track_ids(&source.id)? {
        if let Some(track) = store.get_track(&track_id)? {
            if !Path::new(&track.location).exists() {
                stale.push(track);
            }
        }
    }
    for track in stale {
        if cancel.is_cancelled() {
            return Ok(summary);
        }
        info!("Deleting {} from the catalog (file missing)", track.location);
        store.delete_track(&track.id)?;
        summary.removed += 1;
    }

    Ok(summary)
}

fn scan_manifest(
    store: &CatalogStore,
    tags: &dyn TagReader,
    manifests: &dyn ManifestParser,
    source: &Source,
    cancel: &CancelToken,
) -> Result<ScanSummary, CatalogError> {
    let mut summary = ScanSummary::default();
    let records = manifests.parse(Path::new(&source.location))?;

    let mut paths = Vec::new();
    let mut listed: HashSet<PathBuf> = HashSet::new();
    for record in records {
        let record = normalize_record(record);
        let Some(uri) = record.get("location") else {
            continue;
        };
        let Some(path) = file_uri_to_path(uri) else {
            continue;
        };
        if listed.contains(&path) {
            continue;
        }
        // tracks are stored under canonical locations; remember both
        // spellings so the removal pass below recognizes them
        if let Some(canonical) = canonical_spelling(&path) {
            listed.insert(canonical);
        }
        listed.insert(path.clone());
        paths.push(path);
    }

    // the manifest is authoritative: tracks it no longer lists are
    // deleted even when the file still exists on disk
    for track_id in store.source_track_ids(&source.id)? {
        let Some(track) = store.get_track(&track_id)? else {
            continue;
        };
        if listed.contains(Path::new(&track.location)) {
            continue;
        }
        info!("Deleting {} from the catalog", track.location);
        store.delete_track(&track.id)?;
        summary.removed += 1;
        if cancel.is_cancelled() {
            return Ok(summary);
        }
    }

    for path in paths {
        if path.exists() {
            summary.files_seen += 1;
            match handle_file(store, tags, source, &path)? {
                Some(Outcome::Added) => {
                    info!("Added {}", path.display());
                    summary.added += 1;
                }
                Some(Outcome::Updated) => {
                    info!("Updated {}", path.display());
                    summary.updated += 1;
                }
                _ => {}
            }
        } else {
            info!("{} doesn't exist. Skipping.", path.display());
        }
        if cancel.is_cancelled() {
            return Ok(summary);
        }
    }

    Ok(summary)
}

enum Outcome {
    Added,
    Updated,
    Unchanged,
}

/// Resolve one file, refresh its attributes when warranted, and make
/// sure the source owns the resulting track. Per-file stat and tag
/// failures are logged and skipped; they never abort the batch.
fn handle_file(
    store: &CatalogStore,
    tags: &dyn TagReader,
    source: &Source,
    path: &Path,
) -> Result<Option<Outcome>, CatalogError> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            warn!("Failed to stat {:?}: {}", path, err);
            return Ok(None);
        }
    };
    let stat = FileStat::from_metadata(&meta);
    let location = match fs::canonicalize(path) {
        Ok(absolute) => absolute.to_string_lossy().to_string(),
        Err(err) => {
            warn!("Failed to resolve {:?}: {}", path, err);
            return Ok(None);
        }
    };

    let (mut track, via_filesystem_id, created) = match resolver::resolve(store, &location, &stat)?
    {
        Resolution::Existing {
            track,
            via_filesystem_id,
        } => (track, via_filesystem_id, false),
        Resolution::New => (Track::new_at_location(&location), false, true),
    };

    let mut outcome = Outcome::Unchanged;
    if mapper::needs_refresh(&track, &stat, via_filesystem_id, created) {
        match tags.read_tags(path) {
            Ok(attrs) => {
                // an indirect match means the file moved; adopt the
                // new path
                track.location = location;
                mapper::apply_tags(store, &mut track, &attrs, &stat)?;
                outcome = if created {
                    Outcome::Added
                } else {
                    Outcome::Updated
                };
            }
            Err(err) => {
                warn!("Failed to read tags for {:?}: {}", path, err);
                if created {
                    // a track only enters the catalog on a successful
                    // tag read
                    return Ok(None);
                }
            }
        }
    }

    store.attach_source(&track.id, &source.id)?;
    Ok(Some(outcome))
}

/// Canonical spelling of a manifest path. Works for missing files too:
/// the parent directory is canonicalized and the file name re-joined,
/// so a still-listed entry keeps matching its stored location even
/// after the file disappears behind a symlinked directory.
fn canonical_spelling(path: &Path) -> Option<PathBuf> {
    if let Ok(canonical) = fs::canonicalize(path) {
        return Some(canonical);
    }
    let parent = fs::canonicalize(path.parent()?).ok()?;
    Some(parent.join(path.file_name()?))
}

fn supported_audio_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Manifest keys arrive in display form ("Track ID"); fold them into
/// the canonical attribute vocabulary ("track_id").
fn normalize_record(record: ManifestRecord) -> ManifestRecord {
    record
        .into_iter()
        .map(|(key, value)| (key.trim().to_lowercase().replace(' ', "_"), value))
        .collect()
}
