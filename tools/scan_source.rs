use std::env;
use std::path::Path;

use catalog::{reaper, run_scan, CancelToken, CatalogStore};
use common::SourceKind;
use manifest::PlistManifest;
use metadata::LoftyTagReader;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let kind = match args.next().as_deref() {
        Some("directory") => SourceKind::Directory,
        Some("manifest") => SourceKind::Manifest,
        _ => return Err("usage: scan_source <directory|manifest> <location>".into()),
    };
    let location = args
        .next()
        .ok_or("usage: scan_source <directory|manifest> <location>")?;
    let catalog_path = env::var("CATALOG_PATH").unwrap_or_else(|_| "data/catalog.redb".to_string());

    let store = CatalogStore::open(Path::new(&catalog_path))?;
    let source = match store.source_by_location(&location, kind)? {
        Some(source) => source,
        None => store.create_source(&location, kind)?,
    };

    let summary = run_scan(
        &store,
        &LoftyTagReader,
        &PlistManifest,
        &source.id,
        &CancelToken::new(),
    )?;
    let purged_tracks = reaper::purge_orphaned_tracks(&store)?;
    let purged_albums = reaper::purge_orphaned_albums(&store)?;
    let purged_images = reaper::purge_orphaned_images(&store)?;

    println!(
        "Scanned {} ({} files): {} added, {} updated, {} removed",
        location, summary.files_seen, summary.added, summary.updated, summary.removed
    );
    println!(
        "Purged {} orphaned tracks, {} albums, {} images",
        purged_tracks, purged_albums, purged_images
    );

    Ok(())
}
