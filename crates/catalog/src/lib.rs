pub mod mapper;
pub mod reaper;
pub mod resolver;
pub mod scan;
pub mod store;

pub use scan::{run_scan, CancelToken, ScanSummary};
pub use store::CatalogStore;

use redb::{CommitError, DatabaseError, StorageError, TableError, TransactionError};

/// Scheduling tier a job asks for. Scans run high, reaper sweeps low.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    High,
    Low,
}

#[derive(Debug)]
pub enum CatalogError {
    /// The source row vanished between dispatch and invocation. Fatal
    /// to the job; surfaced to the scheduler.
    SourceMissing(String),
    Io(std::io::Error),
    Metadata(metadata::MetadataError),
    Manifest(manifest::ManifestError),
    Db(redb::Error),
    Encode(Box<bincode::ErrorKind>),
    KeyParse(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::SourceMissing(id) => {
                write!(f, "source {} is no longer in the catalog", id)
            }
            CatalogError::Io(err) => write!(f, "io error: {}", err),
            CatalogError::Metadata(err) => write!(f, "metadata error: {}", err),
            CatalogError::Manifest(err) => write!(f, "manifest error: {}", err),
            CatalogError::Db(err) => write!(f, "db error: {}", err),
            CatalogError::Encode(err) => write!(f, "encode error: {}", err),
            CatalogError::KeyParse(value) => write!(f, "key parse error: {}", value),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<metadata::MetadataError> for CatalogError {
    fn from(err: metadata::MetadataError) -> Self {
        CatalogError::Metadata(err)
    }
}

impl From<manifest::ManifestError> for CatalogError {
    fn from(err: manifest::ManifestError) -> Self {
        CatalogError::Manifest(err)
    }
}

impl From<redb::Error> for CatalogError {
    fn from(err: redb::Error) -> Self {
        CatalogError::Db(err)
    }
}

impl From<DatabaseError> for CatalogError {
    fn from(err: DatabaseError) -> Self {
        CatalogError::Db(err.into())
    }
}

impl From<TableError> for CatalogError {
    fn from(err: TableError) -> Self {
        CatalogError::Db(err.into())
    }
}

impl From<TransactionError> for CatalogError {
    fn from(err: TransactionError) -> Self {
        CatalogError::Db(err.into())
    }
}

impl From<StorageError> for CatalogError {
    fn from(err: StorageError) -> Self {
        CatalogError::Db(err.into())
    }
}

impl From<CommitError> for CatalogError {
    fn from(err: CommitError) -> Self {
        CatalogError::Db(err.into())
    }
}

impl From<Box<bincode::ErrorKind>> for CatalogError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        CatalogError::Encode(err)
    }
}
