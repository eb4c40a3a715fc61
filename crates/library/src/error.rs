use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LibraryError>;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("library unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("library download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("library archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive entry escapes extraction root: {0}")]
    UnsafeArchivePath(String),
}
