use thiserror::Error;

pub type Result<T> = std::result::Result<T, PackError>;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("library error: {0}")]
    Library(#[from] mpdpack_library::LibraryError),

    #[error("references not found: {}", .0.join(", "))]
    ReferenceNotFound(Vec<String>),

    #[error("invalid input path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
