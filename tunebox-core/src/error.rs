use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn track_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("no track with id {id}"))
    }

    pub fn album_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("no album with id {id}"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
