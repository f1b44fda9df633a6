use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Failures of the durable medium, as opposed to bad input or startup problems.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Migration(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
