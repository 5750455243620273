use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("ledger error: {0}")]
    Ledger(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("seeder error: {0}")]
    Seeder(String),

    #[error("invalid command tokens: {0}")]
    Tokens(String),

    /// A failure that stops the whole batch, tagged with the migration or
    /// seeder being processed when it happened.
    #[error("{name} aborted the run: {source}")]
    Aborted {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn aborted(name: impl Into<String>, source: Error) -> Self {
        Error::Aborted {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error is a caller-side validation failure rather than a
    /// backend or persistence failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::NotImplemented(_))
    }
}
