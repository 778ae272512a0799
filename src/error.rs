use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("word list is empty, nothing to sample a passage from")]
    EmptyCorpus,

    #[error("word list {origin} is unavailable: {reason}")]
    CorpusUnavailable { origin: String, reason: String },

    #[error("invalid config at {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn unavailable(origin: impl Into<String>, reason: impl ToString) -> Self {
        Error::CorpusUnavailable {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}
