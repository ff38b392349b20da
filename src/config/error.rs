//! Configuration errors.

use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}, line {1}")]
    MissingField(String, usize),

    #[error("no_replay pattern \"{0}\": {1}")]
    Regex(String, regex::Error),
}

impl Error {
    /// Attach the line number of the offending TOML to a parse error.
    pub fn config(source: &str, err: toml::de::Error) -> Self {
        let message = err.message().trim().to_owned();

        match err.span() {
            Some(span) => {
                let before = source.get(..span.start).unwrap_or(source);
                let line = before.matches('\n').count() + 1;
                Self::MissingField(message, line)
            }
            None => Self::MissingField(message, 0),
        }
    }
}
