//! Error taxonomy
// (c) 2024 Ross Younger

use std::path::PathBuf;

/// Everything that can go wrong while reading, editing or writing an ssh config file
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No path was given and the default config file does not exist
    #[error("no config file was specified and the default ({}) does not exist", path.display())]
    NotFound {
        /// The default path we looked for
        path: PathBuf,
    },
    /// The default config file could not be located at all
    #[error("could not determine home directory")]
    HomeDir,
    /// A config file could not be opened, read or written
    #[error("failed to {action} {}", path.display())]
    File {
        /// What we were trying to do (`open`, `read`, `write`)
        action: &'static str,
        /// The file concerned
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
    /// A malformed line; aborts the whole parse
    #[error("{origin} line {line}: {message}")]
    Parse {
        /// Where the text came from (a file path, or `<string>`)
        origin: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },
    /// A `Host` pattern that could not be turned into a matcher
    #[error("invalid host pattern `{pattern}`")]
    Pattern {
        /// The offending pattern
        pattern: String,
        /// Underlying cause
        #[source]
        source: Box<regex::Error>,
    },
    /// A value that is not a non-negative integer was given for an integer keyword
    #[error("{keyword} requires a non-negative integer, found `{value}`")]
    Type {
        /// The keyword being set
        keyword: String,
        /// The rejected value
        value: String,
    },
    /// A value outside the closed set permitted for a keyword
    #[error("invalid value `{value}` for {keyword}; valid options are: {}", expected.join(", "))]
    InvalidValue {
        /// The keyword being set
        keyword: String,
        /// The rejected value
        value: String,
        /// Every value the keyword accepts
        expected: &'static [&'static str],
    },
    /// Block directives (`Host`, `Match`, `Include`) cannot be stored as options
    #[error("`{0}` is a block directive, not an option")]
    ReservedKeyword(String),
    /// A keyword that would not read back intact: empty, containing whitespace or `=`, or starting with `#`
    #[error("`{0}` is not a valid option keyword")]
    InvalidKeyword(String),
}

/// Result type used throughout this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn file(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            action,
            path: path.into(),
            source,
        }
    }
}
