use thiserror::Error;

/// Crate-level error type.
///
/// Layout-level failures (empty candidate pools, deadline expiry) are not
/// errors: they bound the output and the run continues. Only I/O and
/// malformed puzzle-block text surface here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("puzzle block parse error at line {line}: {message}")]
    BlockParse { line: usize, message: String },
}

impl Error {
    pub(crate) fn block_parse(line: usize, message: impl Into<String>) -> Self {
        Error::BlockParse {
            line,
            message: message.into(),
        }
    }
}
