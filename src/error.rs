use polars::prelude::PolarsError;
use thiserror::Error;

/// Convenience result type for read/scan operations.
pub type ReadResult<T> = Result<T, ReadError>;

/// Error type returned by every read and scan entry point.
///
/// Configuration errors ([`ReadError::Config`], [`ReadError::NotImplemented`]) are always raised
/// before any source is opened. The remaining variants wrap whatever the filesystem, the HTTP
/// client or the engine reported, without reinterpretation.
#[derive(Debug, Error)]
pub enum ReadError {
    /// An option or locator has an invalid shape (wrong byte length, bare URL string,
    /// unsupported scheme, unsupported format/mode pair, ...).
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A combination of options that is recognized but not supported yet.
    #[error("not implemented: {feature}")]
    NotImplemented { feature: String },

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Opening a remote (`http`/`https`) source failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error reported by the Polars engine while parsing, materializing or planning.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl ReadError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by caller input rather than I/O or the engine.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::NotImplemented { .. })
    }
}
