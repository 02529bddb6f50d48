//! Loading reader options from JSON configuration.
//!
//! Any option record that implements `Deserialize` ([`super::ReadCsvOptions`],
//! [`super::ScanCsvOptions`], [`super::ScanNdjsonOptions`]) can be loaded here. Missing keys take
//! their default values. Fields that cannot be written as data (dtype overrides and the
//! `with_column_names` function) must be set in code.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{ReadError, ReadResult};

/// Parse options from a JSON string.
///
/// ```rust
/// use rust_frame_io::ingestion::{options_from_json_str, ReadCsvOptions};
/// use rust_frame_io::types::Projection;
///
/// let opts: ReadCsvOptions =
///     options_from_json_str(r#"{"separator": ";", "columns": [0, 2]}"#).unwrap();
/// assert_eq!(opts.separator, ";");
/// assert_eq!(opts.columns, Some(Projection::ByIndex(vec![0, 2])));
/// assert!(opts.has_header);
/// ```
pub fn options_from_json_str<T: DeserializeOwned>(text: &str) -> ReadResult<T> {
    serde_json::from_str(text)
        .map_err(|e| ReadError::config(format!("invalid reader options: {e}")))
}

/// Parse options from a JSON file.
pub fn options_from_json_path<T: DeserializeOwned>(path: impl AsRef<Path>) -> ReadResult<T> {
    let text = fs::read_to_string(path)?;
    options_from_json_str(&text)
}
