//! Parquet reads.

use polars::prelude::*;

use crate::error::ReadResult;

use super::source::{prepare_file_arg, EngineInput};
use super::Source;

/// Read a Parquet file into a [`DataFrame`].
///
/// Accepts every [`Source`] kind, including `http`, `https` and `file` URIs.
pub fn read_parquet(source: impl Into<Source>) -> ReadResult<DataFrame> {
    prepare_file_arg(source.into(), |handle| {
        let df = match handle.into_engine_input()? {
            EngineInput::Path(path) => {
                tracing::debug!(path = %path.display(), "reading parquet from path");
                let file = std::fs::File::open(&path)?;
                ParquetReader::new(file).finish()?
            }
            EngineInput::Buffer(buf) => {
                tracing::debug!(bytes = buf.get_ref().len(), "reading parquet from buffer");
                ParquetReader::new(buf).finish()?
            }
        };
        Ok(df)
    })
}
