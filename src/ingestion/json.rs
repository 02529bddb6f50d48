//! JSON reads.
//!
//! Supported inputs:
//! - A single JSON document (an array of objects): [`read_json`]
//! - Newline-delimited JSON (NDJSON): [`read_ndjson`] and [`scan_ndjson`]
//!
//! The eager readers take local paths, streams and bytes only; [`Source::Uri`] values are
//! rejected rather than fetched.

use std::num::NonZeroUsize;

use polars::prelude::*;
use serde::Deserialize;

use crate::error::ReadResult;
use crate::types::row_index;

use super::source::{resolve, resolve_local, EngineInput, ScanInput, SourceHandle};
use super::Source;

/// Options for a lazy NDJSON scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanNdjsonOptions {
    /// Rows used to infer the schema; `None` reads everything.
    pub infer_schema_length: Option<usize>,
    /// Rows parsed per batch.
    pub batch_size: usize,
    /// Stop after this many rows.
    pub n_rows: Option<usize>,
    pub low_memory: bool,
    pub rechunk: bool,
    pub row_index_name: Option<String>,
    pub row_index_offset: IdxSize,
}

impl Default for ScanNdjsonOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: Some(100),
            batch_size: 1024,
            n_rows: None,
            low_memory: false,
            rechunk: true,
            row_index_name: None,
            row_index_offset: 0,
        }
    }
}

/// Read a single JSON document (array of objects) into a [`DataFrame`].
pub fn read_json(source: impl Into<Source>) -> ReadResult<DataFrame> {
    let handle = resolve_local(source.into())?;
    materialize_json(handle, JsonFormat::Json)
}

/// Read newline-delimited JSON into a [`DataFrame`].
pub fn read_ndjson(source: impl Into<Source>) -> ReadResult<DataFrame> {
    let handle = resolve_local(source.into())?;
    materialize_json(handle, JsonFormat::JsonLines)
}

fn materialize_json(handle: SourceHandle, format: JsonFormat) -> ReadResult<DataFrame> {
    // `JsonFormat` has no `Debug` impl in polars 0.53.
    let format_name = match format {
        JsonFormat::Json => "Json",
        JsonFormat::JsonLines => "JsonLines",
    };
    let df = match handle.into_engine_input()? {
        EngineInput::Path(path) => {
            tracing::debug!(path = %path.display(), format = format_name, "reading json from path");
            let file = std::fs::File::open(&path)?;
            JsonReader::new(file).with_json_format(format).finish()?
        }
        EngineInput::Buffer(buf) => {
            tracing::debug!(bytes = buf.get_ref().len(), format = format_name, "reading json from buffer");
            JsonReader::new(buf).with_json_format(format).finish()?
        }
    };
    Ok(df)
}

/// Build a lazy NDJSON scan.
///
/// Like [`super::csv::scan_csv`], path sources are scanned in place and stream, byte and URI
/// sources are drained into a buffer owned by the plan. Both get the same engine options.
pub fn scan_ndjson(source: impl Into<Source>, options: &ScanNdjsonOptions) -> ReadResult<LazyFrame> {
    let reader = match resolve(source.into())?.into_scan_input()? {
        ScanInput::Path(path) => LazyJsonLineReader::new(path),
        ScanInput::Buffer(sources) => LazyJsonLineReader::new_with_sources(sources),
    };
    let lf = reader
        .with_infer_schema_length(options.infer_schema_length.and_then(NonZeroUsize::new))
        .with_batch_size(NonZeroUsize::new(options.batch_size))
        .with_n_rows(options.n_rows)
        .low_memory(options.low_memory)
        .with_rechunk(options.rechunk)
        .with_row_index(row_index(
            options.row_index_name.as_deref(),
            options.row_index_offset,
        ))
        .finish()?;
    Ok(lf)
}
