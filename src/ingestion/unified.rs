//! Unified read entrypoint.
//!
//! [`read_source`] maps a `(format, mode)` pair onto the format-specific readers:
//!
//! | Format    | Eager            | Lazy            |
//! |-----------|------------------|-----------------|
//! | CSV       | [`read_csv`]     | [`scan_csv`]    |
//! | NDJSON    | [`read_ndjson`]  | [`scan_ndjson`] |
//! | JSON      | [`read_json`]    | not supported   |
//! | Parquet   | [`read_parquet`] | not supported   |
//!
//! - If [`ReadOptions::format`] is `None`, the format is inferred from the path extension.
//! - If a [`ReadObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::sync::Arc;

use polars::prelude::{DataFrame, LazyFrame};

use crate::error::{ReadError, ReadResult};
use crate::types::ExecutionMode;

use super::csv::{read_csv, scan_csv, ReadCsvOptions, ScanCsvOptions};
use super::json::{read_json, read_ndjson, scan_ndjson, ScanNdjsonOptions};
use super::observability::{ReadContext, ReadObserver, ReadSeverity, ReadStats};
use super::parquet::read_parquet;
use super::Source;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimited text.
    Csv,
    /// Newline-delimited JSON.
    Ndjson,
    /// A single JSON document.
    Json,
    /// Apache Parquet.
    Parquet,
}

impl FileFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "ndjson" | "jsonl" => Some(Self::Ndjson),
            "json" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }

    /// Whether a lazy scan exists for this format.
    pub fn supports_lazy(self) -> bool {
        matches!(self, Self::Csv | Self::Ndjson)
    }
}

/// Result of a unified read: a materialized table or a deferred plan.
#[derive(Clone)]
pub enum Frame {
    /// Output of an eager read.
    Table(DataFrame),
    /// Output of a lazy scan; nothing has been parsed yet.
    Plan(LazyFrame),
}

impl Frame {
    /// Materialize the frame, executing the plan if needed.
    pub fn collect(self) -> ReadResult<DataFrame> {
        match self {
            Self::Table(df) => Ok(df),
            Self::Plan(lf) => Ok(lf.collect()?),
        }
    }

    /// The table, if this came from an eager read.
    pub fn into_table(self) -> Option<DataFrame> {
        match self {
            Self::Table(df) => Some(df),
            Self::Plan(_) => None,
        }
    }

    /// The plan, if this came from a lazy scan.
    pub fn into_plan(self) -> Option<LazyFrame> {
        match self {
            Self::Plan(lf) => Some(lf),
            Self::Table(_) => None,
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(df) => f.debug_tuple("Table").field(&df.shape()).finish(),
            Self::Plan(_) => f.write_str("Plan(..)"),
        }
    }
}

/// Options controlling unified reads.
///
/// Use [`Default`] for common cases. Format-specific option records are used only when the
/// corresponding `(format, mode)` pair is selected.
#[derive(Clone)]
pub struct ReadOptions {
    /// If `None`, auto-detect format from the path extension.
    pub format: Option<FileFormat>,
    /// Eager or lazy.
    pub mode: ExecutionMode,
    /// Used for eager CSV reads.
    pub csv: ReadCsvOptions,
    /// Used for lazy CSV scans.
    pub csv_scan: ScanCsvOptions,
    /// Used for lazy NDJSON scans.
    pub ndjson_scan: ScanNdjsonOptions,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ReadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ReadSeverity,
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("format", &self.format)
            .field("mode", &self.mode)
            .field("csv", &self.csv)
            .field("csv_scan", &self.csv_scan)
            .field("ndjson_scan", &self.ndjson_scan)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            format: None,
            mode: ExecutionMode::Eager,
            csv: ReadCsvOptions::default(),
            csv_scan: ScanCsvOptions::default(),
            ndjson_scan: ScanNdjsonOptions::default(),
            observer: None,
            alert_at_or_above: ReadSeverity::Critical,
        }
    }
}

/// Read `source` in the format and mode selected by `options`.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` after an eager read, with row/column counts
/// - `on_plan_built` after a lazy scan
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use rust_frame_io::ingestion::{read_source, ReadOptions};
///
/// # fn main() -> Result<(), rust_frame_io::ReadError> {
/// // Uses `.csv` to select the CSV reader.
/// let df = read_source("people.csv", &ReadOptions::default())?.collect()?;
/// println!("rows={}", df.height());
/// # Ok(())
/// # }
/// ```
///
/// ## Lazy scan
///
/// ```no_run
/// use rust_frame_io::ingestion::{read_source, FileFormat, ReadOptions};
/// use rust_frame_io::types::ExecutionMode;
///
/// # fn main() -> Result<(), rust_frame_io::ReadError> {
/// let opts = ReadOptions {
///     format: Some(FileFormat::Ndjson),
///     mode: ExecutionMode::Lazy,
///     ..Default::default()
/// };
/// let plan = read_source("events.log", &opts)?.into_plan();
/// # let _ = plan;
/// # Ok(())
/// # }
/// ```
pub fn read_source(source: impl Into<Source>, options: &ReadOptions) -> ReadResult<Frame> {
    let source = source.into();
    let description = source.describe();

    let format = match options.format {
        Some(f) => f,
        None => infer_format(&source)?,
    };
    let ctx = ReadContext {
        source: description,
        format,
        mode: options.mode,
    };

    let result = dispatch(source, format, options);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(Frame::Table(df)) => obs.on_success(
                &ctx,
                ReadStats {
                    rows: df.height(),
                    columns: df.width(),
                },
            ),
            Ok(Frame::Plan(_)) => obs.on_plan_built(&ctx),
            Err(e) => {
                let sev = ReadSeverity::for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn dispatch(source: Source, format: FileFormat, options: &ReadOptions) -> ReadResult<Frame> {
    tracing::debug!(?format, mode = ?options.mode, "dispatching read");
    match (format, options.mode) {
        (FileFormat::Csv, ExecutionMode::Eager) => read_csv(source, &options.csv).map(Frame::Table),
        (FileFormat::Csv, ExecutionMode::Lazy) => {
            scan_csv(source, &options.csv_scan).map(Frame::Plan)
        }
        (FileFormat::Ndjson, ExecutionMode::Eager) => read_ndjson(source).map(Frame::Table),
        (FileFormat::Ndjson, ExecutionMode::Lazy) => {
            scan_ndjson(source, &options.ndjson_scan).map(Frame::Plan)
        }
        (FileFormat::Json, ExecutionMode::Eager) => read_json(source).map(Frame::Table),
        (FileFormat::Parquet, ExecutionMode::Eager) => read_parquet(source).map(Frame::Table),
        (FileFormat::Json | FileFormat::Parquet, ExecutionMode::Lazy) => Err(ReadError::config(
            format!("lazy scans are not supported for {format:?}"),
        )),
    }
}

fn infer_format(source: &Source) -> ReadResult<FileFormat> {
    let path = source.path().ok_or_else(|| {
        ReadError::config("cannot infer format for a stream or byte source; set ReadOptions::format")
    })?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            ReadError::config(format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ))
        })?;

    FileFormat::from_extension(ext).ok_or_else(|| {
        ReadError::config(format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ))
    })
}

/// An owned read request, for callers that queue work before running it.
#[derive(Debug)]
pub struct ReadRequest {
    pub source: Source,
    pub options: ReadOptions,
}

impl ReadRequest {
    /// Bundle a source with its options; nothing is opened until [`ReadRequest::run`].
    pub fn new(source: impl Into<Source>, options: ReadOptions) -> Self {
        Self {
            source: source.into(),
            options,
        }
    }

    /// Execute the request by calling [`read_source`].
    pub fn run(self) -> ReadResult<Frame> {
        read_source(self.source, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::{infer_format, FileFormat, Frame};
    use crate::ingestion::Source;

    #[test]
    fn frame_accessors_match_variant() {
        let df = df!("a" => [1i64, 2]).unwrap();

        let table = Frame::Table(df.clone());
        assert!(table.clone().into_plan().is_none());
        assert_eq!(table.into_table().unwrap().height(), 2);

        let plan = Frame::Plan(df.lazy());
        assert!(plan.clone().into_table().is_none());
        assert_eq!(plan.into_plan().unwrap().collect().unwrap().height(), 2);
    }

    #[test]
    fn extension_detection_is_case_insensitive() {
        assert_eq!(FileFormat::from_extension("CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_extension("jsonl"), Some(FileFormat::Ndjson));
        assert_eq!(FileFormat::from_extension("pq"), Some(FileFormat::Parquet));
        assert_eq!(FileFormat::from_extension("xlsx"), None);
    }

    #[test]
    fn streams_need_an_explicit_format() {
        let err = infer_format(&Source::Bytes(b"a\n1\n".to_vec())).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn uri_path_extension_is_used() {
        let url = url::Url::parse("https://example.com/data/table.parquet?sig=x").unwrap();
        assert_eq!(infer_format(&Source::from(url)).unwrap(), FileFormat::Parquet);
    }
}
