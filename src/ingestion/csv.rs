//! Delimited-text reads ([`read_csv`]) and scans ([`scan_csv`]).

use std::fmt;
use std::sync::Arc;

use polars::prelude::*;
use serde::Deserialize;

use crate::error::{ReadError, ReadResult};
use crate::types::{
    row_index, ColumnSpec, DtypeOverrides, NullValuesSpec, Projection, TextEncoding,
};

use super::columns::{self, AUTOGENERATED_PREFIX};
use super::finalize::finalize;
use super::source::{prepare_file_arg, resolve, EngineInput, ScanInput, SourceHandle};
use super::validate::CsvDialect;
use super::Source;

/// Options for an eager CSV read.
///
/// Use [`Default`] for common cases.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReadCsvOptions {
    /// Whether the first line holds column names.
    pub has_header: bool,
    /// Columns to keep, by name or by zero-based position.
    pub columns: Option<Projection>,
    /// Positional replacement names, applied after the read.
    pub new_columns: Option<Vec<String>>,
    /// Field separator. Must be a single byte.
    pub separator: String,
    /// Lines starting with this single byte are skipped.
    pub comment_prefix: Option<String>,
    /// Quote character. A single byte, or empty / `None` to disable quoting.
    pub quote_char: Option<String>,
    /// Lines to skip before the header.
    pub skip_rows: usize,
    /// Dtype overrides.
    #[serde(skip)]
    pub dtypes: Option<DtypeOverrides>,
    /// Tokens to read as null.
    pub null_values: Option<NullValuesSpec>,
    /// Keep going on parse errors, producing nulls.
    pub ignore_errors: bool,
    /// Try to parse date/datetime columns.
    pub try_parse_dates: bool,
    /// Parser threads; `None` lets the engine decide.
    pub n_threads: Option<usize>,
    /// Rows used to infer the schema; `None` reads the whole file.
    pub infer_schema_length: Option<usize>,
    /// Rows parsed per batch.
    pub batch_size: usize,
    /// Stop after this many rows.
    pub n_rows: Option<usize>,
    /// Text encoding.
    pub encoding: TextEncoding,
    /// Reduce memory pressure at the cost of speed.
    pub low_memory: bool,
    /// Make the result contiguous after reading.
    pub rechunk: bool,
    /// Lines to skip after the header.
    pub skip_rows_after_header: usize,
    /// Add a row index column with this name.
    pub row_index_name: Option<String>,
    /// First value of the row index column.
    pub row_index_offset: IdxSize,
    /// Kept for option-set compatibility. The engine samples dtypes through
    /// `infer_schema_length`, so this value does not change the result.
    pub sample_size: usize,
    /// End-of-line character. Must be a single byte.
    pub eol_char: String,
}

impl Default for ReadCsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            columns: None,
            new_columns: None,
            separator: ",".to_string(),
            comment_prefix: None,
            quote_char: Some("\"".to_string()),
            skip_rows: 0,
            dtypes: None,
            null_values: None,
            ignore_errors: false,
            try_parse_dates: false,
            n_threads: None,
            infer_schema_length: Some(100),
            batch_size: 8192,
            n_rows: None,
            encoding: TextEncoding::Utf8,
            low_memory: false,
            rechunk: true,
            skip_rows_after_header: 0,
            row_index_name: None,
            row_index_offset: 0,
            sample_size: 1024,
            eol_char: "\n".to_string(),
        }
    }
}

/// Maps inferred column names to new ones, for [`ScanCsvOptions::with_column_names`].
pub type ColumnNamesFn = Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;

/// Options for a lazy CSV scan.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ScanCsvOptions {
    /// Whether the first line holds column names.
    pub has_header: bool,
    /// Field separator. Must be a single byte.
    pub separator: String,
    /// Lines starting with this single byte are skipped.
    pub comment_prefix: Option<String>,
    /// Quote character. A single byte, or empty / `None` to disable quoting.
    pub quote_char: Option<String>,
    /// Lines to skip before the header.
    pub skip_rows: usize,
    /// Dtype overrides. Only [`DtypeOverrides::ByName`] is supported for scans.
    #[serde(skip)]
    pub dtypes: Option<DtypeOverrides>,
    /// Tokens to read as null.
    pub null_values: Option<NullValuesSpec>,
    /// Keep going on parse errors, producing nulls.
    pub ignore_errors: bool,
    /// Cache the scan result when the plan is reused.
    pub cache: bool,
    /// Rename columns given the inferred names. The header is read when the plan is built.
    #[serde(skip)]
    pub with_column_names: Option<ColumnNamesFn>,
    /// Rows used to infer the schema; `None` reads the whole input.
    pub infer_schema_length: Option<usize>,
    /// Stop after this many rows.
    pub n_rows: Option<usize>,
    pub encoding: TextEncoding,
    pub low_memory: bool,
    pub rechunk: bool,
    /// Data rows to skip after the header.
    pub skip_rows_after_header: usize,
    /// Prepend a row-index column with this name.
    pub row_index_name: Option<String>,
    /// First value of the row index.
    pub row_index_offset: IdxSize,
    pub try_parse_dates: bool,
    /// Line terminator. Must be a single byte.
    pub eol_char: String,
}

impl Default for ScanCsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            separator: ",".to_string(),
            comment_prefix: None,
            quote_char: Some("\"".to_string()),
            skip_rows: 0,
            dtypes: None,
            null_values: None,
            ignore_errors: false,
            cache: true,
            with_column_names: None,
            infer_schema_length: Some(100),
            n_rows: None,
            encoding: TextEncoding::Utf8,
            low_memory: false,
            rechunk: true,
            skip_rows_after_header: 0,
            row_index_name: None,
            row_index_offset: 0,
            try_parse_dates: false,
            eol_char: "\n".to_string(),
        }
    }
}

impl fmt::Debug for ScanCsvOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanCsvOptions")
            .field("has_header", &self.has_header)
            .field("separator", &self.separator)
            .field("comment_prefix", &self.comment_prefix)
            .field("quote_char", &self.quote_char)
            .field("skip_rows", &self.skip_rows)
            .field("dtypes", &self.dtypes)
            .field("null_values", &self.null_values)
            .field("ignore_errors", &self.ignore_errors)
            .field("cache", &self.cache)
            .field("with_column_names_set", &self.with_column_names.is_some())
            .field("infer_schema_length", &self.infer_schema_length)
            .field("n_rows", &self.n_rows)
            .field("encoding", &self.encoding)
            .field("low_memory", &self.low_memory)
            .field("rechunk", &self.rechunk)
            .field("skip_rows_after_header", &self.skip_rows_after_header)
            .field("row_index_name", &self.row_index_name)
            .field("row_index_offset", &self.row_index_offset)
            .field("try_parse_dates", &self.try_parse_dates)
            .field("eol_char", &self.eol_char)
            .finish()
    }
}

/// Column selection in the two shapes the engine accepts.
#[derive(Debug, Default, PartialEq)]
struct EngineColumns {
    names: Option<Vec<String>>,
    indices: Option<Vec<usize>>,
}

/// Split a normalized spec into engine column options.
///
/// Without a header, autogenerated names (`column_3`) are turned into positions so the engine
/// never has to match against names it has not generated yet.
fn engine_columns(spec: &ColumnSpec, has_header: bool) -> ReadResult<EngineColumns> {
    match spec {
        ColumnSpec::Projection(Projection::ByName(names)) if !has_header => {
            let indices = names
                .iter()
                .map(|n| {
                    n[AUTOGENERATED_PREFIX.len()..]
                        .parse::<usize>()
                        .ok()
                        .and_then(|pos| pos.checked_sub(1))
                        .ok_or_else(|| {
                            ReadError::config(format!(
                                "autogenerated column names start at {AUTOGENERATED_PREFIX}1, got {n:?}"
                            ))
                        })
                })
                .collect::<ReadResult<Vec<_>>>()?;
            Ok(EngineColumns {
                names: None,
                indices: Some(indices),
            })
        }
        ColumnSpec::Projection(Projection::ByName(names)) => Ok(EngineColumns {
            names: Some(names.clone()),
            indices: None,
        }),
        ColumnSpec::Projection(Projection::ByIndex(indices)) => Ok(EngineColumns {
            names: None,
            indices: Some(indices.clone()),
        }),
        ColumnSpec::All | ColumnSpec::Rename(_) => Ok(EngineColumns::default()),
    }
}

/// Read delimited text into a [`DataFrame`].
///
/// All options are validated before the source is resolved; see
/// [`super::validate::validate_single_byte`] and [`columns::normalize`].
///
/// ```no_run
/// use rust_frame_io::ingestion::csv::{read_csv, ReadCsvOptions};
///
/// # fn main() -> Result<(), rust_frame_io::ReadError> {
/// let opts = ReadCsvOptions {
///     separator: ";".to_string(),
///     ..Default::default()
/// };
/// let df = read_csv("people.csv", &opts)?;
/// println!("{df}");
/// # Ok(())
/// # }
/// ```
pub fn read_csv(source: impl Into<Source>, options: &ReadCsvOptions) -> ReadResult<DataFrame> {
    let dialect = CsvDialect::validate(
        &options.separator,
        options.comment_prefix.as_deref(),
        options.quote_char.as_deref(),
        &options.eol_char,
    )?;
    let spec = columns::normalize(
        options.columns.as_ref(),
        options.new_columns.as_deref(),
        options.has_header,
    )?;
    let cols = engine_columns(&spec, options.has_header)?;

    let df = prepare_file_arg(source.into(), |handle| {
        materialize_csv(handle, options, &dialect, cols)
    })?;
    finalize(df, &spec, options.row_index_name.as_deref())
}

fn engine_read_options(
    options: &ReadCsvOptions,
    dialect: &CsvDialect,
    cols: EngineColumns,
) -> CsvReadOptions {
    let (schema_overwrite, dtype_overwrite) = match &options.dtypes {
        Some(DtypeOverrides::ByName(pairs)) => {
            (Some(Arc::new(DtypeOverrides::named_schema(pairs))), None)
        }
        Some(DtypeOverrides::ByPosition(dtypes)) => (None, Some(Arc::new(dtypes.clone()))),
        None => (None, None),
    };
    let encoding = options.encoding.to_engine();
    let null_values = options.null_values.as_ref().map(NullValuesSpec::to_engine);
    let try_parse_dates = options.try_parse_dates;

    CsvReadOptions::default()
        .with_has_header(options.has_header)
        .with_columns(cols.names.map(|names| {
            names
                .iter()
                .map(|n| PlSmallStr::from(n.as_str()))
                .collect::<Arc<[PlSmallStr]>>()
        }))
        .with_projection(cols.indices.map(Arc::new))
        .with_skip_rows(options.skip_rows)
        .with_schema_overwrite(schema_overwrite)
        .with_dtype_overwrite(dtype_overwrite)
        .with_ignore_errors(options.ignore_errors)
        .with_n_threads(options.n_threads)
        .with_infer_schema_length(options.infer_schema_length)
        .with_chunk_size(options.batch_size)
        .with_n_rows(options.n_rows)
        .with_low_memory(options.low_memory)
        .with_rechunk(options.rechunk)
        .with_skip_rows_after_header(options.skip_rows_after_header)
        .with_row_index(row_index(
            options.row_index_name.as_deref(),
            options.row_index_offset,
        ))
        .map_parse_options(|p| {
            p.with_separator(dialect.separator)
                .with_quote_char(dialect.quote_char)
                .with_eol_char(dialect.eol_char)
                .with_comment_prefix(dialect.comment_prefix.as_deref())
                .with_encoding(encoding)
                .with_null_values(null_values.clone())
                .with_try_parse_dates(try_parse_dates)
        })
}

fn materialize_csv(
    handle: SourceHandle,
    options: &ReadCsvOptions,
    dialect: &CsvDialect,
    cols: EngineColumns,
) -> ReadResult<DataFrame> {
    let engine_opts = engine_read_options(options, dialect, cols);
    let df = match handle.into_engine_input()? {
        EngineInput::Path(path) => {
            tracing::debug!(path = %path.display(), "reading csv from path");
            engine_opts
                .try_into_reader_with_file_path(Some(path))?
                .finish()?
        }
        EngineInput::Buffer(buf) => {
            tracing::debug!(bytes = buf.get_ref().len(), "reading csv from buffer");
            engine_opts.into_reader_with_file_handle(buf).finish()?
        }
    };
    Ok(df)
}

/// Build a lazy CSV scan.
///
/// Path sources are normalized to absolute paths. Stream, byte and URI sources are drained into
/// memory here, because the stream does not outlive this call. Either way the same options reach
/// the engine and nothing is parsed until the returned [`LazyFrame`] is collected, except the
/// header when [`ScanCsvOptions::with_column_names`] is set.
pub fn scan_csv(source: impl Into<Source>, options: &ScanCsvOptions) -> ReadResult<LazyFrame> {
    let dialect = CsvDialect::validate(
        &options.separator,
        options.comment_prefix.as_deref(),
        options.quote_char.as_deref(),
        &options.eol_char,
    )?;
    let dtype_overwrite = match &options.dtypes {
        Some(DtypeOverrides::ByName(pairs)) => Some(Arc::new(DtypeOverrides::named_schema(pairs))),
        Some(DtypeOverrides::ByPosition(_)) => {
            return Err(ReadError::config(
                "positional dtypes are not supported by scan_csv; pass dtypes by column name",
            ));
        }
        None => None,
    };

    let reader = match resolve(source.into())?.into_scan_input()? {
        ScanInput::Path(path) => LazyCsvReader::new(path),
        ScanInput::Buffer(sources) => LazyCsvReader::new_with_sources(sources),
    };
    let reader = reader
        .with_has_header(options.has_header)
        .with_separator(dialect.separator)
        .with_comment_prefix(dialect.comment_prefix.as_deref().map(PlSmallStr::from))
        .with_quote_char(dialect.quote_char)
        .with_eol_char(dialect.eol_char)
        .with_skip_rows(options.skip_rows)
        .with_dtype_overwrite(dtype_overwrite)
        .with_null_values(options.null_values.as_ref().map(NullValuesSpec::to_engine))
        .with_ignore_errors(options.ignore_errors)
        .with_cache(options.cache)
        .with_infer_schema_length(options.infer_schema_length)
        .with_n_rows(options.n_rows)
        .with_encoding(options.encoding.to_engine())
        .with_low_memory(options.low_memory)
        .with_rechunk(options.rechunk)
        .with_skip_rows_after_header(options.skip_rows_after_header)
        .with_row_index(row_index(
            options.row_index_name.as_deref(),
            options.row_index_offset,
        ))
        .with_try_parse_dates(options.try_parse_dates);
    let reader = match &options.with_column_names {
        Some(f) => {
            let f = Arc::clone(f);
            reader.with_schema_modify(move |schema| rename_schema(schema, f.as_ref()))?
        }
        None => reader,
    };
    Ok(reader.finish()?)
}

fn rename_schema(
    schema: Schema,
    f: &(dyn Fn(Vec<String>) -> Vec<String> + Send + Sync),
) -> PolarsResult<Schema> {
    let old: Vec<String> = schema.iter_names().map(|n| n.to_string()).collect();
    let new = f(old);
    if new.len() != schema.len() {
        return Err(PolarsError::ShapeMismatch(
            format!(
                "with_column_names returned {} names for {} columns",
                new.len(),
                schema.len()
            )
            .into(),
        ));
    }
    Ok(Schema::from_iter(
        schema
            .iter()
            .zip(new)
            .map(|((_, dtype), name)| Field::new(PlSmallStr::from(name), dtype.clone())),
    ))
}
