//! Read and scan entrypoints.
//!
//! Every entrypoint runs the same pipeline:
//!
//! 1. [`validate`]: single-byte option checks
//! 2. [`columns`]: projection / rename reconciliation
//! 3. [`source`]: locator resolution (opening URIs)
//! 4. the format module ([`csv`], [`json`], [`parquet`]) calls the engine
//! 5. [`finalize`]: deferred renames on eager results
//!
//! Most callers use the format functions directly or [`read_source`] (from [`unified`]), which
//! also picks the format from the path extension and reports to an optional [`ReadObserver`].

pub mod columns;
pub mod config;
pub mod csv;
pub mod finalize;
pub mod json;
pub mod observability;
pub mod parquet;
pub mod source;
pub mod unified;
pub mod validate;

pub use config::{options_from_json_path, options_from_json_str};
pub use csv::{read_csv, scan_csv, ColumnNamesFn, ReadCsvOptions, ScanCsvOptions};
pub use json::{read_json, read_ndjson, scan_ndjson, ScanNdjsonOptions};
pub use observability::{
    CompositeObserver, ReadContext, ReadObserver, ReadSeverity, ReadStats, StdErrObserver,
    TracingObserver,
};
pub use parquet::read_parquet;
pub use source::{prepare_file_arg, resolve, Source, SourceHandle};
pub use unified::{read_source, FileFormat, Frame, ReadOptions, ReadRequest};
pub use validate::validate_single_byte;
