//! `rust-frame-io` is the front-end for reading tabular files into Polars: it resolves where the
//! data comes from, validates reader options, and routes each request to the eager reader
//! ([`polars::prelude::DataFrame`]) or the lazy scan ([`polars::prelude::LazyFrame`]) for the
//! format.
//!
//! ## What you can read
//!
//! | Format    | Eager                            | Lazy                           |
//! |-----------|----------------------------------|--------------------------------|
//! | CSV       | [`ingestion::read_csv`]          | [`ingestion::scan_csv`]        |
//! | NDJSON    | [`ingestion::read_ndjson`]       | [`ingestion::scan_ndjson`]     |
//! | JSON      | [`ingestion::read_json`]         | -                              |
//! | Parquet   | [`ingestion::read_parquet`]      | -                              |
//!
//! **Sources** ([`ingestion::Source`]): local paths, open streams, in-memory bytes, and URIs
//! (`http`, `https`, `file`). A plain string that looks like `http://...` is rejected: remote
//! reads must be requested with a [`url::Url`] so that a path-looking call never goes to the
//! network by accident.
//!
//! ## Quick examples
//!
//! ```no_run
//! use rust_frame_io::ingestion::{read_csv, ReadCsvOptions};
//! use rust_frame_io::types::Projection;
//!
//! # fn main() -> Result<(), rust_frame_io::ReadError> {
//! let opts = ReadCsvOptions {
//!     columns: Some(Projection::names(["id", "name"])),
//!     ..Default::default()
//! };
//! let df = read_csv("people.csv", &opts)?;
//! println!("{df}");
//! # Ok(())
//! # }
//! ```
//!
//! Remote files are opened only when given as a URI:
//!
//! ```no_run
//! use rust_frame_io::ingestion::read_parquet;
//! use url::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let url = Url::parse("https://example.com/data/table.parquet")?;
//! let df = read_parquet(url)?;
//! println!("rows={}", df.height());
//! # Ok(())
//! # }
//! ```
//!
//! Option mistakes are caught before anything is opened:
//!
//! ```rust
//! use rust_frame_io::ingestion::{read_csv, ReadCsvOptions};
//!
//! let opts = ReadCsvOptions {
//!     separator: ";;".to_string(),
//!     ..Default::default()
//! };
//! let err = read_csv("does_not_exist.csv", &opts).unwrap_err();
//! assert!(err.is_config());
//! assert!(err.to_string().contains("2 bytes long"));
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: entrypoints, source resolution, option validation, observers
//! - [`types`]: column specs, encodings, null tokens, execution mode
//! - [`error`]: the error type shared by every entrypoint

pub mod error;
pub mod ingestion;
pub mod types;

pub use error::{ReadError, ReadResult};
