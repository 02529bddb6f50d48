//! Data model shared by the readers.
//!
//! These types describe *what* the caller asked for (which columns, which encoding, which null
//! tokens, eager or lazy). Conversion into engine-level option types happens in the format
//! modules under [`crate::ingestion`].

use polars::prelude::{CsvEncoding, DataType, Field, IdxSize, NullValues, PlSmallStr, RowIndex, Schema};
use serde::Deserialize;

/// Whether a read materializes a table now or builds a deferred plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Materialize a full [`polars::prelude::DataFrame`].
    #[default]
    Eager,
    /// Build a [`polars::prelude::LazyFrame`]; no parsing happens until it is collected.
    Lazy,
}

/// A column selection, either by column name or by zero-based position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Projection {
    /// Keep the named columns.
    ByName(Vec<String>),
    /// Keep the columns at these zero-based positions.
    ByIndex(Vec<usize>),
}

impl Projection {
    /// Build a name projection.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ByName(names.into_iter().map(Into::into).collect())
    }

    /// Build a positional projection.
    pub fn indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self::ByIndex(indices.into_iter().collect())
    }

    /// Number of selected columns.
    pub fn len(&self) -> usize {
        match self {
            Self::ByName(v) => v.len(),
            Self::ByIndex(v) => v.len(),
        }
    }

    /// `true` when nothing is selected (treated as "all columns").
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalized column intent for a single read.
///
/// The projection and rename forms are mutually exclusive; see
/// [`crate::ingestion::columns::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSpec {
    /// Read every column under its own name.
    #[default]
    All,
    /// Keep only the selected columns.
    Projection(Projection),
    /// Read every column, then rename positionally.
    Rename(Vec<String>),
}

/// Text encoding of delimited input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum TextEncoding {
    /// Strict UTF-8.
    #[default]
    Utf8,
    /// UTF-8 with invalid sequences replaced.
    Utf8Lossy,
}

impl TextEncoding {
    /// Resolve an encoding name.
    ///
    /// Only `"utf8-lossy"` selects [`TextEncoding::Utf8Lossy`]; every other name falls back to
    /// [`TextEncoding::Utf8`]. Names other than `"utf8"` are logged at warn level.
    pub fn from_name(name: &str) -> Self {
        match name {
            "utf8-lossy" => Self::Utf8Lossy,
            "utf8" => Self::Utf8,
            other => {
                tracing::warn!(encoding = other, "unrecognized encoding, falling back to utf8");
                Self::Utf8
            }
        }
    }

    pub(crate) fn to_engine(self) -> CsvEncoding {
        match self {
            Self::Utf8 => CsvEncoding::Utf8,
            Self::Utf8Lossy => CsvEncoding::LossyUtf8,
        }
    }
}

impl From<String> for TextEncoding {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// Tokens that should be read as null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NullValuesSpec {
    /// One token for all columns.
    Single(String),
    /// Several tokens for all columns.
    Many(Vec<String>),
    /// `(column, token)` pairs.
    Named(Vec<(String, String)>),
}

impl NullValuesSpec {
    pub(crate) fn to_engine(&self) -> NullValues {
        match self {
            Self::Single(token) => NullValues::AllColumnsSingle(PlSmallStr::from(token.as_str())),
            Self::Many(tokens) => NullValues::AllColumns(
                tokens.iter().map(|t| PlSmallStr::from(t.as_str())).collect(),
            ),
            Self::Named(pairs) => NullValues::Named(
                pairs
                    .iter()
                    .map(|(col, token)| {
                        (PlSmallStr::from(col.as_str()), PlSmallStr::from(token.as_str()))
                    })
                    .collect(),
            ),
        }
    }
}

/// Column dtype overrides applied instead of inference.
#[derive(Debug, Clone, PartialEq)]
pub enum DtypeOverrides {
    /// Override named columns.
    ByName(Vec<(String, DataType)>),
    /// Override columns positionally, starting at the first one.
    ByPosition(Vec<DataType>),
}

impl DtypeOverrides {
    pub(crate) fn named_schema(pairs: &[(String, DataType)]) -> Schema {
        Schema::from_iter(
            pairs
                .iter()
                .map(|(name, dtype)| Field::new(PlSmallStr::from(name.as_str()), dtype.clone())),
        )
    }
}

pub(crate) fn row_index(name: Option<&str>, offset: IdxSize) -> Option<RowIndex> {
    name.map(|name| RowIndex {
        name: PlSmallStr::from(name),
        offset,
    })
}
