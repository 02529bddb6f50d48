//! Post-read adjustments applied to materialized tables.

use polars::prelude::{DataFrame, PlSmallStr};

use crate::error::ReadResult;
use crate::types::{ColumnSpec, Projection};

/// Apply deferred column work to an eagerly read table.
///
/// - [`ColumnSpec::Rename`]: rename columns positionally. A shorter list renames only the
///   leading columns; a longer list is rejected by the engine.
/// - [`ColumnSpec::Projection`]: reorder the selected columns into the order the caller gave
///   (the engine returns them in file order).
/// - [`ColumnSpec::All`]: unchanged.
///
/// When `row_index` names the engine's leading row-index column, that column stays first and
/// keeps its name; renames and positions apply to the data columns after it.
pub fn finalize(
    df: DataFrame,
    spec: &ColumnSpec,
    row_index: Option<&str>,
) -> ReadResult<DataFrame> {
    match spec {
        ColumnSpec::All => Ok(df),
        ColumnSpec::Rename(new_names) => rename_positionally(df, new_names, row_index),
        ColumnSpec::Projection(projection) => restore_projection_order(df, projection, row_index),
    }
}

/// Number of leading columns that are not data (0 or 1).
fn leading_index_width(names: &[PlSmallStr], row_index: Option<&str>) -> usize {
    match (names.first(), row_index) {
        (Some(first), Some(idx)) if first.as_str() == idx => 1,
        _ => 0,
    }
}

fn rename_positionally(
    mut df: DataFrame,
    new_names: &[String],
    row_index: Option<&str>,
) -> ReadResult<DataFrame> {
    let current: Vec<PlSmallStr> = df.get_column_names_owned();
    let skip = leading_index_width(&current, row_index);
    let mut names: Vec<PlSmallStr> = current[..skip].to_vec();
    names.extend(new_names.iter().map(|n| PlSmallStr::from(n.as_str())));
    if names.len() < current.len() {
        names.extend(current.iter().skip(names.len()).cloned());
    }
    df.set_column_names(&names)?;
    Ok(df)
}

fn restore_projection_order(
    df: DataFrame,
    projection: &Projection,
    row_index: Option<&str>,
) -> ReadResult<DataFrame> {
    let read_names: Vec<PlSmallStr> = df.get_column_names_owned();
    let (index_col, data_names) = read_names.split_at(leading_index_width(&read_names, row_index));

    let mut order: Vec<PlSmallStr> = index_col.to_vec();
    match projection {
        Projection::ByName(names) => {
            order.extend(names.iter().map(|n| PlSmallStr::from(n.as_str())));
        }
        Projection::ByIndex(indices) => {
            // The engine yields projected columns in ascending position order.
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            sorted.dedup();
            order.extend(
                indices
                    .iter()
                    .filter_map(|i| sorted.binary_search(i).ok())
                    .filter_map(|pos| data_names.get(pos).cloned()),
            );
        }
    }
    if order == read_names {
        return Ok(df);
    }
    Ok(df.select(order)?)
}
