//! Reconcile column selection and renaming into a single [`ColumnSpec`].

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ReadError, ReadResult};
use crate::types::{ColumnSpec, Projection};

/// Prefix the engine uses for column names when a file has no header row.
pub const AUTOGENERATED_PREFIX: &str = "column_";

static AUTOGENERATED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^column_[0-9]+$").expect("invalid regex in source"));

/// `true` when `name` looks like an engine-generated column name (`column_1`, `column_2`, ...).
pub fn is_autogenerated_name(name: &str) -> bool {
    AUTOGENERATED_RE.is_match(name)
}

/// Normalize the caller's column intent.
///
/// - Empty lists are treated as absent.
/// - Without a header row, names in a [`Projection::ByName`] must be autogenerated names.
/// - A projection together with a rename list is rejected with [`ReadError::NotImplemented`].
/// - A rename list alone becomes [`ColumnSpec::Rename`], applied after the read.
pub fn normalize(
    columns: Option<&Projection>,
    new_columns: Option<&[String]>,
    has_header: bool,
) -> ReadResult<ColumnSpec> {
    let projection = columns.filter(|p| !p.is_empty());
    let renames = new_columns.filter(|n| !n.is_empty());

    if let (Some(Projection::ByName(names)), false) = (projection, has_header) {
        if let Some(bad) = names.iter().find(|n| !is_autogenerated_name(n)) {
            return Err(ReadError::config(format!(
                "specified column name {bad:?} does not start with \"{AUTOGENERATED_PREFIX}\" followed by a position, \
                 but autogenerated header names were requested"
            )));
        }
    }

    match (projection, renames) {
        (Some(_), Some(_)) => Err(ReadError::NotImplemented {
            feature: "combining a column projection with new_columns".to_string(),
        }),
        (Some(p), None) => Ok(ColumnSpec::Projection(p.clone())),
        (None, Some(n)) => Ok(ColumnSpec::Rename(n.to_vec())),
        (None, None) => Ok(ColumnSpec::All),
    }
}

#[cfg(test)]
mod tests {
    use super::{is_autogenerated_name, normalize};
    use crate::error::ReadError;
    use crate::types::{ColumnSpec, Projection};

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn autogenerated_names_need_prefix_and_position() {
        assert!(is_autogenerated_name("column_1"));
        assert!(is_autogenerated_name("column_12"));
        assert!(!is_autogenerated_name("column_"));
        assert!(!is_autogenerated_name("column_a"));
        assert!(!is_autogenerated_name("a"));
    }

    #[test]
    fn nothing_given_reads_all_columns() {
        assert_eq!(normalize(None, None, true).unwrap(), ColumnSpec::All);
        let empty = Projection::ByName(vec![]);
        assert_eq!(normalize(Some(&empty), Some(&[]), false).unwrap(), ColumnSpec::All);
    }

    #[test]
    fn projection_alone_is_kept() {
        let p = Projection::indices([0, 2]);
        assert_eq!(
            normalize(Some(&p), None, true).unwrap(),
            ColumnSpec::Projection(p.clone())
        );
    }

    #[test]
    fn rename_alone_is_deferred() {
        let n = names(&["x", "y"]);
        assert_eq!(
            normalize(None, Some(&n), true).unwrap(),
            ColumnSpec::Rename(n.clone())
        );
    }

    #[test]
    fn projection_with_rename_is_not_implemented() {
        let n = names(&["x"]);
        for p in [Projection::names(["a"]), Projection::indices([0])] {
            let err = normalize(Some(&p), Some(&n), true).unwrap_err();
            assert!(matches!(err, ReadError::NotImplemented { .. }));
        }
    }

    #[test]
    fn headerless_projection_names_are_checked_first() {
        let p = Projection::names(["column_1", "b"]);
        let err = normalize(Some(&p), Some(&names(&["x"])), false).unwrap_err();
        assert!(matches!(err, ReadError::Config { .. }));
        assert!(err.to_string().contains("\"b\""));
    }

    #[test]
    fn headerless_positional_projection_is_not_name_checked() {
        let p = Projection::indices([1]);
        assert!(normalize(Some(&p), None, false).is_ok());
    }
}
