//! Structural checks on reader options.
//!
//! Everything here runs before a source is resolved, so a rejected option never causes I/O.

use crate::error::{ReadError, ReadResult};

/// Check that `value` is exactly one byte long (or empty, when `allow_empty` is set).
///
/// Length is measured in bytes, so a multi-byte UTF-8 character such as `"§"` is rejected even
/// though it is a single `char`.
pub fn validate_single_byte(field_name: &str, value: &str, allow_empty: bool) -> ReadResult<()> {
    let len = value.len();
    if allow_empty {
        if len > 1 {
            return Err(ReadError::config(format!(
                "{field_name} should be a single byte character or empty, but is {len} bytes long"
            )));
        }
    } else if len != 1 {
        return Err(ReadError::config(format!(
            "{field_name} should be a single byte character, but is {len} bytes long"
        )));
    }
    Ok(())
}

/// Validate a required single-byte option and return the byte.
pub(crate) fn single_byte(field_name: &str, value: &str) -> ReadResult<u8> {
    validate_single_byte(field_name, value, false)?;
    Ok(value.as_bytes()[0])
}

/// Validate an optional single-byte option. `None` and (with `allow_empty`) `""` both mean "unset".
pub(crate) fn optional_byte(
    field_name: &str,
    value: Option<&str>,
    allow_empty: bool,
) -> ReadResult<Option<u8>> {
    match value {
        None => Ok(None),
        Some(v) => {
            validate_single_byte(field_name, v, allow_empty)?;
            Ok(v.as_bytes().first().copied())
        }
    }
}

/// Validated delimiter characters for a CSV read or scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CsvDialect {
    pub separator: u8,
    pub quote_char: Option<u8>,
    pub comment_prefix: Option<String>,
    pub eol_char: u8,
}

impl CsvDialect {
    pub(crate) fn validate(
        separator: &str,
        comment_prefix: Option<&str>,
        quote_char: Option<&str>,
        eol_char: &str,
    ) -> ReadResult<Self> {
        let separator = single_byte("separator", separator)?;
        optional_byte("comment_prefix", comment_prefix, false)?;
        let quote_char = optional_byte("quote_char", quote_char, true)?;
        let eol_char = single_byte("eol_char", eol_char)?;
        Ok(Self {
            separator,
            quote_char,
            comment_prefix: comment_prefix.map(str::to_owned),
            eol_char,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_single_byte, CsvDialect};

    #[test]
    fn exactly_one_byte_is_required_when_not_empty_allowed() {
        assert!(validate_single_byte("separator", ",", false).is_ok());
        assert!(validate_single_byte("separator", "", false).is_err());
        assert!(validate_single_byte("separator", ";;", false).is_err());
    }

    #[test]
    fn empty_or_one_byte_is_allowed_for_quote() {
        assert!(validate_single_byte("quote_char", "", true).is_ok());
        assert!(validate_single_byte("quote_char", "'", true).is_ok());
        let err = validate_single_byte("quote_char", "''", true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: quote_char should be a single byte character or empty, but is 2 bytes long"
        );
    }

    #[test]
    fn multi_byte_character_is_measured_in_bytes() {
        let err = validate_single_byte("separator", "§", false).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("is 2 bytes long"));
    }

    #[test]
    fn dialect_maps_empty_quote_to_no_quoting() {
        let d = CsvDialect::validate(";", Some("#"), Some(""), "\n").unwrap();
        assert_eq!(d.separator, b';');
        assert_eq!(d.quote_char, None);
        assert_eq!(d.comment_prefix.as_deref(), Some("#"));
        assert_eq!(d.eol_char, b'\n');
    }

    #[test]
    fn dialect_rejects_empty_comment_and_long_eol() {
        assert!(CsvDialect::validate(",", Some(""), Some("\""), "\n").is_err());
        assert!(CsvDialect::validate(",", None, Some("\""), "\r\n").is_err());
    }
}
