use std::sync::Arc;

use polars::prelude::*;

use rust_frame_io::ingestion::{read_csv, scan_csv, ReadCsvOptions, ScanCsvOptions, Source};
use rust_frame_io::types::DtypeOverrides;

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

#[test]
fn scan_then_collect_matches_eager_read() {
    let eager = read_csv("tests/fixtures/people.csv", &ReadCsvOptions::default()).unwrap();
    let lazy = scan_csv("tests/fixtures/people.csv", &ScanCsvOptions::default())
        .unwrap()
        .collect()
        .unwrap();
    assert!(eager.equals(&lazy));
}

#[test]
fn scan_supports_query_on_top() {
    let df = scan_csv("tests/fixtures/people.csv", &ScanCsvOptions::default())
        .unwrap()
        .filter(col("score").gt(lit(90.0)))
        .select([col("name")])
        .collect()
        .unwrap();
    assert_eq!(df.height(), 1);
    assert_eq!(df.column("name").unwrap().str().unwrap().get(0), Some("Ada"));
}

#[test]
fn scan_over_buffered_stream() {
    let source = Source::from_reader(std::io::Cursor::new(b"a,b\n1,2\n3,4\n".to_vec()));
    let opts = ScanCsvOptions {
        n_rows: Some(1),
        ..Default::default()
    };
    let df = scan_csv(source, &opts).unwrap().collect().unwrap();
    assert_eq!(df.shape(), (1, 2));
}

#[test]
fn buffered_scan_defers_parsing_until_collect() {
    let opts = ScanCsvOptions {
        dtypes: Some(DtypeOverrides::ByName(vec![("a".to_string(), DataType::Int64)])),
        ..Default::default()
    };
    let plan = scan_csv(Source::Bytes(b"a\nnot_a_number\n".to_vec()), &opts).unwrap();
    assert!(plan.collect().is_err());
}

#[test]
fn buffered_scan_honours_same_options_as_path_scan() {
    let opts = ScanCsvOptions {
        infer_schema_length: Some(1),
        row_index_name: Some("idx".to_string()),
        skip_rows_after_header: 1,
        ..Default::default()
    };
    let raw = std::fs::read("tests/fixtures/people.csv").unwrap();
    let from_path = scan_csv("tests/fixtures/people.csv", &opts)
        .unwrap()
        .collect()
        .unwrap();
    let from_bytes = scan_csv(Source::Bytes(raw), &opts).unwrap().collect().unwrap();
    assert!(from_path.equals(&from_bytes));
    assert_eq!(from_bytes.height(), 1);
}

#[test]
fn with_column_names_renames_inferred_columns() {
    let upper: Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync> =
        Arc::new(|names| names.into_iter().map(|n| n.to_uppercase()).collect());
    let opts = ScanCsvOptions {
        with_column_names: Some(upper),
        ..Default::default()
    };

    let df = scan_csv("tests/fixtures/people.csv", &opts)
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(column_names(&df), ["ID", "NAME", "SCORE", "ACTIVE"]);

    let df = scan_csv(Source::Bytes(b"a,b\n1,2\n".to_vec()), &opts)
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(column_names(&df), ["A", "B"]);
}

#[test]
fn scan_validates_single_byte_options() {
    let opts = ScanCsvOptions {
        separator: "||".to_string(),
        ..Default::default()
    };
    let err = scan_csv("tests/fixtures/does_not_exist.csv", &opts).err().unwrap();
    assert!(err.is_config());

    let opts = ScanCsvOptions {
        eol_char: String::new(),
        ..Default::default()
    };
    assert!(scan_csv("tests/fixtures/people.csv", &opts).err().unwrap().is_config());
}

#[test]
fn scan_rejects_positional_dtypes() {
    let opts = ScanCsvOptions {
        dtypes: Some(DtypeOverrides::ByPosition(vec![DataType::String])),
        ..Default::default()
    };
    assert!(scan_csv("tests/fixtures/people.csv", &opts).err().unwrap().is_config());
}

#[test]
fn scan_applies_named_dtypes_and_row_index() {
    let opts = ScanCsvOptions {
        dtypes: Some(DtypeOverrides::ByName(vec![("id".to_string(), DataType::String)])),
        row_index_name: Some("idx".to_string()),
        ..Default::default()
    };
    let df = scan_csv("tests/fixtures/people.csv", &opts)
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(column_names(&df)[0], "idx");
    assert_eq!(df.column("id").unwrap().dtype(), &DataType::String);
}

#[test]
fn scan_rejects_bare_url_strings() {
    let err = scan_csv("https://example.com/a.csv", &ScanCsvOptions::default()).err().unwrap();
    assert!(err.is_config());
}
