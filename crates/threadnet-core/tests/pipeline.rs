//! End-to-end table handling: load from disk, transform, save, reload.

use std::fs;

use threadnet_core::columns;
use threadnet_core::io;
use threadnet_core::loader::{TableLoader, xlsx_to_csv};
use threadnet_core::table::{Column, Table, Value};
use threadnet_core::text::{CleaningMethod, clean_column};
use threadnet_core::TableError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const MESSAGES_CSV: &str = "\
msg_author_id,msg_topic_id,msg_date,msg_ip_address,msg_post
1,10,1704067200,10.0.0.1,<p>Hello <b>world</b></p>
2,10,1704153600,10.0.0.2,see http://x.com/page now
1,11,1706745600,10.0.0.1,
3,11,,10.0.0.3,\"quoted, with comma\"
";

fn write_messages(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("messages.csv");
    fs::write(&path, MESSAGES_CSV).expect("write fixture csv");
    path
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[test]
fn csv_load_infers_types() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut loader = TableLoader::new(write_messages(dir.path()));
    let table = loader.load().expect("load");

    assert_eq!(table.shape(), (4, 5));
    assert_eq!(table.get(0, columns::AUTHOR), Some(&Value::Int(1)));
    assert_eq!(table.get(0, columns::IP_ADDRESS), Some(&Value::from("10.0.0.1")));
    assert_eq!(table.get(2, columns::POST), Some(&Value::Null));
    assert_eq!(table.get(3, columns::DATE), Some(&Value::Null));
    assert_eq!(
        table.get(3, columns::POST),
        Some(&Value::from("quoted, with comma"))
    );
}

#[test]
fn summary_of_loaded_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut loader = TableLoader::new(write_messages(dir.path()));
    loader.load().expect("load");

    let summary = loader.summary().expect("summary");
    assert_eq!(summary.total_messages, 4);
    assert_eq!(summary.unique_authors, 3);
    assert_eq!(summary.unique_topics, 2);
    assert_eq!(summary.unique_ips, 3);
    assert_eq!(
        summary.date_range,
        Some((Value::Int(1_704_067_200), Value::Int(1_706_745_600)))
    );
}

#[test]
fn convert_clean_filter_save_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut loader = TableLoader::new(write_messages(dir.path()));
    loader.load().expect("load");
    loader.convert_unix_timestamp(columns::DATE).expect("convert");
    clean_column(
        loader.table_mut().expect("loaded"),
        columns::POST,
        CleaningMethod::Advanced,
    )
    .expect("clean");
    loader
        .filter_columns(&["msg_date_UTC", columns::POST, "missing"])
        .expect("filter");

    let out = dir.path().join("processed.csv");
    loader.save(&out).expect("save");

    let reloaded = io::read_table(&out).expect("reload");
    assert_eq!(
        reloaded.column_names(),
        vec!["msg_date_UTC".to_string(), columns::POST.to_string()]
    );
    assert_eq!(
        reloaded.get(0, "msg_date_UTC"),
        Some(&Value::from("2024-01-01 00:00:00"))
    );
    assert_eq!(reloaded.get(0, columns::POST), Some(&Value::from("Hello world")));
    assert_eq!(reloaded.get(1, columns::POST), Some(&Value::from("see now")));
    // Cleaned nulls were written as empty strings and read back as nulls.
    assert_eq!(reloaded.get(2, columns::POST), Some(&Value::Null));
}

#[test]
fn save_rejects_unknown_extension() {
    let loader = TableLoader::from_table(
        Table::from_columns(vec![Column::new("a", [1_i64])]).expect("table"),
    );
    let dir = tempfile::tempdir().expect("tempdir");
    let err = loader.save(dir.path().join("out.json")).expect_err("unsupported");
    assert!(matches!(err, TableError::UnsupportedFormat(_)));
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut loader = TableLoader::new(dir.path().join("absent.csv"));
    assert!(loader.load().is_err());
    assert!(matches!(loader.table(), Err(TableError::NotLoaded)));
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

#[test]
fn xlsx_round_trip_and_conversion() {
    let dir = tempfile::tempdir().expect("tempdir");
    let table = Table::from_columns(vec![
        Column::new(columns::AUTHOR, [1_i64, 2]),
        Column::new("score", [Value::Float(0.5), Value::Null]),
        Column::new("flag", [true, false]),
        Column::new(columns::POST, ["first", "second"]),
    ])
    .expect("table");

    let xlsx = dir.path().join("data.xlsx");
    io::write_table(&table, &xlsx).expect("write xlsx");

    let back = io::read_table(&xlsx).expect("read xlsx");
    assert_eq!(back.column_names(), table.column_names());
    // Integers come back as floats but compare equal.
    assert_eq!(back.get(1, columns::AUTHOR), Some(&Value::Int(2)));
    assert_eq!(back.get(0, "score"), Some(&Value::Float(0.5)));
    assert_eq!(back.get(1, "score"), Some(&Value::Null));
    assert_eq!(back.get(0, "flag"), Some(&Value::Bool(true)));
    assert_eq!(back.get(1, columns::POST), Some(&Value::from("second")));

    let csv = dir.path().join("data.csv");
    xlsx_to_csv(&xlsx, &csv).expect("convert");
    let text = fs::read_to_string(&csv).expect("read csv");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("msg_author_id,score,flag,msg_post"));
    assert_eq!(lines.next(), Some("1,0.5,true,first"));
}

#[test]
fn xlsx_to_csv_checks_extensions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = xlsx_to_csv(&dir.path().join("a.csv"), &dir.path().join("b.csv"))
        .expect_err("wrong input extension");
    assert!(matches!(err, TableError::UnsupportedFormat(_)));
}
