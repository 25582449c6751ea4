use std::fs::File;
use std::path::PathBuf;

use polars::prelude::*;
use yago_seltab_core::adjacency::AdjacencyMap;
use yago_seltab_core::config::OutputFormat;
use yago_seltab_core::export::{save_tabs_on_file, tabs_by_type};
use yago_seltab_core::model::{CAT_OBJECT, PREDICATE, SUBJECT, SUBJECT_COUNT, TYPE};

fn temp_dest(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "yago-seltab-export-{}-{}",
        tag,
        std::process::id()
    ));
    // Stale output from an earlier run of the same test must not leak in.
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn read_parquet(path: &PathBuf) -> DataFrame {
    ParquetReader::new(File::open(path).expect("output file opens"))
        .finish()
        .expect("output file parses")
}

fn selected() -> DataFrame {
    df!(
        TYPE => &["<T1>", "<T2>"],
        SUBJECT_COUNT => &[2u32, 1],
    )
    .unwrap()
}

fn types() -> DataFrame {
    df!(
        SUBJECT => &["<A>", "<B>", "<C>"],
        TYPE => &["<T1>", "<T1>", "<T2>"],
    )
    .unwrap()
}

fn facts() -> DataFrame {
    df!(
        SUBJECT => &["<A>", "<A>", "<B>", "<C>"],
        PREDICATE => &["<p1>", "<p2>", "<p1>", "<p9>"],
        CAT_OBJECT => &["<o1>", "<o2>", "<o3>", "<o4>"],
    )
    .unwrap()
}

fn adj_dict() -> AdjacencyMap {
    let mut adj = AdjacencyMap::new();
    adj.insert(
        "<T1>".to_string(),
        vec!["<p1>".to_string(), "<p2>".to_string()],
    );
    adj.insert("<T2>".to_string(), vec!["<p1>".to_string()]);
    adj
}

#[test]
fn tabs_follow_selected_type_order() {
    let tabs = tabs_by_type(&types(), &selected()).expect("tabs built");

    assert_eq!(tabs.len(), 2);
    assert_eq!(tabs[0].type_label, "<T1>");
    assert_eq!(tabs[0].subjects.height(), 2);
    assert_eq!(tabs[1].type_label, "<T2>");
    assert_eq!(tabs[1].subjects.height(), 1);
}

#[test]
fn writes_one_wide_table_per_type() {
    let dest = temp_dest("wide");
    let tabs = tabs_by_type(&types(), &selected()).expect("tabs built");

    let reports = save_tabs_on_file(&tabs, &adj_dict(), &facts(), &dest, OutputFormat::Parquet)
        .expect("save succeeded");

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].file_name, "yago_seltab_T1.parquet");
    assert_eq!(reports[0].rows, 2);
    assert_eq!(reports[0].columns, 3);

    let t1 = read_parquet(&dest.join(&reports[0].file_name));
    assert_eq!(t1.get_column_names_str(), vec!["subject", "p1", "p2"]);

    let subjects = t1.column(SUBJECT).unwrap().str().unwrap();
    let p1 = t1.column("p1").unwrap().str().unwrap();
    let p2 = t1.column("p2").unwrap().str().unwrap();
    assert_eq!(subjects.get(0), Some("<A>"));
    assert_eq!(p1.get(0), Some("<o1>"));
    assert_eq!(p2.get(0), Some("<o2>"));
    assert_eq!(subjects.get(1), Some("<B>"));
    assert_eq!(p1.get(1), Some("<o3>"));
    assert_eq!(p2.get(1), None);

    // <C>'s only fact uses a non-adjacent predicate, so <T2> comes out empty.
    assert_eq!(reports[1].rows, 0);
    let t2 = read_parquet(&dest.join(&reports[1].file_name));
    assert_eq!(t2.height(), 0);
    assert_eq!(t2.get_column_names_str(), vec!["subject", "p1"]);
}

#[test]
fn csv_output_is_supported() {
    let dest = temp_dest("csv");
    let tabs = tabs_by_type(&types(), &selected()).expect("tabs built");

    let reports = save_tabs_on_file(&tabs, &adj_dict(), &facts(), &dest, OutputFormat::Csv)
        .expect("save succeeded");

    assert_eq!(reports[0].file_name, "yago_seltab_T1.csv");
    let raw = std::fs::read_to_string(dest.join(&reports[0].file_name)).expect("csv readable");
    let mut lines = raw.lines();
    assert_eq!(lines.next(), Some("subject,p1,p2"));
    assert_eq!(lines.next(), Some("<A>,<o1>,<o2>"));
}

#[test]
fn colliding_sanitized_labels_get_suffixed() {
    let selected = df!(
        TYPE => &["<My/Type>", "<My.Type>"],
        SUBJECT_COUNT => &[1u32, 1],
    )
    .unwrap();
    let types = df!(
        SUBJECT => &["<A>", "<B>"],
        TYPE => &["<My/Type>", "<My.Type>"],
    )
    .unwrap();
    let facts = df!(
        SUBJECT => &["<A>", "<B>"],
        PREDICATE => &["<p1>", "<p1>"],
        CAT_OBJECT => &["<o1>", "<o2>"],
    )
    .unwrap();
    let mut adj = AdjacencyMap::new();
    adj.insert("<My/Type>".to_string(), vec!["<p1>".to_string()]);
    adj.insert("<My.Type>".to_string(), vec!["<p1>".to_string()]);

    let dest = temp_dest("collide");
    let tabs = tabs_by_type(&types, &selected).expect("tabs built");
    let reports = save_tabs_on_file(&tabs, &adj, &facts, &dest, OutputFormat::Parquet)
        .expect("save succeeded");

    assert_eq!(reports[0].file_name, "yago_seltab_My_Type.parquet");
    assert_eq!(reports[1].file_name, "yago_seltab_My_Type_2.parquet");
    assert!(dest.join(&reports[0].file_name).is_file());
    assert!(dest.join(&reports[1].file_name).is_file());
}

#[test]
fn types_missing_from_adjacency_are_skipped() {
    let dest = temp_dest("skip");
    let tabs = tabs_by_type(&types(), &selected()).expect("tabs built");

    let mut adj = AdjacencyMap::new();
    adj.insert("<T2>".to_string(), vec!["<p1>".to_string()]);

    let reports = save_tabs_on_file(&tabs, &adj, &facts(), &dest, OutputFormat::Parquet)
        .expect("save succeeded");

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].type_label, "<T2>");
}
