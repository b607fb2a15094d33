use analyzer_core::export::{self, ExportFormat, ReportHeader};
use analyzer_core::{
    Category, CompareOptions, ConnectionTarget, DatabaseKind, FailurePolicy, Locale,
    analyze_targets,
};
use chrono::Local;
use duckdb::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MASTER_DDL: &str = "
    CREATE TABLE customers (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL, score INTEGER);
    CREATE TABLE orders (id INTEGER PRIMARY KEY, customer_id INTEGER);
    CREATE MACRO add_one(x) AS x + 1;
";

const DIVISION_DDL: &str = "
    CREATE TABLE customers (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL, score VARCHAR);
";

fn create_db(dir: &Path, name: &str, ddl: &str) -> PathBuf {
    let path = dir.join(name);
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(ddl).unwrap();
    drop(conn);
    path
}

fn target(path: &Path) -> ConnectionTarget {
    ConnectionTarget::new(DatabaseKind::DuckDb, path.to_string_lossy()).unwrap()
}

fn options() -> CompareOptions {
    CompareOptions {
        procedure_owner: Some("main".to_string()),
        ..CompareOptions::default()
    }
}

#[test]
fn test_end_to_end_duckdb_comparison() {
    let dir = TempDir::new().unwrap();
    let master = create_db(dir.path(), "master.duckdb", MASTER_DDL);
    let division = create_db(dir.path(), "division.duckdb", DIVISION_DDL);

    let report = analyze_targets(&target(&master), &target(&division), options()).unwrap();
    let entries = report.entries();

    assert_eq!(entries[0].category(), Category::TableCount);
    assert_eq!(entries[0].master(), "2");
    assert_eq!(entries[0].division().to_string(), "1");
    assert_eq!(entries[1].category(), Category::SpCount);
    assert_eq!(entries[1].master(), "1");
    assert_eq!(entries[1].division().to_string(), "0");

    let missing_tables: Vec<&str> = report
        .by_category(Category::MissingTable)
        .map(|e| e.master())
        .collect();
    assert_eq!(missing_tables, vec!["[orders]"]);

    let missing_sps: Vec<&str> = report
        .by_category(Category::MissingSp)
        .map(|e| e.master())
        .collect();
    assert_eq!(missing_sps, vec!["[add_one]"]);

    let missing_columns: Vec<&str> = report
        .by_category(Category::MissingColumn)
        .map(|e| e.master())
        .collect();
    assert_eq!(missing_columns.len(), 2);
    assert!(missing_columns[0].starts_with("[orders].[id]("));
    assert!(missing_columns[1].starts_with("[orders].[customer_id]("));

    let changed: Vec<_> = report.by_category(Category::ChangedColumn).collect();
    assert_eq!(changed.len(), 1);
    assert!(changed[0].master().starts_with("[customers].[score](YES,INTEGER,"));
    assert!(
        changed[0]
            .division()
            .to_string()
            .starts_with("[customers].[score](YES,VARCHAR,")
    );

    let missing_constraints: Vec<_> = report
        .by_category(Category::MissingKeyConstraint)
        .collect();
    assert_eq!(missing_constraints.len(), 1);
    assert!(missing_constraints[0].master().starts_with("[orders]."));
    assert!(missing_constraints[0].division().is_missing());

    assert!(report.has_drift());
    assert!(report.is_complete());
}

#[test]
fn test_identical_files_have_only_counts() {
    let dir = TempDir::new().unwrap();
    let master = create_db(dir.path(), "master.duckdb", MASTER_DDL);
    let division = create_db(dir.path(), "division.duckdb", MASTER_DDL);

    let report = analyze_targets(&target(&master), &target(&division), options()).unwrap();

    assert_eq!(report.len(), 2);
    assert!(!report.has_drift());
}

#[test]
fn test_missing_division_file_aborts() {
    let dir = TempDir::new().unwrap();
    let master = create_db(dir.path(), "master.duckdb", MASTER_DDL);
    let division = dir.path().join("absent.duckdb");

    let err = analyze_targets(&target(&master), &target(&division), options()).unwrap_err();
    assert_eq!(err.kind(), analyzer_core::ErrorKind::Connection);
}

#[test]
fn test_missing_division_file_collects_every_failure() {
    let dir = TempDir::new().unwrap();
    let master = create_db(dir.path(), "master.duckdb", MASTER_DDL);
    let division = dir.path().join("absent.duckdb");
    let options = CompareOptions {
        failure_policy: FailurePolicy::Collect,
        ..options()
    };

    let report = analyze_targets(&target(&master), &target(&division), options).unwrap();

    assert!(report.is_empty());
    assert_eq!(report.failures().len(), 6);
}

#[test]
fn test_export_text_report_to_file() {
    let dir = TempDir::new().unwrap();
    let master = create_db(dir.path(), "master.duckdb", MASTER_DDL);
    let division = create_db(dir.path(), "division.duckdb", DIVISION_DDL);
    let master_target = target(&master);
    let division_target = target(&division);

    let report = analyze_targets(&master_target, &division_target, options()).unwrap();

    let master_desc = master_target.describe();
    let division_desc = division_target.describe();
    let header = ReportHeader {
        master: &master_desc,
        division: &division_desc,
        locale: Locale::Zh,
        generated_at: Local::now(),
    };
    let output = dir.path().join("report.txt");
    assert!(export::write_report(&report, &header, ExportFormat::Text, &output).unwrap());

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("数据库对比分析报告 "));
    assert!(text.contains("项目:缺少的表\n主数据库:\n[orders]\n分数据库:\n缺\n----\n"));
}
