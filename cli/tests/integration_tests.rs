use std::path::{Path, PathBuf};
use std::process::Command;

use rowbind_sqlite::{DatabaseConfig, Table};

rowbind_core::entity! {
    #[derive(Debug, Clone, Default)]
    struct Book {
        id: i32 => [name = "id", primary_key = "true"],
        title: String => [name = "title", length = "80", null = "false"],
        pages: u32 => [name = "pages"],
    }
}

/// Creates a database holding a `Book` table with three rows.
fn seed_database(dir: &Path) -> PathBuf {
    let path = dir.join("books.db");
    let conn = DatabaseConfig::for_path(&path).open().unwrap();
    let books = Table::<Book>::new(&conn).unwrap();
    books.create(false).unwrap();
    for id in 1..=3 {
        books
            .insert(&Book {
                id,
                title: format!("Book {id}"),
                pages: 100,
            })
            .unwrap();
    }
    path
}

fn rowbind(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_rowbind"))
        .args(args)
        .output()
        .expect("failed to run rowbind")
}

#[test]
fn test_tables_lists_created_table() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed_database(dir.path());

    let output = rowbind(&["tables", "--db", db.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Book");
}

#[test]
fn test_columns_json() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed_database(dir.path());

    let output = rowbind(&[
        "columns",
        "--db",
        db.to_str().unwrap(),
        "--table",
        "Book",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let columns: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let columns = columns.as_array().unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0]["name"], "id");
    assert_eq!(columns[0]["primary_key"], true);
    assert_eq!(columns[1]["type_name"], "CHAR(80)");
    assert_eq!(columns[1]["not_null"], true);
    assert_eq!(columns[2]["type_name"], "INT");
}

#[test]
fn test_count_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed_database(dir.path());
    let config_path = dir.path().join("db.yml");
    DatabaseConfig::for_path(&db).to_file(&config_path).unwrap();

    let output = rowbind(&[
        "count",
        "--config",
        config_path.to_str().unwrap(),
        "--table",
        "Book",
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3");
}

#[test]
fn test_missing_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed_database(dir.path());

    let output = rowbind(&["columns", "--db", db.to_str().unwrap(), "--table", "Nope"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_count_of_missing_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed_database(dir.path());

    let output = rowbind(&["count", "--db", db.to_str().unwrap(), "--table", "Nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("table 'Nope' does not exist"));
}

#[test]
fn test_missing_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.db");

    let output = rowbind(&["tables", "--db", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(!missing.exists());
}
