use phonebook_core::db::migrations::{apply_migrations, latest_version};
use phonebook_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn fresh_database_gets_local_storage_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(column_names(&conn, "local_storage"), ["key", "value", "updated_at"]);
}

#[test]
fn inserted_rows_get_updated_at_default() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO local_storage (key, value) VALUES ('contact-list', '[]');",
        [],
    )
    .unwrap();

    let updated_at: i64 = conn
        .query_row(
            "SELECT updated_at FROM local_storage WHERE key = 'contact-list';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(updated_at > 0);
}

#[test]
fn reapplying_migrations_is_a_noop() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO local_storage (key, value) VALUES ('k', 'v');",
        [],
    )
    .unwrap();

    apply_migrations(&mut conn).unwrap();

    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(stored_value(&conn, "k").as_deref(), Some("v"));
}

#[test]
fn reopened_file_keeps_stored_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phonebook.db");

    {
        let conn = open_db(&path).unwrap();
        conn.execute(
            "INSERT INTO local_storage (key, value) VALUES ('contact-list', 'null');",
            [],
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(stored_value(&conn, "contact-list").as_deref(), Some("null"));
}

#[test]
fn newer_schema_is_rejected_without_touching_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let future = latest_version() + 7;

    Connection::open(&path)
        .unwrap()
        .execute_batch(&format!("PRAGMA user_version = {future};"))
        .unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(err.to_string().contains("newer than supported"), "{err}");
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version, latest_supported }
            if db_version == future && latest_supported == latest_version()
    ));

    let raw = Connection::open(&path).unwrap();
    assert_eq!(user_version(&raw), future);
    assert!(column_names(&raw, "local_storage").is_empty());
}

fn user_version(conn: &Connection) -> u32 {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid;")
        .unwrap();
    stmt.query_map([table], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn stored_value(conn: &Connection, key: &str) -> Option<String> {
    conn.query_row(
        "SELECT value FROM local_storage WHERE key = ?1;",
        [key],
        |row| row.get(0),
    )
    .ok()
}
