//! Sample WhatsApp database generator shared by the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use rusqlite::{params, Connection};
use tempfile::TempDir;

/// Full WhatsApp-like schema, including the media URL column
pub const FULL_SCHEMA: &str = "CREATE TABLE messages (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    key_remote_jid TEXT,
    data TEXT,
    timestamp INTEGER,
    key_from_me INTEGER,
    media_name TEXT,
    media_url TEXT,
    media_mime_type TEXT,
    media_wa_type TEXT
)";

/// One fixture row
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub contact: Option<&'static str>,
    pub body: Option<&'static str>,
    pub timestamp: Option<i64>,
    pub from_me: Option<i64>,
    pub media_name: Option<&'static str>,
    pub media_url: Option<&'static str>,
    pub mime: Option<&'static str>,
    pub kind: Option<&'static str>,
}

impl Row {
    pub fn text(contact: &'static str, body: &'static str, timestamp: i64, from_me: i64) -> Self {
        Self {
            contact: Some(contact),
            body: Some(body),
            timestamp: Some(timestamp),
            from_me: Some(from_me),
            ..Self::default()
        }
    }

    pub fn image(mut self, name: &'static str) -> Self {
        self.media_name = Some(name);
        self.mime = Some("image/jpeg");
        self.kind = Some("image");
        self
    }
}

/// A database file living in its own temporary directory
pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

/// Create `msgstore.db` with the full schema and `rows`.
pub fn whatsapp_db(rows: &[Row]) -> Fixture {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("msgstore.db");
    let conn = Connection::open(&path).expect("Failed to create fixture database");
    conn.execute_batch(FULL_SCHEMA).expect("Failed to create messages table");
    insert_rows(&conn, rows);
    Fixture { dir, path }
}

/// Create `msgstore.db` from arbitrary SQL.
pub fn custom_db(sql: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("msgstore.db");
    let conn = Connection::open(&path).expect("Failed to create fixture database");
    conn.execute_batch(sql).expect("Failed to run fixture SQL");
    Fixture { dir, path }
}

fn insert_rows(conn: &Connection, rows: &[Row]) {
    let mut stmt = conn
        .prepare(
            "INSERT INTO messages (key_remote_jid, data, timestamp, key_from_me, media_name, media_url, media_mime_type, media_wa_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .expect("Failed to prepare insert");
    for row in rows {
        stmt.execute(params![
            row.contact,
            row.body,
            row.timestamp,
            row.from_me,
            row.media_name,
            row.media_url,
            row.mime,
            row.kind
        ])
        .expect("Failed to insert fixture row");
    }
}

/// Five-message conversation: contacts A, A, B, A, B with two images from B.
pub fn five_message_fixture() -> Fixture {
    let base = 1_672_531_200_000; // 2023-01-01T00:00:00Z in milliseconds
    let hour = 3_600_000;
    whatsapp_db(&[
        Row::text("A", "Hello!", base, 1),
        Row::text("A", "How are you?", base + hour, 0),
        Row::text("B", "Look at this", base + 2 * hour, 1).image("/media/IMG-0001.jpg"),
        Row::text("A", "See you soon.", base + 26 * hour, 1),
        Row::text("B", "Nice!", base + 27 * hour, 0).image("/media/IMG-0002.jpg"),
    ])
}
