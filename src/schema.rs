//! Database schema definitions
//!
//! Column names of the WhatsApp `messages` table and the capability set that
//! records which of the optional columns a given database actually carries.

use std::collections::BTreeSet;
use std::fmt;

use rusqlite::Connection;

/// Messages table schema
pub mod messages {
    /// Table name
    pub const TABLE: &str = "messages";
    /// Conversation partner identifier (JID)
    pub const KEY_REMOTE_JID: &str = "key_remote_jid";
    /// Message text content
    pub const DATA: &str = "data";
    /// Raw epoch timestamp, seconds or milliseconds
    pub const TIMESTAMP: &str = "timestamp";
    /// Attached media file name
    pub const MEDIA_NAME: &str = "media_name";
    /// Attached media URL
    pub const MEDIA_URL: &str = "media_url";
    /// Attached media MIME type
    pub const MEDIA_MIME_TYPE: &str = "media_mime_type";
    /// Attached media kind
    pub const MEDIA_WA_TYPE: &str = "media_wa_type";
    /// Flag set when the device owner sent the message
    pub const KEY_FROM_ME: &str = "key_from_me";
    /// Value of `key_from_me` that marks a sent message
    pub const FROM_ME_SENTINEL: i64 = 1;
}

/// One of the optional columns the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// Conversation partner
    Contact,
    /// Text body
    Body,
    /// Raw timestamp
    Timestamp,
    /// Media file name
    MediaName,
    /// Media URL
    MediaUrl,
    /// Media MIME type
    MediaMimeType,
    /// Media kind
    MediaKind,
    /// From-self flag
    FromMe,
}

impl Column {
    /// Every known column, in select-list order.
    pub const ALL: [Self; 8] = [
        Self::Contact,
        Self::Body,
        Self::Timestamp,
        Self::MediaName,
        Self::MediaUrl,
        Self::MediaMimeType,
        Self::MediaKind,
        Self::FromMe,
    ];

    /// SQLite column name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Contact => messages::KEY_REMOTE_JID,
            Self::Body => messages::DATA,
            Self::Timestamp => messages::TIMESTAMP,
            Self::MediaName => messages::MEDIA_NAME,
            Self::MediaUrl => messages::MEDIA_URL,
            Self::MediaMimeType => messages::MEDIA_MIME_TYPE,
            Self::MediaKind => messages::MEDIA_WA_TYPE,
            Self::FromMe => messages::KEY_FROM_ME,
        }
    }

    /// Look up a column by its SQLite name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of optional columns present in one source database.
///
/// Computed once per extraction; the record builder consults it instead of
/// probing the schema row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    columns: BTreeSet<Column>,
}

impl CapabilitySet {
    /// Build from arbitrary column names. Unknown names are ignored.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = names
            .into_iter()
            .filter_map(|n| Column::from_name(n.as_ref()))
            .collect();
        Self { columns }
    }

    /// Inspect `table` through `PRAGMA table_info`.
    ///
    /// Returns `Ok(None)` when the table does not exist.
    pub fn detect(conn: &Connection, table: &str) -> rusqlite::Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if names.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::from_names(names)))
    }

    /// True when `column` exists in the source.
    #[must_use]
    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Present columns in select-list order.
    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    /// Number of present columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when none of the known columns exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Quote an SQLite identifier.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
