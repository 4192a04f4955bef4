//! Message extraction from messaging app databases
//!
//! Reads the whole message table once, detects which optional columns the
//! source carries, and normalizes every row into a [`Message`].

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ExtractionCause, ParsePalError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{AppKind, Direction, MediaRef, Message};
use crate::schema::{messages, quote_ident, CapabilitySet, Column};

/// Thresholds used to guess the unit of a raw epoch timestamp.
///
/// Values above `millis_above` are milliseconds, values above `seconds_above`
/// are seconds, anything else cannot be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampUnits {
    /// Lower (exclusive) bound for millisecond timestamps
    pub millis_above: i64,
    /// Lower (exclusive) bound for second timestamps
    pub seconds_above: i64,
}

impl Default for TimestampUnits {
    fn default() -> Self {
        Self {
            millis_above: 1_000_000_000_000,
            seconds_above: 1_000_000_000,
        }
    }
}

impl TimestampUnits {
    /// Normalize an integer epoch value to UTC.
    #[must_use]
    pub fn normalize(&self, raw: i64) -> Option<DateTime<Utc>> {
        if raw > self.millis_above {
            DateTime::from_timestamp_millis(raw)
        } else if raw > self.seconds_above {
            DateTime::from_timestamp(raw, 0)
        } else {
            None
        }
    }

    /// Normalize a fractional epoch value to UTC, truncating to milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn normalize_real(&self, raw: f64) -> Option<DateTime<Utc>> {
        if !raw.is_finite() {
            return None;
        }
        let millis = if raw > self.millis_above as f64 {
            raw.trunc()
        } else if raw > self.seconds_above as f64 {
            (raw * 1000.0).trunc()
        } else {
            return None;
        };
        if millis >= i64::MAX as f64 {
            return None;
        }
        DateTime::from_timestamp_millis(millis as i64)
    }

    fn normalize_value(&self, raw: &Value) -> Option<DateTime<Utc>> {
        match raw {
            Value::Integer(i) => self.normalize(*i),
            Value::Real(f) => self.normalize_real(*f),
            Value::Null | Value::Text(_) | Value::Blob(_) => None,
        }
    }
}

/// Raw values of one source row, keyed by the columns that were selected.
#[derive(Debug, Default)]
struct RawRow {
    values: Vec<(Column, Value)>,
}

impl RawRow {
    fn from_row(row: &Row, columns: &[Column]) -> rusqlite::Result<Self> {
        let values = columns
            .iter()
            .enumerate()
            .map(|(i, column)| Ok((*column, row.get::<_, Value>(i)?)))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Self { values })
    }

    fn get(&self, column: Column) -> Option<&Value> {
        self.values.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }

    fn text(&self, column: Column) -> Option<String> {
        self.get(column).and_then(value_to_string)
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Null | Value::Blob(_) => None,
    }
}

#[allow(clippy::float_cmp, clippy::cast_precision_loss)]
fn is_from_me(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Integer(i)) => *i == messages::FROM_ME_SENTINEL,
        Some(Value::Real(f)) => *f == messages::FROM_ME_SENTINEL as f64,
        _ => false,
    }
}

/// Reads and normalizes the message table of a chat database.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    units: TimestampUnits,
    metrics: MetricsCollector,
}

impl Extractor {
    /// Create an extractor with custom timestamp thresholds.
    #[must_use]
    pub fn new(units: TimestampUnits) -> Self {
        Self {
            units,
            metrics: MetricsCollector::default(),
        }
    }

    /// Timestamp thresholds in use.
    #[must_use]
    pub const fn units(&self) -> TimestampUnits {
        self.units
    }

    /// Extract every message of `path`.
    ///
    /// Either the complete normalized sequence is returned or the call fails;
    /// the connection is closed before returning on every path.
    pub fn extract(&self, path: &Path, app: AppKind) -> Result<Vec<Message>> {
        let start = Instant::now();
        let result = self.extract_inner(path, app);

        match &result {
            Ok(records) => {
                self.metrics.record_extraction(records.len(), start.elapsed(), true);
                info!(path = %path.display(), app = %app, records = records.len(), "Extracted messages");
            },
            Err(err) => {
                self.metrics.record_extraction(0, start.elapsed(), false);
                self.metrics.record_error(err.kind(), "extract");
            },
        }

        result
    }

    fn extract_inner(&self, path: &Path, app: AppKind) -> Result<Vec<Message>> {
        if app != AppKind::WhatsApp {
            return Err(ParsePalError::UnsupportedApplication(app.to_string()));
        }

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
            .map_err(|e| ParsePalError::extraction(path, e))?;

        let caps = CapabilitySet::detect(&conn, messages::TABLE)
            .map_err(|e| ParsePalError::extraction(path, e))?
            .ok_or_else(|| ParsePalError::extraction(path, ExtractionCause::MissingTable(messages::TABLE.to_string())))?;

        debug!(columns = ?caps.iter().map(Column::name).collect::<Vec<_>>(), "Detected message columns");

        self.read_messages(&conn, &caps).map_err(|e| ParsePalError::extraction(path, e))
    }

    /// Read and normalize all rows using an already-detected capability set.
    pub fn read_messages(&self, conn: &Connection, caps: &CapabilitySet) -> rusqlite::Result<Vec<Message>> {
        let Some(query) = build_select(caps) else {
            debug!("No known message columns, every row is empty");
            return Ok(Vec::new());
        };
        let columns: Vec<Column> = caps.iter().collect();
        debug!(%query, "Reading messages");

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| RawRow::from_row(row, &columns))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(self.build_message(&row?, caps));
        }

        Ok(results)
    }

    fn build_message(&self, row: &RawRow, caps: &CapabilitySet) -> Message {
        let timestamp = row.get(Column::Timestamp).and_then(|v| self.units.normalize_value(v));

        let path = row
            .text(Column::MediaName)
            .filter(|p| !p.is_empty())
            .or_else(|| row.text(Column::MediaUrl).filter(|p| !p.is_empty()));
        let media = path.map(|path| MediaRef {
            path,
            mime_type: row.text(Column::MediaMimeType),
            media_kind: row.text(Column::MediaKind),
        });

        let direction = if caps.has(Column::FromMe) {
            if is_from_me(row.get(Column::FromMe)) {
                Direction::Sent
            } else {
                Direction::Received
            }
        } else {
            Direction::Unknown
        };

        Message {
            contact: row.text(Column::Contact),
            body: row.text(Column::Body),
            timestamp,
            direction,
            media,
        }
    }
}

/// Build the select statement for the columns in `caps`.
///
/// Rows without text and without a media file name are skipped. Rows are
/// ordered by raw timestamp with NULL timestamps last. Returns `None` when
/// none of the known columns exist.
fn build_select(caps: &CapabilitySet) -> Option<String> {
    if caps.is_empty() {
        return None;
    }
    let select_list = caps.iter().map(|c| quote_ident(c.name())).collect::<Vec<_>>().join(", ");

    let mut query = format!("SELECT {select_list} FROM {}", quote_ident(messages::TABLE));

    let mut conditions = Vec::new();
    for column in [Column::Body, Column::MediaName] {
        if caps.has(column) {
            conditions.push(format!("{} IS NOT NULL", quote_ident(column.name())));
        }
    }
    if !conditions.is_empty() {
        query.push_str(&format!(" WHERE {}", conditions.join(" OR ")));
    }

    if caps.has(Column::Timestamp) {
        let ts = quote_ident(Column::Timestamp.name());
        query.push_str(&format!(" ORDER BY {ts} IS NULL, {ts} ASC"));
    }

    Some(query)
}

/// Extract messages with default settings.
pub fn extract(path: &Path, app: AppKind) -> Result<Vec<Message>> {
    Extractor::default().extract(path, app)
}
