//! Integration tests for extracting messages from on-disk databases

mod common;

use chrono::{TimeZone, Utc};
use common::{custom_db, whatsapp_db, Row};
use parsepal::error::{ExtractionCause, ParsePalError};
use parsepal::{extract, AppKind, Direction, Extractor, TimestampUnits};

#[test]
fn test_extracts_full_schema() {
    let fixture = whatsapp_db(&[
        Row::text("111@s.whatsapp.net", "Hello!", 1_690_000_000_000, 1),
        Row::text("222@s.whatsapp.net", "Good morning!", 1_690_000_100_000, 0).image("/sdcard/IMG-1.jpg"),
    ]);

    let records = extract(&fixture.path, AppKind::WhatsApp).expect("extraction should succeed");
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.contact.as_deref(), Some("111@s.whatsapp.net"));
    assert_eq!(first.body.as_deref(), Some("Hello!"));
    assert_eq!(first.timestamp, Some(Utc.with_ymd_and_hms(2023, 7, 22, 4, 26, 40).unwrap()));
    assert_eq!(first.direction, Direction::Sent);
    assert!(first.media.is_none());

    let second = &records[1];
    assert_eq!(second.direction, Direction::Received);
    let media = second.media.as_ref().expect("media should be present");
    assert_eq!(media.path, "/sdcard/IMG-1.jpg");
    assert_eq!(media.mime_type.as_deref(), Some("image/jpeg"));
    assert_eq!(media.media_kind.as_deref(), Some("image"));
}

#[test]
fn test_orders_by_raw_timestamp_with_nulls_last() {
    let fixture = whatsapp_db(&[
        Row { timestamp: None, ..Row::text("a", "no time", 0, 0) },
        Row::text("a", "third", 1_690_000_200_000, 0),
        Row::text("a", "first", 1_690_000_000_000, 0),
        Row::text("a", "tiny", 500, 0),
        Row::text("a", "second", 1_690_000_100_000, 0),
    ]);

    let records = extract(&fixture.path, AppKind::WhatsApp).unwrap();
    let bodies: Vec<_> = records.iter().filter_map(|m| m.body.as_deref()).collect();
    assert_eq!(bodies, vec!["tiny", "first", "second", "third", "no time"]);

    assert_eq!(records[0].timestamp, None);
    assert_eq!(records[4].timestamp, None);
    assert!(records[1..4].windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_skips_rows_without_body_or_media_name() {
    let fixture = whatsapp_db(&[
        Row { body: None, ..Row::text("a", "", 1_690_000_000, 0) },
        Row { body: None, ..Row::text("a", "", 1_690_000_001, 0) }.image("voice.opus"),
        Row {
            body: None,
            media_url: Some("https://mmg.whatsapp.net/d/f/abc.enc"),
            ..Row::text("a", "", 1_690_000_002, 0)
        },
    ]);

    let records = extract(&fixture.path, AppKind::WhatsApp).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].media.as_ref().map(|m| m.path.as_str()), Some("voice.opus"));
    assert_eq!(records[0].body, None);
}

#[test]
fn test_media_url_is_fallback_path() {
    let fixture = whatsapp_db(&[Row {
        media_url: Some("https://mmg.whatsapp.net/d/f/abc.enc"),
        ..Row::text("a", "caption", 1_690_000_000, 0)
    }]);

    let records = extract(&fixture.path, AppKind::WhatsApp).unwrap();
    let media = records[0].media.as_ref().expect("URL should become the media path");
    assert_eq!(media.path, "https://mmg.whatsapp.net/d/f/abc.enc");
    assert_eq!(media.mime_type, None);
}

#[test]
fn test_missing_optional_columns_are_tolerated() {
    let fixture = custom_db(
        "CREATE TABLE messages (_id INTEGER PRIMARY KEY, data TEXT, timestamp INTEGER);
         INSERT INTO messages (data, timestamp) VALUES ('only text', 1690000000);",
    );

    let records = extract(&fixture.path, AppKind::WhatsApp).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].contact, None);
    assert_eq!(records[0].direction, Direction::Unknown);
    assert!(records[0].media.is_none());
    assert!(records[0].timestamp.is_some());
}

#[test]
fn test_null_from_me_is_received() {
    let fixture = whatsapp_db(&[Row { from_me: None, ..Row::text("a", "hi", 1_690_000_000, 0) }]);
    let records = extract(&fixture.path, AppKind::WhatsApp).unwrap();
    assert_eq!(records[0].direction, Direction::Received);
}

#[test]
fn test_empty_table_is_valid() {
    let fixture = whatsapp_db(&[]);
    let records = extract(&fixture.path, AppKind::WhatsApp).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_unsupported_application() {
    let fixture = whatsapp_db(&[Row::text("a", "hi", 1_690_000_000, 0)]);
    let err = extract(&fixture.path, AppKind::Telegram).unwrap_err();
    assert!(matches!(err, ParsePalError::UnsupportedApplication(ref app) if app == "Telegram"));
}

#[test]
fn test_missing_table_fails() {
    let fixture = custom_db("CREATE TABLE chat_list (_id INTEGER PRIMARY KEY);");
    let err = extract(&fixture.path, AppKind::WhatsApp).unwrap_err();
    match err {
        ParsePalError::ExtractionFailed { path, source } => {
            assert_eq!(path, fixture.path);
            assert!(matches!(source, ExtractionCause::MissingTable(_)));
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file_fails_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");
    let err = extract(&path, AppKind::WhatsApp).unwrap_err();
    assert!(matches!(err, ParsePalError::ExtractionFailed { .. }));
    assert!(err.to_string().contains("absent.db"));
}

#[test]
fn test_non_sqlite_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    std::fs::write(&path, "this is not a database\n".repeat(64)).unwrap();
    let err = extract(&path, AppKind::WhatsApp).unwrap_err();
    assert!(matches!(err, ParsePalError::ExtractionFailed { source: ExtractionCause::Sqlite(_), .. }));
}

#[test]
fn test_configured_thresholds_apply() {
    let fixture = whatsapp_db(&[Row::text("a", "old", 500, 0)]);
    let extractor = Extractor::new(TimestampUnits {
        millis_above: 1_000_000_000_000,
        seconds_above: 100,
    });

    let records = extractor.extract(&fixture.path, AppKind::WhatsApp).unwrap();
    assert_eq!(records[0].timestamp.map(|t| t.timestamp()), Some(500));
}

#[test]
fn test_real_and_text_timestamps() {
    let fixture = custom_db(
        "CREATE TABLE messages (data TEXT, timestamp);
         INSERT INTO messages VALUES ('real', 1690000000.25);
         INSERT INTO messages VALUES ('text', 'yesterday');",
    );

    let records = extract(&fixture.path, AppKind::WhatsApp).unwrap();
    let real = records.iter().find(|m| m.body.as_deref() == Some("real")).unwrap();
    let text = records.iter().find(|m| m.body.as_deref() == Some("text")).unwrap();
    assert_eq!(real.timestamp.map(|t| t.timestamp_millis()), Some(1_690_000_000_250));
    assert_eq!(text.timestamp, None);
}
