//! Data models for chat history records and queries
//!
//! This module contains the normalized message record produced by the
//! extractor and the query/result structures consumed by the filter, stats and
//! media stages.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParsePalError;

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Sent by the device owner
    Sent,
    /// Received from the contact
    Received,
    /// The source has no from-self flag
    Unknown,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => f.write_str("Sent"),
            Self::Received => f.write_str("Received"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Attached media file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// File name or URL of the attachment
    pub path: String,
    /// MIME type, if recorded
    pub mime_type: Option<String>,
    /// Application-specific media kind, if recorded
    pub media_kind: Option<String>,
}

/// A normalized chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Conversation partner identifier
    pub contact: Option<String>,
    /// Message text content
    pub body: Option<String>,
    /// When the message was sent, in UTC
    pub timestamp: Option<DateTime<Utc>>,
    /// Sent, received, or unknown
    pub direction: Direction,
    /// Attached media
    pub media: Option<MediaRef>,
}

impl Message {
    /// Calendar date of the timestamp, if any.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date_naive())
    }

    /// Media path trimmed of surrounding whitespace, if non-empty.
    #[must_use]
    pub fn media_path(&self) -> Option<&str> {
        self.media
            .as_ref()
            .map(|m| m.path.trim())
            .filter(|p| !p.is_empty())
    }
}

/// Messaging application whose database is being read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppKind {
    /// WhatsApp `msgstore.db`
    WhatsApp,
    /// Facebook Messenger
    Messenger,
    /// Telegram
    Telegram,
}

impl AppKind {
    /// Display name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WhatsApp => "WhatsApp",
            Self::Messenger => "Messenger",
            Self::Telegram => "Telegram",
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AppKind {
    type Err = ParsePalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "whatsapp" => Ok(Self::WhatsApp),
            "messenger" => Ok(Self::Messenger),
            "telegram" => Ok(Self::Telegram),
            _ => Err(ParsePalError::UnsupportedApplication(s.to_string())),
        }
    }
}

/// Direction criterion of a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionFilter {
    /// No direction constraint
    #[default]
    All,
    /// Only sent messages
    Sent,
    /// Only received messages
    Received,
}

impl DirectionFilter {
    /// True if `direction` satisfies this filter.
    #[must_use]
    pub fn accepts(self, direction: Direction) -> bool {
        match self {
            Self::All => true,
            Self::Sent => direction == Direction::Sent,
            Self::Received => direction == Direction::Received,
        }
    }
}

impl FromStr for DirectionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "sent" => Ok(Self::Sent),
            "received" => Ok(Self::Received),
            other => Err(format!("invalid direction '{other}': expected all, sent or received")),
        }
    }
}

/// Query parameters for one filter pass
///
/// Built fresh for every query. `Default` is the empty spec, which selects
/// every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring to look for in the body
    pub search_text: Option<String>,
    /// Direction constraint
    pub direction: DirectionFilter,
    /// Inclusive lower date bound, as typed by the user (YYYY-MM-DD)
    pub date_from: Option<String>,
    /// Inclusive upper date bound, as typed by the user (YYYY-MM-DD)
    pub date_to: Option<String>,
    /// Contacts to keep; empty keeps all
    pub contacts: BTreeSet<String>,
    /// Keyword counted by the stats stage; does not affect selection
    pub keyword: Option<String>,
}

impl FilterSpec {
    /// Create an empty spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body search text.
    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Set the direction constraint.
    #[must_use]
    pub const fn with_direction(mut self, direction: DirectionFilter) -> Self {
        self.direction = direction;
        self
    }

    /// Set the date bounds.
    #[must_use]
    pub fn with_dates(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.date_from = from.map(ToString::to_string);
        self.date_to = to.map(ToString::to_string);
        self
    }

    /// Set the contact selection.
    #[must_use]
    pub fn with_contacts<I, S>(mut self, contacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contacts = contacts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the stats keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }
}

/// Summary statistics over a record sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of records
    pub total: usize,
    /// Records sent by the device owner
    pub sent: usize,
    /// Records received from contacts
    pub received: usize,
    /// Records without direction information
    pub unknown: usize,
    /// Records per calendar day, ascending; undated records are not counted
    pub per_day: BTreeMap<NaiveDate, usize>,
    /// Keyword that was counted, if any
    pub keyword: Option<String>,
    /// Case-insensitive literal occurrences of the keyword across bodies
    pub keyword_occurrences: usize,
}

/// Media-bearing subset of a record sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaView {
    /// Records with a media path, in display order
    pub entries: Vec<Message>,
    /// Media records per contact
    pub counts_by_contact: BTreeMap<String, usize>,
}
