//! Explicit per-database session.
//!
//! A [`Session`] owns the record sequence extracted from one database and runs
//! the filter → stats/media pipeline on demand. The caller owns the session;
//! nothing here is global.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::error::{FilterWarning, Result};
use crate::extractor::{Extractor, TimestampUnits};
use crate::filter::filter;
use crate::logging::OperationTimer;
use crate::media::index;
use crate::metrics::MetricsCollector;
use crate::models::{AppKind, FilterSpec, MediaView, Message, Stats};
use crate::stats::summarize;

/// Everything a presentation layer needs after one filter pass
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// Filtered records, in source order
    pub messages: Vec<Message>,
    /// Statistics over `messages`
    pub stats: Stats,
    /// Media inventory over `messages`
    pub media: MediaView,
    /// Non-fatal problems with the query
    pub warnings: Vec<FilterWarning>,
}

/// Loaded chat history of one database
#[derive(Debug)]
pub struct Session {
    source: PathBuf,
    app: AppKind,
    records: Vec<Message>,
    metrics: MetricsCollector,
}

impl Session {
    /// Extract `path` and keep the records for querying.
    pub fn open(path: &Path, app: AppKind, units: TimestampUnits) -> Result<Self> {
        let timer = OperationTimer::new("session_open");
        let records = Extractor::new(units).extract(path, app)?;
        timer.finish();

        Ok(Self::from_records(path, app, records))
    }

    /// Build a session around records that were already extracted.
    #[must_use]
    pub fn from_records(path: impl Into<PathBuf>, app: AppKind, records: Vec<Message>) -> Self {
        Self {
            source: path.into(),
            app,
            records,
            metrics: MetricsCollector::default(),
        }
    }

    /// Database the records came from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Application the database belongs to.
    #[must_use]
    pub const fn app(&self) -> AppKind {
        self.app
    }

    /// All extracted records.
    #[must_use]
    pub fn records(&self) -> &[Message] {
        &self.records
    }

    /// Distinct contacts, sorted.
    #[must_use]
    pub fn contacts(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|m| m.contact.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Run one full pipeline pass.
    ///
    /// The selected contacts double as priority contacts for the media view.
    #[must_use]
    pub fn query(&self, spec: &FilterSpec) -> QueryResult {
        let start = Instant::now();

        let outcome = filter(&self.records, spec);
        let stats = summarize(&outcome.messages, spec.keyword.as_deref().unwrap_or_default());
        let media = index(&outcome.messages, &spec.contacts);

        self.metrics
            .record_filter_pass(self.records.len(), outcome.messages.len(), outcome.warnings.len(), start.elapsed());
        info!(
            source = %self.source.display(),
            selected = outcome.messages.len(),
            media = media.entries.len(),
            "Query applied"
        );

        QueryResult {
            messages: outcome.messages,
            stats,
            media,
            warnings: outcome.warnings,
        }
    }

    /// Pipeline pass with every filter cleared.
    #[must_use]
    pub fn clear_filters(&self) -> QueryResult {
        self.query(&FilterSpec::default())
    }
}
