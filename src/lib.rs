//! ParsePal - Chat History Extraction and Analysis
//!
//! A Rust library for extracting message histories from messaging app
//! databases and answering ad-hoc queries over them.
//!
//! # Features
//!
//! - Schema-tolerant extraction of WhatsApp `msgstore.db` message tables
//! - Text, direction, date-range and contact filtering
//! - Per-day counts, direction totals and keyword frequency
//! - Media inventory with priority contacts first
//! - Recursive discovery of database files

/// Configuration management
pub mod config;
/// Database file discovery
pub mod discovery;
/// Error types
pub mod error;
/// Message extraction from source databases
pub mod extractor;
/// Record filtering
pub mod filter;
/// Logging setup and utilities
pub mod logging;
/// Media inventory
pub mod media;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Source database schema definitions
pub mod schema;
/// Per-database query session
pub mod session;
/// Summary statistics
pub mod stats;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use error::{FilterWarning, ParsePalError, Result};
pub use extractor::{extract, Extractor, TimestampUnits};
pub use filter::{filter, FilterOutcome};
pub use media::index;
pub use models::{AppKind, Direction, DirectionFilter, FilterSpec, MediaRef, MediaView, Message, Stats};
pub use session::{QueryResult, Session};
pub use stats::summarize;
