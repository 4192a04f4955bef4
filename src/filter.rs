//! Predicate pipeline over extracted messages.
//!
//! Filtering is a stable selection: the output keeps the input order and the
//! input is never modified. Predicates of different categories are ANDed.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{DateBound, FilterWarning};
use crate::models::{DirectionFilter, FilterSpec, Message};
use crate::validation::InputValidator;

/// Result of a filter pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Selected records, in input order
    pub messages: Vec<Message>,
    /// Non-fatal problems with the spec
    pub warnings: Vec<FilterWarning>,
}

/// A `FilterSpec` with its text parsed into ready-to-apply predicates.
#[derive(Debug)]
struct Predicates<'a> {
    needle: Option<String>,
    direction: DirectionFilter,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    contacts: &'a BTreeSet<String>,
}

impl<'a> Predicates<'a> {
    fn compile(spec: &'a FilterSpec, warnings: &mut Vec<FilterWarning>) -> Self {
        let needle = spec
            .search_text
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Self {
            needle,
            direction: spec.direction,
            from: parse_bound(spec.date_from.as_deref(), DateBound::From, warnings),
            to: parse_bound(spec.date_to.as_deref(), DateBound::To, warnings),
            contacts: &spec.contacts,
        }
    }

    fn matches(&self, message: &Message) -> bool {
        if let Some(needle) = &self.needle {
            match &message.body {
                Some(body) if body.to_lowercase().contains(needle.as_str()) => {},
                _ => return false,
            }
        }

        if !self.direction.accepts(message.direction) {
            return false;
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(date) = message.date() else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) || self.to.is_some_and(|to| date > to) {
                return false;
            }
        }

        if !self.contacts.is_empty() {
            match &message.contact {
                Some(contact) if self.contacts.contains(contact) => {},
                _ => return false,
            }
        }

        true
    }
}

fn parse_bound(input: Option<&str>, bound: DateBound, warnings: &mut Vec<FilterWarning>) -> Option<NaiveDate> {
    match InputValidator::parse_date_bound(input?) {
        Ok(date) => date,
        Err(value) => {
            warn!(%bound, %value, "Ignoring unparsable date bound");
            warnings.push(FilterWarning::DateBoundUnparsable { bound, value });
            None
        },
    }
}

/// Select the records matching `spec`.
///
/// Never fails: an unparsable date bound is dropped and reported in
/// [`FilterOutcome::warnings`]. The `keyword` field is ignored here.
#[must_use]
pub fn filter(records: &[Message], spec: &FilterSpec) -> FilterOutcome {
    let mut warnings = Vec::new();
    let predicates = Predicates::compile(spec, &mut warnings);

    let messages = records.iter().filter(|m| predicates.matches(m)).cloned().collect();

    FilterOutcome { messages, warnings }
}
