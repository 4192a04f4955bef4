//! Summary statistics over a message sequence.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::warn;

use crate::models::{Direction, Message, Stats};

/// Count non-overlapping literal occurrences of `keyword`.
///
/// Keyword and text are both lower-cased with full Unicode lowering before
/// matching, the same folding the search predicate uses.
struct KeywordCounter {
    pattern: Regex,
}

impl KeywordCounter {
    fn new(keyword: &str) -> Option<Self> {
        if keyword.is_empty() {
            return None;
        }

        match Regex::new(&regex::escape(&keyword.to_lowercase())) {
            Ok(pattern) => Some(Self { pattern }),
            Err(e) => {
                // Only reachable when the escaped literal exceeds the regex size limit.
                warn!(error = %e, "Keyword too large to count");
                None
            },
        }
    }

    fn count(&self, text: &str) -> usize {
        self.pattern.find_iter(&text.to_lowercase()).count()
    }
}

/// Summarize `records`, counting occurrences of `keyword` in bodies.
///
/// An empty keyword disables counting and leaves `keyword_occurrences` at zero.
#[must_use]
pub fn summarize(records: &[Message], keyword: &str) -> Stats {
    let counter = KeywordCounter::new(keyword);

    let mut stats = Stats {
        total: records.len(),
        keyword: (!keyword.is_empty()).then(|| keyword.to_string()),
        ..Stats::default()
    };
    let mut per_day = BTreeMap::new();

    for message in records {
        match message.direction {
            Direction::Sent => stats.sent += 1,
            Direction::Received => stats.received += 1,
            Direction::Unknown => stats.unknown += 1,
        }

        if let Some(date) = message.date() {
            *per_day.entry(date).or_insert(0) += 1;
        }

        if let (Some(counter), Some(body)) = (&counter, &message.body) {
            stats.keyword_occurrences += counter.count(body);
        }
    }

    stats.per_day = per_day;
    stats
}
