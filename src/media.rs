//! Media inventory: the media-bearing subset of a message sequence, ordered
//! with priority contacts first.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{MediaView, Message};

/// Absent values sort after present ones.
fn cmp_present_first<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn is_priority(message: &Message, priority: &BTreeSet<String>) -> bool {
    message.contact.as_ref().is_some_and(|c| priority.contains(c))
}

/// Build the media view of `records`.
///
/// Records are ordered by priority membership (when `priority_contacts` is
/// non-empty), then contact, then timestamp. Records without a contact or
/// timestamp sort last within their group and are left out of
/// `counts_by_contact`.
#[must_use]
pub fn index(records: &[Message], priority_contacts: &BTreeSet<String>) -> MediaView {
    let mut entries: Vec<Message> = records.iter().filter(|m| m.media_path().is_some()).cloned().collect();

    let mut counts_by_contact = BTreeMap::new();
    for contact in entries.iter().filter_map(|m| m.contact.as_ref()) {
        *counts_by_contact.entry(contact.clone()).or_insert(0) += 1;
    }

    entries.sort_by(|a, b| {
        let by_priority = if priority_contacts.is_empty() {
            Ordering::Equal
        } else {
            is_priority(b, priority_contacts).cmp(&is_priority(a, priority_contacts))
        };

        by_priority
            .then_with(|| cmp_present_first(a.contact.as_ref(), b.contact.as_ref()))
            .then_with(|| cmp_present_first(a.timestamp.as_ref(), b.timestamp.as_ref()))
    });

    MediaView {
        entries,
        counts_by_contact,
    }
}
