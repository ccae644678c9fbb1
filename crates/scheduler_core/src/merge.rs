use std::collections::HashSet;

use crate::event::{Event, EventKey};

/// Appends every `incoming` event whose key is not already present.
///
/// Existing entries are never replaced, so re-extracting a week is a no-op and
/// the first-seen copy of an occurrence wins. Duplicates inside `incoming`
/// collapse the same way.
pub fn merge(mut existing: Vec<Event>, incoming: Vec<Event>) -> Vec<Event> {
    let mut seen: HashSet<EventKey> = existing.iter().map(Event::key).collect();
    existing.reserve(incoming.len());
    for event in incoming {
        if seen.insert(event.key()) {
            existing.push(event);
        }
    }
    existing
}
