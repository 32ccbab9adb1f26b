use std::collections::HashSet;

use super::model::Record;

/// Where deduplication runs relative to sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupeOrder {
    /// Keep duplicates.
    Never,
    /// First-loaded duplicate survives.
    BeforeSort,
    /// Highest-ranked duplicate survives.
    #[default]
    AfterSort,
}

/// Identity key of a title: one trailing whitespace + single digit is an
/// artifact of the synthetic catalog and is dropped, so `"Dune 2"` and
/// `"Dune"` collide. Case and inner whitespace are kept as-is.
pub fn dedupe_key(title: &str) -> &str {
    let mut tail = title.char_indices().rev();
    match (tail.next(), tail.next()) {
        (Some((_, digit)), Some((at, space))) if digit.is_ascii_digit() && space.is_whitespace() => {
            &title[..at]
        }
        _ => title,
    }
}

/// Keep only the first record of every [`dedupe_key`], in current order.
pub fn dedupe<R: Record>(records: &[R]) -> Vec<R> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    let kept: Vec<R> = records
        .iter()
        .filter(|r| seen.insert(dedupe_key(r.title())))
        .cloned()
        .collect();
    log::debug!("dedupe dropped {} of {} records", records.len() - kept.len(), records.len());
    kept
}
