use std::collections::HashSet;

/// Deduplicated union of flag lists, in first-seen order.
///
/// Labels compare exactly: case-sensitive, no trimming.
pub fn union_flags<'a, I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut seen: HashSet<&'a str> = HashSet::new();
    let mut union = Vec::new();
    for list in lists {
        for label in list {
            if seen.insert(label.as_str()) {
                union.push(label.clone());
            }
        }
    }
    union
}

/// Merge `incoming` into `existing`, deduplicating the result.
/// Existing labels keep their positions; new ones are appended.
pub fn merge_unique(existing: &mut Vec<String>, incoming: &[String]) {
    let merged = union_flags([existing.as_slice(), incoming]);
    *existing = merged;
}

/// Commit text still sitting in a manual-flag input buffer.
///
/// The trimmed text is appended once and the buffer is cleared, so calling
/// this again is a no-op. Returns whether a label was added.
pub fn commit_pending(list: &mut Vec<String>, pending: &mut String) -> bool {
    let label = pending.trim();
    let added = !label.is_empty();
    if added {
        list.push(label.to_string());
    }
    pending.clear();
    added
}
