//! Comma-segment editing of prompt text
//!
//! A prompt is a comma separated list of segments. Presence tests and
//! removals operate on whole trimmed segments, so `sky` never matches
//! inside `skyline`.

/// Separator written between segments.
pub const SEPARATOR: &str = ", ";

/// Trimmed, non-empty comma segments of `text`.
pub fn segments(text: &str) -> Vec<&str> {
    spans(text).into_iter().map(|(start, end)| &text[start..end]).collect()
}

/// Byte ranges of the trimmed, non-empty segments of `text`.
fn spans(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut offset = 0;
    for piece in text.split(',') {
        let trimmed = piece.trim();
        if !trimmed.is_empty() {
            let start = offset + (piece.len() - piece.trim_start().len());
            out.push((start, start + trimmed.len()));
        }
        offset += piece.len() + 1;
    }
    out
}

/// Start index of the first contiguous run of `needle` inside `haystack`.
fn find_run(haystack: &[&str], needle: &[&str]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Whether `value` occupies one or more full segments of `text`.
pub fn contains(text: &str, value: &str) -> bool {
    find_run(&segments(text), &segments(value)).is_some()
}

/// Remove the first occurrence of `value`'s segments from `text`.
///
/// Returns `None` when the value is not present. Text on either side of
/// the removed run is kept verbatim; the two sides are joined with
/// [`SEPARATOR`].
pub fn remove(text: &str, value: &str) -> Option<String> {
    let spans = spans(text);
    let parts: Vec<&str> = spans.iter().map(|&(s, e)| &text[s..e]).collect();
    let needle = segments(value);
    let first = find_run(&parts, &needle)?;
    let after = first + needle.len();

    let before = first.checked_sub(1).map(|i| &text[..spans[i].1]);
    let rest = spans.get(after).map(|&(start, _)| &text[start..]);

    Some(match (before, rest) {
        (Some(head), Some(tail)) => format!("{head}{SEPARATOR}{tail}"),
        (Some(head), None) => head.to_string(),
        (None, Some(tail)) => tail.to_string(),
        (None, None) => String::new(),
    })
}

/// Remove whatever is left of `value` in `text`.
///
/// The whole run is removed when it is still contiguous; otherwise each of
/// the value's segments is removed individually where present. Returns
/// `None` when none of them remain.
pub fn remove_remaining(text: &str, value: &str) -> Option<String> {
    if let Some(updated) = remove(text, value) {
        return Some(updated);
    }
    let mut current: Option<String> = None;
    for segment in segments(value) {
        let base = current.as_deref().unwrap_or(text);
        if let Some(updated) = remove(base, segment) {
            current = Some(updated);
        }
    }
    current
}

/// Append the segments of `value` that `text` does not hold yet.
///
/// Returns `None` when every segment is already present.
pub fn append_missing(text: &str, value: &str) -> Option<String> {
    let present = segments(text);
    let wanted = segments(value);
    let missing: Vec<&str> = wanted
        .iter()
        .copied()
        .filter(|segment| !present.contains(segment))
        .collect();
    if missing.is_empty() {
        None
    } else if missing.len() == wanted.len() {
        Some(append(text, value))
    } else {
        Some(append(text, &missing.join(SEPARATOR)))
    }
}

/// Append `value` to `text`, inserting a separator when needed.
///
/// The existing text is kept as-is. Only a dangling comma at the end is
/// completed with a single space.
pub fn append(text: &str, value: &str) -> String {
    let value = value.trim();
    let head = text.trim_end();
    if head.is_empty() {
        return value.to_string();
    }
    if head.ends_with(',') {
        format!("{head} {value}")
    } else {
        format!("{head}{SEPARATOR}{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn segments_skip_blanks() {
        assert_eq!(segments(" a ,, b,  "), vec!["a", "b"]);
        assert!(segments("").is_empty());
        assert!(segments(" , ,").is_empty());
    }

    #[test]
    fn contains_requires_whole_segment() {
        assert!(contains("sky, skyline", "sky"));
        assert!(contains("skyline,sky", "sky"));
        assert!(!contains("skyline", "sky"));
        assert!(!contains("blue sky", "sky"));
        assert!(!contains("anything", ""));
    }

    #[test]
    fn contains_multi_segment_value() {
        assert!(contains("a, b, c", "b, c"));
        assert!(!contains("a, b, c", "a, c"));
    }

    #[test]
    fn remove_leaves_longer_tags_alone() {
        assert_eq!(remove("sky, skyline", "sky").as_deref(), Some("skyline"));
        assert_eq!(remove("skyline", "sky"), None);
    }

    #[test]
    fn remove_never_leaves_stray_commas() {
        assert_eq!(remove("a, b, c", "a").as_deref(), Some("b, c"));
        assert_eq!(remove("a, b, c", "b").as_deref(), Some("a, c"));
        assert_eq!(remove("a, b, c", "c").as_deref(), Some("a, b"));
        assert_eq!(remove("a", "a").as_deref(), Some(""));
        assert_eq!(remove("a ,b,   c", "b").as_deref(), Some("a, c"));
        assert_eq!(remove("a, b,", "b").as_deref(), Some("a"));
        assert_eq!(remove(", a, b", "a").as_deref(), Some("b"));
    }

    #[test]
    fn remove_keeps_untouched_text_verbatim() {
        assert_eq!(remove("a,b, c", "c").as_deref(), Some("a,b"));
        assert_eq!(remove("(x:1.2),  y, z", "z").as_deref(), Some("(x:1.2),  y"));
    }

    #[test]
    fn remove_only_first_occurrence() {
        assert_eq!(remove("x, y, x", "x").as_deref(), Some("y, x"));
    }

    #[test]
    fn remove_remaining_falls_back_to_single_segments() {
        assert_eq!(remove_remaining("a, x, y", "x, y").as_deref(), Some("a"));
        assert_eq!(remove_remaining("y, a, x", "x, y").as_deref(), Some("a"));
        assert_eq!(remove_remaining("y", "x, y").as_deref(), Some(""));
        assert_eq!(remove_remaining("a", "x, y"), None);
    }

    #[test]
    fn append_missing_skips_present_segments() {
        assert_eq!(append_missing("", "x, y").as_deref(), Some("x, y"));
        assert_eq!(append_missing("y", "x, y").as_deref(), Some("y, x"));
        assert_eq!(append_missing("x, y", "x, y"), None);
        assert_eq!(append_missing("a,b", "c").as_deref(), Some("a,b, c"));
    }

    #[test]
    fn append_normalizes_separator() {
        assert_eq!(append("", "a"), "a");
        assert_eq!(append("   ", "a"), "a");
        assert_eq!(append("a", "b"), "a, b");
        assert_eq!(append("a  ", "b"), "a, b");
        assert_eq!(append("a,", "b"), "a, b");
        assert_eq!(append("a, ", "b"), "a, b");
    }

    #[test]
    fn append_keeps_existing_text() {
        assert_eq!(append("(masterpiece:1.2),best", "c"), "(masterpiece:1.2),best, c");
    }
}
