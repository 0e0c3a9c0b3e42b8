//! Forward-only literal marker scanning
//!
//! The checklist extractor never builds a document tree. Instead it threads
//! an explicit byte cursor through these three pure functions, each of which
//! searches for a literal marker at or after the cursor and optionally refuses
//! matches that would end beyond an upper bound.
//!
//! Bounds are how sibling sections are kept apart: a scan limited to one
//! species sub-list can never pick up a marker that belongs to the next one.
//!
//! All positions are byte offsets into the scanned text. `None` as a bound
//! means "end of text".

/// Find `marker` at or after `from`
///
/// Returns the byte offset of the first match, or `None` if the marker is
/// absent or the match would end beyond `bound`.
pub fn find_marker(text: &str, marker: &str, from: usize, bound: Option<usize>) -> Option<usize> {
    let limit = bound.unwrap_or(text.len()).min(text.len());
    if from > limit {
        return None;
    }

    let window = text.get(from..limit)?;
    window.find(marker).map(|offset| from + offset)
}

/// Extract the text strictly between `start_marker` and `end_marker`
///
/// `start_marker` is located at or after `from`; `end_marker` is located at or
/// after the end of `start_marker`. Both must end within `bound`.
///
/// # Returns
///
/// The enclosed text and the new cursor position just past `end_marker`.
pub fn extract_between<'a>(
    text: &'a str,
    start_marker: &str,
    end_marker: &str,
    from: usize,
    bound: Option<usize>,
) -> Option<(&'a str, usize)> {
    let token_start = advance_past(text, start_marker, from, bound)?;
    let token_end = find_marker(text, end_marker, token_start, bound)?;
    Some((&text[token_start..token_end], token_end + end_marker.len()))
}

/// Move the cursor to just past the next occurrence of `marker`
///
/// Used to skip structural markers without capturing any text.
pub fn advance_past(text: &str, marker: &str, from: usize, bound: Option<usize>) -> Option<usize> {
    find_marker(text, marker, from, bound).map(|position| position + marker.len())
}
