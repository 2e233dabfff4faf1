use unicode_segmentation::UnicodeSegmentation;

/// Appended to truncated text, counted as one grapheme cluster.
pub const ELLIPSIS: char = '…';

/// Counts the user-perceived characters of a string.
///
/// Bluesky measures post length in extended grapheme clusters, so a
/// combining sequence or a multi-code-point emoji counts as one.
pub fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Truncates text to a maximum number of grapheme clusters.
///
/// Text within the limit is returned unchanged. Over-limit text is cut
/// to `limit - 1` clusters with an ellipsis appended, so the result
/// counts exactly `limit` clusters. A cluster is never split: either it
/// fits in front of the ellipsis or it is dropped entirely.
pub fn truncate_to_grapheme_limit(text: &str, limit: usize) -> String {
    if limit == 0 {
        return String::new();
    }

    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= limit {
        return text.to_string();
    }

    let mut truncated: String = graphemes[..limit - 1].concat();
    truncated.push(ELLIPSIS);
    truncated
}
