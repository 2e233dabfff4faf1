/// Computes the UTF-8 byte range of the first occurrence of a substring.
///
/// Rich-text facets address the post body by byte offsets into its
/// UTF-8 encoding, not by character position, so any multi-byte
/// character in front of the match shifts the range. Returns the
/// half-open range `[start, end)`, or `None` when the substring is
/// absent (or empty) so the caller can omit the annotation rather than
/// emit wrong offsets.
pub fn compute_byte_offsets(full_text: &str, substring: &str) -> Option<(usize, usize)> {
    if substring.is_empty() {
        return None;
    }

    let start = full_text.find(substring)?;
    Some((start, start + substring.len()))
}
