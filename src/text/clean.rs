use std::sync::OnceLock;

use regex::Regex;

/// Matches HTML-like tags for removal. Deliberately generic: dataset
/// descriptions carry arbitrary markup and only the angle-bracket runs
/// need to go, not a full HTML parse.
fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("invalid tag pattern"))
}

/// Cleans metadata text for use in a post body.
///
/// Strips HTML-like tags, decodes HTML entities, normalizes
/// non-breaking spaces to ordinary spaces and trims surrounding
/// whitespace. Already-clean text passes through unchanged apart from
/// the trim.
pub fn clean_text(text: &str) -> String {
    let no_tags = tag_pattern().replace_all(text, "");
    let unescaped = html_escape::decode_html_entities(&no_tags);

    unescaped.replace('\u{00a0}', " ").trim().to_string()
}
