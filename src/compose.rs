use rand::Rng;

use crate::bsky::post::Facet;
use crate::record::DatasetRecord;
use crate::text::clean::clean_text;
use crate::text::facet::compute_byte_offsets;
use crate::text::grapheme::{grapheme_len, truncate_to_grapheme_limit, ELLIPSIS};

/// Post length ceiling in grapheme clusters. Below the platform's 300
/// to leave room for the facets and link text.
pub const MAX_POST_GRAPHEMES: usize = 290;

/// Trailing label the link facet is attached to.
pub const LINK_LABEL: &str = "dataverse link";

/// Blank line between the post fields.
const SEPARATOR: &str = "\n\n";

/// Ceiling for the description snippet, in grapheme clusters.
const SNIPPET_GRAPHEMES: usize = 200;

/// A fully formatted post, ready for submission: the body text plus the
/// link facets pointing into its UTF-8 encoding. Built fresh per run
/// and discarded after submission.
#[derive(Debug, Clone)]
pub struct PostComposition {
    pub text: String,
    pub facets: Vec<Facet>,
}

/// Chooses one postable record uniformly at random.
///
/// Records lacking a title or persistent URL are filtered out first.
/// The random source is injected so selection stays testable.
pub fn choose_record<'a, R: Rng>(
    records: &'a [DatasetRecord],
    rng: &mut R,
) -> Option<&'a DatasetRecord> {
    let eligible: Vec<&DatasetRecord> = records.iter().filter(|r| r.is_postable()).collect();

    if eligible.is_empty() {
        return None;
    }

    Some(eligible[rng.gen_range(0..eligible.len())])
}

/// Builds the announcement post for a dataset.
///
/// Fixed-field composition: title (with an optional source-collection
/// suffix) and a description snippet, separated by a blank line, with
/// the link label as the final field. The grapheme budget for the label
/// and its separator is reserved before the variable-length part is
/// truncated, so the label always survives intact and the whole post
/// stays within [`MAX_POST_GRAPHEMES`].
///
/// The facet byte range is computed against the final text; if the
/// label cannot be located the facet is omitted rather than emitted
/// with wrong offsets.
pub fn compose_post(record: &DatasetRecord) -> PostComposition {
    let title = clean_text(&record.title);
    let description = clean_text(&record.description);
    let snippet = truncate_at_word_boundary(&description, SNIPPET_GRAPHEMES);

    let source_text = record
        .source_collection
        .as_deref()
        .map(clean_text)
        .filter(|source| !source.is_empty())
        .map(|source| format!(" (from {})", source))
        .unwrap_or_default();

    let mut body = format!("📊 {}{}", title, source_text);
    if !snippet.is_empty() {
        body.push_str(SEPARATOR);
        body.push_str(&snippet);
    }

    // Reserve graphemes for the link label and its separator
    let max_body = MAX_POST_GRAPHEMES - grapheme_len(LINK_LABEL) - grapheme_len(SEPARATOR);
    if grapheme_len(&body) > max_body {
        body = truncate_at_word_boundary(&body, max_body);
    }

    let text = format!("{}{}{}", body, SEPARATOR, LINK_LABEL);

    let facets = match compute_byte_offsets(&text, LINK_LABEL) {
        Some((start, end)) => vec![Facet::link(start, end, record.persistent_url.clone())],
        None => Vec::new(),
    };

    PostComposition { text, facets }
}

/// Truncates to the grapheme limit, backing off to the last whitespace
/// boundary when the cut lands mid-word, and terminating with an
/// ellipsis. Text within the limit is returned unchanged.
fn truncate_at_word_boundary(text: &str, limit: usize) -> String {
    if grapheme_len(text) <= limit {
        return text.to_string();
    }

    let truncated = truncate_to_grapheme_limit(text, limit);
    // Strip only the appended terminator; ellipses that were part of the
    // text itself stay.
    let trimmed = truncated.strip_suffix(ELLIPSIS).unwrap_or(&truncated);

    let mut result = match trimmed.rfind(' ') {
        Some(position) => trimmed[..position].trim_end().to_string(),
        None => trimmed.to_string(),
    };
    result.push(ELLIPSIS);

    result
}
