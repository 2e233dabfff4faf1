//! A small toolkit for announcing Dataverse datasets on Bluesky.
//!
//! The crate has two halves: a harvester that enumerates the datasets
//! owned by a user (or a set of named collections) through the Dataverse
//! native API and saves them as JSON, and a composer that picks a random
//! saved dataset and publishes a length-bounded announcement post with a
//! rich-text link facet on Bluesky.

#![warn(unused_crate_dependencies)]

/// Client functionality for interacting with the Dataverse API
pub mod client;

/// Types for handling Dataverse identifiers
pub mod identifier;

/// Dataset records and the harvest output file format
pub mod record;

/// Types for making requests to the Dataverse and XRPC APIs
pub mod request;

/// Types for handling responses from the Dataverse API
pub mod response;

/// Post composition: eligibility, random selection and formatting
pub mod compose;

/// Dataset harvesting functionality
pub mod harvest {
    pub use run::harvest;

    /// Collection content listing
    pub mod contents;
    /// Dataset detail retrieval and citation metadata extraction
    pub mod detail;
    /// Harvest orchestration
    pub mod run;
    /// Authenticated user resolution
    pub mod user;
}

/// Grapheme-aware text handling for post bodies
pub mod text {
    pub use clean::clean_text;
    pub use facet::compute_byte_offsets;
    pub use grapheme::{grapheme_len, truncate_to_grapheme_limit};

    /// HTML tag stripping and entity decoding
    pub mod clean;
    /// UTF-8 byte offsets for rich-text facets
    pub mod facet;
    /// Grapheme cluster counting and truncation
    pub mod grapheme;
}

/// Bluesky (AT Protocol) publishing functionality
pub mod bsky {
    pub use post::send_post;
    pub use session::create_session;

    /// Post records and link facets
    pub mod post;
    /// Session creation (login)
    pub mod session;
}

/// Commonly used types and functions
pub mod prelude {
    pub use super::client::BaseClient;
    pub use super::compose::{choose_record, compose_post, PostComposition};
    pub use super::harvest::run::{harvest, HarvestOptions};
    pub use super::identifier::Identifier;
    pub use super::record::{DatasetRecord, HarvestOutput};
}

/// Command-line interface functionality
pub mod cli {
    /// Base CLI functionality
    pub mod base;
    /// Harvest command
    pub mod harvest;
    /// Post command
    pub mod post;
}
