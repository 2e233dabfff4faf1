use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Resolver URL prefix rewritten into the native identifier scheme.
const DOI_RESOLVER_PREFIX: &str = "https://doi.org/";
const DOI_SCHEME: &str = "doi:";

// We differentiate between persistent identifiers and
// regular database identifiers here. This makes it easier to
// handle the two types of identifiers in the codebase
// without having to check for the presence of a persistent
// identifier every time we need to use an identifier.
//
// This way users can supply a general identifier without specifying
// whether it is a persistent identifier or not. The code will
// automatically determine the type of identifier and use it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum Identifier {
    PersistentId(String),
    Id(i64),
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::PersistentId(pid) => write!(f, "{}", pid),
        }
    }
}

/// Derives a persistent identifier from a resolver-style URL.
///
/// Dataverse content listings carry a `persistentUrl` in resolver form
/// (e.g. `https://doi.org/10.7910/DVN/ABC`). The native API addresses
/// datasets by the identifier scheme instead (`doi:10.7910/DVN/ABC`),
/// so the resolver prefix is rewritten. A URL without the prefix passes
/// through unchanged; an empty result means the dataset cannot be
/// addressed and is skipped by the caller.
pub fn persistent_id_from_url(persistent_url: &str) -> Option<Identifier> {
    let pid = persistent_url.replace(DOI_RESOLVER_PREFIX, DOI_SCHEME);

    if pid.is_empty() {
        return None;
    }

    Some(Identifier::PersistentId(pid))
}
