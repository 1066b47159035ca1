//! Catalog validation policy types.

use serde::{Deserialize, Serialize};

/// How to handle field values that fall outside the catalog.
///
/// The catalog lists the codes a client form can submit. Checking requests
/// against it happens ahead of feature assembly; this policy controls what
/// happens when a supplied code is not listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogPolicy {
    /// Do not consult the catalog at all.
    ///
    /// This is the default: the model receives whatever numeric codes the
    /// caller sent.
    #[default]
    Ignore,

    /// Log a warning and score the request anyway.
    Warn,

    /// Return a `BadRequest` error naming the field.
    Reject,
}
