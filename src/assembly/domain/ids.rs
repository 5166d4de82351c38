//! Identifiers specific to assembly.

use crate::schedule::domain::backend_identifier;

backend_identifier!(
    /// Identifier of a reported assembly issue.
    IssueId,
    "issue"
);
