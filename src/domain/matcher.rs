//! Decides whether an existing child is the node a path segment refers to.

use crate::domain::attributes::Attributes;

/// Attribute comparison applied once names already match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Candidate attributes must equal the requested set, no extras.
    Exact,
    /// Requested attributes must be a subset of the candidate's.
    #[default]
    Partial,
}

impl MatchMode {
    /// Mode used for the last segment of a path: exact when attributes are requested.
    pub fn for_leaf(requested: &Attributes) -> Self {
        if requested.is_empty() {
            MatchMode::Partial
        } else {
            MatchMode::Exact
        }
    }

    pub fn matches(self, candidate: &Attributes, requested: &Attributes) -> bool {
        match self {
            MatchMode::Exact => candidate.same_set_as(requested),
            MatchMode::Partial => requested.is_subset_of(candidate),
        }
    }
}
