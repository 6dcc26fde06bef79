//! Error types for hydration utilities.

/// Node navigation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// The walk reached a node without an enclosing element.
    #[error("No path found from {start} to {finish}")]
    NoPathFound {
        /// Description of the start node.
        start: String,
        /// Description of the target node.
        finish: String,
    },

    /// The target shares a parent with the start node but does not follow it.
    #[error("{finish} is not a following sibling of {start}")]
    NotAFollowingSibling {
        /// Description of the start node.
        start: String,
        /// Description of the target node.
        finish: String,
    },
}

/// Compressed node location parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Location string has no reference node prefix.
    #[error("Node location {0:?} has no reference node")]
    MissingReference(String),

    /// Unknown navigation step character.
    #[error("Unknown navigation step {found:?} at offset {offset}")]
    UnknownStep {
        /// Offending character.
        found: char,
        /// Byte offset in the location string.
        offset: usize,
    },

    /// Numeric component does not fit.
    #[error("Number out of range at offset {0}")]
    NumberOutOfRange(usize),
}

/// `NghJSON` codec error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NghError {
    /// Structural character missing where the grammar requires it.
    #[error("Expecting {expected:?} at offset {offset} but got {} instead", describe_found(.found.as_ref()))]
    UnexpectedChar {
        /// Character the grammar requires.
        expected: char,
        /// Character actually found (`None` at end of input).
        found: Option<char>,
        /// Byte offset of the offending character.
        offset: usize,
    },

    /// Digit-only token too large for a number.
    #[error("Numeric token {0:?} is out of range")]
    NumberOutOfRange(String),

    /// Containers nested deeper than the parser accepts.
    #[error("Nesting exceeds {max} levels at offset {offset}", max = crate::ngh_json::MAX_DEPTH)]
    TooDeep {
        /// Byte offset of the opening bracket that crossed the limit.
        offset: usize,
    },

    /// Value kind with no `NghJSON` representation.
    #[error("Unsupported value: {0}")]
    Unsupported(String),
}

fn describe_found(found: Option<&char>) -> String {
    found.map_or_else(|| "end of input".to_owned(), |c| format!("{c:?}"))
}
