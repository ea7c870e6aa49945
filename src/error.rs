use thiserror::Error;

/// Errors reported by tree construction, insertion, and mining.
///
/// Fallible operations on [`crate::FpTree`] also record the message of the
/// error they return, retrievable afterwards through
/// [`crate::FpTree::last_error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FpError {
    /// A threshold outside `(0, 1]`, an unusable item ranking, or an invalid
    /// rule value.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A transaction referenced a label that is not in the item ranking.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// A transaction with no items.
    #[error("empty transaction")]
    EmptyInput,

    /// A read count would exceed its traversal count. The tree structure is
    /// corrupt; mining results are undefined until the tree is rebuilt.
    #[error("accounting violation: {0}")]
    AccountingViolation(String),

    /// Mining found no pattern meeting the minimum support.
    #[error("no patterns meet the minimum support threshold")]
    NoPatterns,

    /// A rule denominator was absent from the pattern store.
    #[error("incomplete data: {0}")]
    IncompleteData(String),
}
