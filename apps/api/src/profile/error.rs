use thiserror::Error;

/// Failures the normalization engine surfaces to its caller.
///
/// Field- and row-level problems never appear here; they are absorbed into
/// defaults or into the original record.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("document could not be decoded as JSON under any of: {attempted}")]
    UnreadableDocument { attempted: String },

    #[error("flat form has {found} slots, expected {expected}")]
    FlatLength { expected: usize, found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
