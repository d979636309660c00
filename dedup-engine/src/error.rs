use shared_types::RecordKind;

/// Errors raised at the edges of the engine.
///
/// Malformed or empty record data never produces an error; it only ever
/// degrades to "no match".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DedupError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot merge a {secondary} into a {primary}")]
    KindMismatch {
        primary: RecordKind,
        secondary: RecordKind,
    },
}
