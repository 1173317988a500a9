//! Label rules for things

/// Maximum number of characters in a label
pub const MAX_LABEL_LENGTH: usize = 8164;

/// Check a class, resource, predicate or list label
///
/// Labels are single-line and at most `max_length` characters long.
#[must_use]
pub fn is_valid_label(label: &str, max_length: usize) -> bool {
    !label.contains('\n') && label.chars().count() <= max_length
}

/// Check a literal label
///
/// Literal labels may span multiple lines.
#[must_use]
pub fn is_valid_literal_label(label: &str, max_length: usize) -> bool {
    label.chars().count() <= max_length
}
