//! Apply a batch of range replacements to a text / 批量范围替换
//!
//! Offsets of every change refer to the original text. The batch is spliced from
//! its last entry to its first, each entry using its unshifted offsets against the
//! current buffer (clamped to its length). A batch listed in ascending `start`
//! order is therefore applied rightmost first and never shifts a pending range.
//! Other orders are applied as given; overlapping entries can then clash.

use super::{Change, ChangeError};

/// Check every change against `len` (in chars). The first violation wins / 校验替换范围
pub fn validate_changes(changes: &[Change], len: usize) -> Result<(), ChangeError> {
    if changes.is_empty() {
        return Err(ChangeError::Empty);
    }
    for (index, change) in changes.iter().enumerate() {
        let (start, end) = (change.range.start, change.range.end);
        if start > end {
            return Err(ChangeError::StartAfterEnd { index, start, end });
        }
        if end > len {
            return Err(ChangeError::EndOutOfBounds { index, end, len });
        }
    }
    Ok(())
}

/// Validate and apply `changes` to `original`, returning the new text / 校验并应用替换
///
/// Nothing is applied when any change is invalid.
pub fn apply_changes(original: &str, changes: &[Change]) -> Result<String, ChangeError> {
    let mut buf: Vec<char> = original.chars().collect();
    validate_changes(changes, buf.len())?;

    for change in changes.iter().rev() {
        // earlier splices may have shortened the buffer already
        let start = change.range.start.min(buf.len());
        let end = change.range.end.min(buf.len());
        buf.splice(start..end, change.text.chars());
    }

    Ok(buf.into_iter().collect())
}
