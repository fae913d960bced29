//! Line-ending normalization.

/// Convert `CRLF` and lone `CR` line endings to `LF`.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
