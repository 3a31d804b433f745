use super::types::LineKind;

/// Prefixes that turn a trimmed line into a comment.
pub const COMMENT_MARKERS: [&str; 2] = ["//", "#"];

/// Check if line is a comment
pub fn is_comment(line: &str) -> bool {
    let trimmed = line.trim();
    COMMENT_MARKERS
        .iter()
        .any(|marker| trimmed.starts_with(marker))
}

/// Blank, comment or expression candidate.
pub fn classify_line(line: &str) -> LineKind {
    if line.trim().is_empty() {
        LineKind::Blank
    } else if is_comment(line) {
        LineKind::Comment
    } else {
        LineKind::Candidate
    }
}

/// Drop one trailing `=` so `expr=` evaluates as `expr`.
pub fn strip_display_marker(text: &str) -> &str {
    text.strip_suffix('=').unwrap_or(text)
}
