mod assignment;
mod classify;
mod types;

pub use assignment::split_assignment;
pub use classify::{classify_line, is_comment, strip_display_marker, COMMENT_MARKERS};
pub use types::{Assignment, Line, LineKind};
