use crate::document::text_width;

/// How a single line takes part in an evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Candidate,
}

/// One document line as seen by a single pass. Never kept across passes.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    pub index: usize,
    pub text: &'a str,
    pub kind: LineKind,
}

impl<'a> Line<'a> {
    pub fn new(index: usize, text: &'a str) -> Self {
        Self {
            index,
            text,
            kind: super::classify_line(text),
        }
    }

    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }

    /// Source length in character cells, untrimmed.
    pub fn width(&self) -> usize {
        text_width(self.text)
    }

    pub fn is_candidate(&self) -> bool {
        self.kind == LineKind::Candidate
    }
}

/// `name = expression` split of a candidate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub name: &'a str,
    pub expression: &'a str,
}
