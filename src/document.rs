//! Read-only view of the host's document.

/// Line-indexed access to a document owned by the host editor.
pub trait Document {
    fn line_count(&self) -> usize;

    /// Text of line `index`. Out-of-range indices yield an empty line.
    fn line(&self, index: usize) -> &str;

    fn lines(&self) -> DocumentLines<'_, Self> {
        DocumentLines {
            document: self,
            next: 0,
        }
    }
}

/// Iterator over `(index, text)` pairs of a [`Document`].
pub struct DocumentLines<'a, D: ?Sized> {
    document: &'a D,
    next: usize,
}

impl<'a, D: Document + ?Sized> Iterator for DocumentLines<'a, D> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.document.line_count() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some((index, self.document.line(index)))
    }
}

impl<S: AsRef<str>> Document for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> &str {
        self.get(index).map(AsRef::as_ref).unwrap_or("")
    }
}

impl<S: AsRef<str>> Document for Vec<S> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> &str {
        self.as_slice().line(index)
    }
}

/// Owned document text split into lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDocument {
    lines: Vec<String>,
}

impl TextDocument {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Document for TextDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> &str {
        self.lines.line(index)
    }
}

/// Cursor position; `character` counts chars, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// Width of `text` in character cells, the unit used for every column.
pub fn text_width(text: &str) -> usize {
    text.chars().count()
}
