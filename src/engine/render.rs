use super::align::{Annotation, FILL};
use crate::document::Document;
use std::collections::HashMap;

/// One line followed by its annotation, for terminals.
pub fn render_line(text: &str, annotation: Option<&Annotation>) -> String {
    let mut out = text.to_string();
    if let Some(annotation) = annotation {
        out.extend(std::iter::repeat(' ').take(annotation.margin));
        out.extend(annotation.text.chars().map(|c| if c == FILL { ' ' } else { c }));
    }
    out
}

/// The whole document with annotations painted in as plain text.
pub fn render_plain<D>(document: &D, annotations: &[Annotation]) -> String
where
    D: Document + ?Sized,
{
    let by_line: HashMap<usize, &Annotation> = annotations.iter().map(|a| (a.line, a)).collect();

    let mut out = String::new();
    for (index, text) in document.lines() {
        out.push_str(&render_line(text, by_line.get(&index).copied()));
        out.push('\n');
    }
    out
}
