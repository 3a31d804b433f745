use super::scope::build_scope;
use crate::document::{Document, Position};
use crate::eval::{evaluate_displayable, Evaluator};
use crate::parser::split_assignment;
use serde::Serialize;

/// Character that triggers a completion request.
pub const TRIGGER_CHARACTER: char = '=';

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionItemKind {
    Value,
}

/// The single suggestion offered after a trailing `=`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionCandidate {
    /// Display label; identical to `insert_text`.
    pub label: String,
    pub insert_text: String,
    pub kind: CompletionItemKind,
    pub detail: String,
    pub documentation: String,
}

impl CompletionCandidate {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            documentation: format!("Evaluates to: {text}"),
            detail: "Math Result".to_string(),
            kind: CompletionItemKind::Value,
            insert_text: text.clone(),
            label: text,
        }
    }
}

/// Suggest the result of the expression left of a trailing `=`.
///
/// Only lines strictly above the cursor contribute variables. The text is
/// the evaluator's own formatting, without radix regrouping, behind one
/// leading space.
pub fn complete<E, D>(
    evaluator: &E,
    document: &D,
    position: Position,
    precision: usize,
) -> Option<CompletionCandidate>
where
    E: Evaluator + ?Sized,
    D: Document + ?Sized,
{
    if position.line >= document.line_count() {
        return None;
    }

    let text = document.line(position.line);
    let prefix = match text.char_indices().nth(position.character) {
        Some((byte, _)) => &text[..byte],
        None => text,
    };
    if !prefix.trim_end().ends_with(TRIGGER_CHARACTER) {
        return None;
    }

    let marker = prefix.rfind(TRIGGER_CHARACTER)?;
    let expression = prefix[..marker].trim();
    let expression = split_assignment(expression).map_or(expression, |a| a.expression);

    let scope = build_scope(evaluator, document, position.line);
    let value = evaluate_displayable(evaluator, expression, &scope)?;
    Some(CompletionCandidate::new(format!(
        " {}",
        evaluator.format(&value, precision)
    )))
}
