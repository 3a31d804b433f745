use crate::document::Document;
use crate::eval::{evaluate_displayable, Evaluator, Scope};
use crate::parser::{split_assignment, Assignment, Line};

/// Replay assignment lines strictly above `boundary` into a fresh scope.
///
/// The right-hand side is the rest of the line, trailing `=` included.
/// Lines whose right-hand side fails to evaluate, or evaluates to something
/// that cannot be displayed, are skipped and bind nothing.
pub fn build_scope<E, D>(evaluator: &E, document: &D, boundary: usize) -> Scope<E::Value>
where
    E: Evaluator + ?Sized,
    D: Document + ?Sized,
{
    let mut scope = Scope::new();

    for (index, text) in document.lines().take(boundary) {
        let line = Line::new(index, text);
        if !line.is_candidate() {
            continue;
        }

        if let Some(assignment) = split_assignment(line.trimmed()) {
            if apply_assignment(evaluator, &assignment, &mut scope).is_none() {
                log::debug!("line {}: `{}` left unbound", index, assignment.name);
            }
        }
    }

    scope
}

/// Evaluate the right-hand side under `scope` and bind it on success.
pub(crate) fn apply_assignment<E>(
    evaluator: &E,
    assignment: &Assignment<'_>,
    scope: &mut Scope<E::Value>,
) -> Option<E::Value>
where
    E: Evaluator + ?Sized,
{
    let value = evaluate_displayable(evaluator, assignment.expression, scope)?;
    scope.bind(assignment.name, value.clone());
    Some(value)
}
