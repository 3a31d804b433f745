use super::align::{AlignmentPlan, Annotation, LineResult};
use super::config::Settings;
use super::normalize::normalize_value;
use super::scope::apply_assignment;
use crate::document::Document;
use crate::eval::{evaluate_displayable, Evaluator, Scope};
use crate::parser::{split_assignment, strip_display_marker, Line};

/// Full-document pass: one entry per line, `None` where nothing is shown.
///
/// Assignments bind into a single running scope as the walk goes, so each
/// line sees exactly the bindings made above it.
pub fn evaluate_lines<E, D>(evaluator: &E, document: &D, precision: usize) -> Vec<Option<LineResult>>
where
    E: Evaluator + ?Sized,
    D: Document + ?Sized,
{
    let mut scope = Scope::new();

    document
        .lines()
        .map(|(index, text)| {
            let line = Line::new(index, text);
            if !line.is_candidate() {
                return None;
            }
            let value = evaluate_line(evaluator, &line, &mut scope)?;
            let display = normalize_value(evaluator, &value, precision)?;
            Some(LineResult {
                line: index,
                display,
            })
        })
        .collect()
}

fn evaluate_line<E>(evaluator: &E, line: &Line<'_>, scope: &mut Scope<E::Value>) -> Option<E::Value>
where
    E: Evaluator + ?Sized,
{
    let expression = strip_display_marker(line.trimmed());
    let value = match split_assignment(expression) {
        Some(assignment) => apply_assignment(evaluator, &assignment, scope),
        None => evaluate_displayable(evaluator, expression, scope),
    };
    if value.is_none() {
        log::trace!("line {}: no result", line.index);
    }
    value
}

/// Evaluate, normalise and align the whole document.
pub fn recompute<E, D>(evaluator: &E, document: &D, settings: &Settings) -> Vec<Annotation>
where
    E: Evaluator + ?Sized,
    D: Document + ?Sized,
{
    if !settings.show_results {
        return Vec::new();
    }

    let results = evaluate_lines(evaluator, document, settings.precision());
    let plan = AlignmentPlan::measure(document, &results, settings);
    log::debug!(
        "{} lines, {} results, column {}, value width {}",
        document.line_count(),
        results.iter().flatten().count(),
        plan.target_column,
        plan.max_value_width
    );
    plan.annotate(document, &results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::stub::StubEvaluator;
    use pretty_assertions::assert_eq;

    fn values(results: &[Option<LineResult>]) -> Vec<Option<&str>> {
        results
            .iter()
            .map(|r| r.as_ref().map(|r| r.display.value.as_str()))
            .collect()
    }

    #[test]
    fn test_results_stay_index_aligned() {
        let doc = ["A = 2", "", "# note", "B = A + 3", "B", "junk", "B + 1 ="];
        let results = evaluate_lines(&StubEvaluator, &doc[..], 14);
        assert_eq!(
            values(&results),
            vec![Some("2"), None, None, Some("5"), Some("5"), None, Some("6")]
        );
    }

    #[test]
    fn test_assignment_lines_display_their_value() {
        let doc = ["x = 4 =", "x"];
        let results = evaluate_lines(&StubEvaluator, &doc[..], 14);
        assert_eq!(values(&results), vec![Some("4"), Some("4")]);
    }

    #[test]
    fn test_callables_and_empty_values_are_hidden() {
        let doc = ["fn", "f = fn", "f", "''"];
        let results = evaluate_lines(&StubEvaluator, &doc[..], 14);
        assert_eq!(values(&results), vec![None, None, None, Some("")]);
    }

    #[test]
    fn test_units_and_radix_are_normalised() {
        let doc = ["'3 kg'", "'\"0x1a2b\"'"];
        let results = evaluate_lines(&StubEvaluator, &doc[..], 14);
        let second = results[1].as_ref().unwrap();
        assert_eq!(second.display.value, "1A 2B");
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.display.unit, " kg");
    }

    #[test]
    fn test_hidden_results_produce_nothing() {
        let settings = Settings {
            show_results: false,
            ..Settings::default()
        };
        assert!(recompute(&StubEvaluator, &["1"][..], &settings).is_empty());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let doc = ["a = 1", "a + 10", "'2 m'", "bad"];
        let settings = Settings::default();
        let first = recompute(&StubEvaluator, &doc[..], &settings);
        let second = recompute(&StubEvaluator, &doc[..], &settings);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].text, "\u{a0}1");
        assert_eq!(first[2].text, "\u{a0}2 m");
    }
}
