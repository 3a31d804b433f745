//! Deterministic evaluator for engine tests.
//!
//! Understands integer literals, identifiers and `+` between them. `'…'`
//! returns its contents verbatim as pre-formatted text, `fn` yields a
//! callable and an empty expression yields an empty value.

use super::{EvalError, Evaluator, Scope, ValueKind};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StubValue {
    Number(i64),
    Text(String),
    Callable,
    Empty,
}

#[derive(Debug, Default)]
pub(crate) struct StubEvaluator;

impl Evaluator for StubEvaluator {
    type Value = StubValue;

    fn evaluate(&self, expression: &str, scope: &Scope<StubValue>) -> Result<StubValue, EvalError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Ok(StubValue::Empty);
        }
        if expression == "fn" {
            return Ok(StubValue::Callable);
        }
        if let Some(text) = expression
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            return Ok(StubValue::Text(text.to_string()));
        }

        let mut total = 0i64;
        for term in expression.split('+').map(str::trim) {
            let n = match term.parse::<i64>() {
                Ok(n) => n,
                Err(_) => match scope.get(term) {
                    Some(StubValue::Number(n)) => *n,
                    _ => return Err(EvalError::rejected(expression, "unknown term")),
                },
            };
            total += n;
        }
        Ok(StubValue::Number(total))
    }

    fn kind(&self, value: &StubValue) -> ValueKind {
        match value {
            StubValue::Callable => ValueKind::Callable,
            StubValue::Empty => ValueKind::Empty,
            _ => ValueKind::Displayable,
        }
    }

    fn format(&self, value: &StubValue, _precision: usize) -> String {
        match value {
            StubValue::Number(n) => n.to_string(),
            StubValue::Text(text) => text.clone(),
            StubValue::Callable => "fn".to_string(),
            StubValue::Empty => String::new(),
        }
    }
}
