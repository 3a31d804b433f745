//! The expression evaluator is a black box behind [`Evaluator`]; the engine
//! only ever sees opaque values, their kind, and their formatted text.

mod expr;
mod scope;
#[cfg(test)]
pub(crate) mod stub;

pub use expr::{format_float, ExprEvaluator};
pub use scope::Scope;

use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("cannot evaluate `{expression}`: {message}")]
    Rejected { expression: String, message: String },
}

impl EvalError {
    pub fn rejected(expression: &str, message: impl ToString) -> Self {
        EvalError::Rejected {
            expression: expression.to_string(),
            message: message.to_string(),
        }
    }
}

/// Whether a value may be shown or bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Displayable,
    Callable,
    Empty,
}

pub trait Evaluator {
    type Value: Clone;

    fn evaluate(&self, expression: &str, scope: &Scope<Self::Value>)
        -> Result<Self::Value, EvalError>;

    fn kind(&self, value: &Self::Value) -> ValueKind;

    /// Evaluator-native text for `value` at `precision` significant digits.
    fn format(&self, value: &Self::Value, precision: usize) -> String;

    fn is_displayable(&self, value: &Self::Value) -> bool {
        self.kind(value) == ValueKind::Displayable
    }
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    type Value = E::Value;

    fn evaluate(
        &self,
        expression: &str,
        scope: &Scope<Self::Value>,
    ) -> Result<Self::Value, EvalError> {
        (**self).evaluate(expression, scope)
    }

    fn kind(&self, value: &Self::Value) -> ValueKind {
        (**self).kind(value)
    }

    fn format(&self, value: &Self::Value, precision: usize) -> String {
        (**self).format(value, precision)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Arc<E> {
    type Value = E::Value;

    fn evaluate(
        &self,
        expression: &str,
        scope: &Scope<Self::Value>,
    ) -> Result<Self::Value, EvalError> {
        (**self).evaluate(expression, scope)
    }

    fn kind(&self, value: &Self::Value) -> ValueKind {
        (**self).kind(value)
    }

    fn format(&self, value: &Self::Value, precision: usize) -> String {
        (**self).format(value, precision)
    }
}

/// Evaluate and keep the value only when it can be displayed.
///
/// Failures and non-displayable results both come back as `None`; the
/// evaluator's message is only logged.
pub fn evaluate_displayable<E: Evaluator + ?Sized>(
    evaluator: &E,
    expression: &str,
    scope: &Scope<E::Value>,
) -> Option<E::Value> {
    match evaluator.evaluate(expression, scope) {
        Ok(value) if evaluator.is_displayable(&value) => Some(value),
        Ok(value) => {
            log::trace!(
                "`{}` produced a {:?} value, nothing to show",
                expression,
                evaluator.kind(&value)
            );
            None
        }
        Err(err) => {
            log::trace!("{}", err);
            None
        }
    }
}
