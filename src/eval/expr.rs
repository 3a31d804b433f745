use std::f64::consts;

use super::{EvalError, Evaluator, Scope, ValueKind};
use evalexpr::{
    eval_with_context, ContextWithMutableFunctions, ContextWithMutableVariables, EvalexprError,
    EvalexprResult, Function, HashMapContext, Value,
};

/// Default evaluator backed by `evalexpr`.
///
/// Decimal integer literals are read as reals, so `7 / 2` is `3.5`. On top
/// of the stock operators and builtins it understands the unqualified math
/// functions `sqrt`, `sin`, `cos`, `tan`, `ln`, `log`, `log10`, `exp` and
/// `abs`, the constants `pi` and `e`, and `hex(n)`, `bin(n)` and `oct(n)`,
/// which return radix literals as strings (`"0xff"`, `"0b101"`, `"0o17"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprEvaluator;

impl ExprEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn context(&self, scope: &Scope<Value>) -> EvalexprResult<HashMapContext> {
        let mut context = HashMapContext::new();
        for (name, value) in scope.iter() {
            context.set_value(name.to_string(), value.clone())?;
        }
        for (name, value) in CONSTANTS {
            if !scope.contains(name) {
                context.set_value(name.to_string(), Value::Float(*value))?;
            }
        }
        for (name, function) in REAL_FUNCTIONS {
            context.set_function(name.to_string(), real_function(*function))?;
        }
        context.set_function("log".to_string(), Function::new(logarithm))?;
        context.set_function("hex".to_string(), radix_function("0x", |n| format!("{n:x}")))?;
        context.set_function("bin".to_string(), radix_function("0b", |n| format!("{n:b}")))?;
        context.set_function("oct".to_string(), radix_function("0o", |n| format!("{n:o}")))?;
        Ok(context)
    }
}

impl Evaluator for ExprEvaluator {
    type Value = Value;

    fn evaluate(&self, expression: &str, scope: &Scope<Value>) -> Result<Value, EvalError> {
        let context = self
            .context(scope)
            .map_err(|err| EvalError::rejected(expression, err))?;
        eval_with_context(&promote_integer_literals(expression), &context)
            .map_err(|err| EvalError::rejected(expression, err))
    }

    fn kind(&self, value: &Value) -> ValueKind {
        match value {
            Value::Empty => ValueKind::Empty,
            _ => ValueKind::Displayable,
        }
    }

    fn format(&self, value: &Value, precision: usize) -> String {
        match value {
            Value::Int(n) if significant_digits(*n) > precision.clamp(1, 17) => {
                format_float(*n as f64, precision)
            }
            Value::Int(n) => n.to_string(),
            Value::Float(f) => format_float(*f, precision),
            Value::String(s) => format!("\"{s}\""),
            Value::Boolean(b) => b.to_string(),
            Value::Tuple(items) => {
                let inner: Vec<String> = items
                    .iter()
                    .map(|item| self.format(item, precision))
                    .collect();
                format!("[{}]", inner.join(", "))
            }
            Value::Empty => String::new(),
        }
    }
}

const CONSTANTS: &[(&str, f64)] = &[("pi", consts::PI), ("e", consts::E)];

const REAL_FUNCTIONS: &[(&str, fn(f64) -> f64)] = &[
    ("sqrt", f64::sqrt),
    ("sin", f64::sin),
    ("cos", f64::cos),
    ("tan", f64::tan),
    ("ln", f64::ln),
    ("log10", f64::log10),
    ("exp", f64::exp),
    ("abs", f64::abs),
];

fn real_function(function: fn(f64) -> f64) -> Function {
    Function::new(move |argument: &Value| Ok(Value::Float(function(argument.as_number()?))))
}

/// `log(x)` is the natural logarithm, `log(x, base)` takes an explicit base.
fn logarithm(argument: &Value) -> EvalexprResult<Value> {
    match argument {
        Value::Tuple(_) => {
            let pair = argument.as_fixed_len_tuple(2)?;
            Ok(Value::Float(pair[0].as_number()?.log(pair[1].as_number()?)))
        }
        _ => Ok(Value::Float(argument.as_number()?.ln())),
    }
}

fn significant_digits(n: i64) -> usize {
    n.unsigned_abs().checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// Rewrite bare decimal integer literals as float literals.
///
/// String literals, identifiers, exponents and prefixed literals such as
/// `0xFF` pass through untouched.
fn promote_integer_literals(expression: &str) -> String {
    let mut promoted = String::with_capacity(expression.len() + 8);
    let mut chars = expression.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            promoted.push(c);
            let mut escaped = false;
            for c in chars.by_ref() {
                promoted.push(c);
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => break,
                    _ => {}
                }
            }
            continue;
        }

        if !is_token_char(c) {
            promoted.push(c);
            continue;
        }

        let mut token = String::from(c);
        while let Some(&next) = chars.peek() {
            let signed_exponent = matches!(next, '+' | '-') && is_exponent_prefix(&token);
            if !is_token_char(next) && !signed_exponent {
                break;
            }
            token.push(next);
            chars.next();
        }
        promoted.push_str(&token);
        if token.bytes().all(|b| b.is_ascii_digit()) {
            promoted.push_str(".0");
        }
    }

    promoted
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// `1e` or `2.5E`, where a following sign belongs to the literal.
fn is_exponent_prefix(token: &str) -> bool {
    let Some(mantissa) = token.strip_suffix(['e', 'E']) else {
        return false;
    };
    mantissa.starts_with(|c: char| c.is_ascii_digit())
        && mantissa.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

fn radix_function(prefix: &'static str, digits: fn(u64) -> String) -> Function {
    Function::new(move |argument: &Value| {
        let n = integer_argument(argument)?;
        let sign = if n < 0 { "-" } else { "" };
        Ok(Value::String(format!(
            "{sign}{prefix}{}",
            digits(n.unsigned_abs())
        )))
    })
}

fn integer_argument(argument: &Value) -> EvalexprResult<i64> {
    match argument {
        Value::Int(n) => Ok(*n),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(*f as i64),
        other => Err(EvalexprError::expected_int(other.clone())),
    }
}

/// Format `value` to `precision` significant digits, trailing zeros trimmed.
///
/// Decimal exponents in `-3..15` print in plain notation, anything else as
/// `1.5e+20` / `2e-7`.
pub fn format_float(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = precision.clamp(1, 17);
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-3..15).contains(&exponent) {
        let rounded: f64 = scientific.parse().unwrap_or(value);
        return rounded.to_string();
    }

    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{}", exponent.abs())
}
