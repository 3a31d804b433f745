//! Inline evaluation overlay for free-form scratch documents.
//!
//! Every non-blank, non-comment line is evaluated as an expression, with
//! `name = expression` lines feeding a running scope for the lines below.
//! Results come back as annotations aligned to a shared column so a host
//! editor can paint them after each line without touching the buffer.

pub mod document;
pub mod engine;
pub mod eval;
pub mod interactive;
pub mod parser;
pub mod server;

pub use document::{Document, Position, TextDocument};
pub use engine::{Annotation, CompletionCandidate, Scratchpad, Settings, Trigger};
pub use eval::{EvalError, Evaluator, ExprEvaluator, Scope, ValueKind};
