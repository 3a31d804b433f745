mod align;
mod completion;
mod config;
mod normalize;
mod orchestrator;
mod render;
mod scope;

pub use align::{AlignmentPlan, Annotation, LineResult, FILL};
pub use completion::{complete, CompletionCandidate, CompletionItemKind, TRIGGER_CHARACTER};
pub use config::{ConfigError, Settings, SETTINGS_SECTION};
pub use normalize::{normalize, normalize_value, regroup_radix, split_unit, DisplayValue};
pub use orchestrator::{evaluate_lines, recompute};
pub use render::{render_line, render_plain};
pub use scope::build_scope;

use crate::document::{Document, Position};
use crate::eval::{Evaluator, ExprEvaluator};
use serde::Serialize;

/// Host events that invalidate the current annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    DocumentChanged,
    ActiveEditorChanged,
    /// Keys of the settings that changed.
    ConfigurationChanged(Vec<String>),
}

/// A variable visible at some point of the document, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub value: String,
}

/// Entry point for a host: an evaluator plus the current settings.
///
/// Nothing is cached between calls; every request re-reads the document.
pub struct Scratchpad<E> {
    evaluator: E,
    settings: Settings,
}

impl<E: Evaluator> Scratchpad<E> {
    pub fn new(evaluator: E, settings: Settings) -> Self {
        Self {
            evaluator,
            settings,
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn recompute<D: Document + ?Sized>(&self, document: &D) -> Vec<Annotation> {
        recompute(&self.evaluator, document, &self.settings)
    }

    /// Route a host event. `None` means the current annotations still hold.
    pub fn handle<D: Document + ?Sized>(
        &self,
        trigger: &Trigger,
        document: &D,
    ) -> Option<Vec<Annotation>> {
        match trigger {
            Trigger::DocumentChanged | Trigger::ActiveEditorChanged => {
                Some(self.recompute(document))
            }
            Trigger::ConfigurationChanged(keys) if Settings::affected_by(keys.as_slice()) => {
                Some(self.recompute(document))
            }
            Trigger::ConfigurationChanged(keys) => {
                log::debug!("configuration change ignored: {:?}", keys);
                None
            }
        }
    }

    pub fn complete<D: Document + ?Sized>(
        &self,
        document: &D,
        position: Position,
    ) -> Option<CompletionCandidate> {
        complete(
            &self.evaluator,
            document,
            position,
            self.settings.precision(),
        )
    }

    /// Bindings visible above `boundary`, or after the last line.
    pub fn variables<D: Document + ?Sized>(
        &self,
        document: &D,
        boundary: Option<usize>,
    ) -> Vec<Variable> {
        let boundary = boundary.unwrap_or_else(|| document.line_count());
        build_scope(&self.evaluator, document, boundary)
            .iter()
            .map(|(name, value)| Variable {
                name: name.to_string(),
                value: self.evaluator.format(value, self.settings.precision()),
            })
            .collect()
    }
}

impl Default for Scratchpad<ExprEvaluator> {
    fn default() -> Self {
        Self::new(ExprEvaluator::new(), Settings::default())
    }
}
