use super::config::Settings;
use super::normalize::DisplayValue;
use crate::document::{text_width, Document};
use serde::Serialize;

/// Fill used to right-align values. Hosts collapse regular spaces in
/// decorations, non-breaking ones survive.
pub const FILL: char = '\u{00A0}';

/// Displayable result of one line in a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineResult {
    pub line: usize,
    pub display: DisplayValue,
}

/// Trailing decoration for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub line: usize,
    pub text: String,
    /// Gap in character cells between the end of the line and `text`.
    pub margin: usize,
}

/// Layout shared by every annotation of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentPlan {
    pub target_column: usize,
    pub max_value_width: usize,
}

impl AlignmentPlan {
    /// Measure the whole document and every result of a finished pass.
    pub fn measure<D>(document: &D, results: &[Option<LineResult>], settings: &Settings) -> Self
    where
        D: Document + ?Sized,
    {
        let longest_line = document
            .lines()
            .map(|(_, text)| text_width(text))
            .max()
            .unwrap_or(0);

        let max_value_width = results
            .iter()
            .flatten()
            .map(|result| text_width(&result.display.value))
            .max()
            .unwrap_or(0);

        Self {
            target_column: settings.align_column.max(longest_line + settings.padding),
            max_value_width,
        }
    }

    pub fn annotate<D>(&self, document: &D, results: &[Option<LineResult>]) -> Vec<Annotation>
    where
        D: Document + ?Sized,
    {
        results
            .iter()
            .flatten()
            .filter_map(|result| self.annotation(document.line(result.line), result))
            .collect()
    }

    /// `None` when the line already runs past the target column.
    pub fn annotation(&self, line_text: &str, result: &LineResult) -> Option<Annotation> {
        let width = text_width(line_text);
        let Some(margin) = self.target_column.checked_sub(width) else {
            log::debug!(
                "line {} is {} wide, past column {}; annotation dropped",
                result.line,
                width,
                self.target_column
            );
            return None;
        };

        Some(Annotation {
            line: result.line,
            text: self.pad(&result.display),
            margin,
        })
    }

    fn pad(&self, display: &DisplayValue) -> String {
        let fill = self
            .max_value_width
            .saturating_sub(text_width(&display.value));
        let mut text = String::with_capacity(display.value.len() + display.unit.len() + fill * 2);
        text.extend(std::iter::repeat(FILL).take(fill));
        text.push_str(&display.value);
        text.push_str(&display.unit);
        text
    }
}
