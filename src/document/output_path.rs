//! Output path templates: dot-notation paths resolved against the walk.

use super::lookup::scalar_key;
use super::traversr::{Step, Traversr};
use crate::error::{SpecError, TransformError};
use crate::path::ast::{ArrayIndex, OutputElement};
use crate::path::matcher::{evaluate_index, evaluate_tokens};
use crate::path::parser::parse_output_path;
use crate::walk::WalkedPath;
use serde_json::Value;

/// A parsed right-hand side such as `photos[&1].url` or `&(1,2).&.value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPath {
    raw: String,
    elements: Vec<OutputElement>,
}

impl OutputPath {
    /// Parses a template. Wildcards, `@`, `$` and `#` are rejected here.
    pub fn parse(raw: &str) -> Result<Self, SpecError> {
        Ok(Self {
            raw: raw.to_string(),
            elements: parse_output_path(raw)?,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn elements(&self) -> &[OutputElement] {
        &self.elements
    }

    /// Resolves every element to a concrete step.
    ///
    /// `Ok(None)` means the path cannot be resolved for this input: a
    /// transpose found no scalar to use as a key, or an array reference did
    /// not name a non-negative integer no larger than `max_index`. Such
    /// writes are skipped.
    pub fn evaluate(
        &self,
        walked: &WalkedPath<'_>,
        max_index: usize,
    ) -> Result<Option<Vec<Step>>, TransformError> {
        let mut steps = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            let step = match element {
                OutputElement::Literal(text) => Step::Key(text.clone()),
                OutputElement::Amp(tokens) => Step::Key(evaluate_tokens(tokens, walked)?),
                OutputElement::Transpose(transpose) => {
                    match transpose.read(walked)?.and_then(scalar_key) {
                        Some(key) => Step::Key(key),
                        None => {
                            log::debug!(
                                "skipping write to '{}': {} does not resolve to a scalar",
                                self.raw,
                                transpose.canonical_form()
                            );
                            return Ok(None);
                        }
                    }
                }
                OutputElement::Array(ArrayIndex::AutoExpand) => Step::Append,
                OutputElement::Array(index) => {
                    let text = evaluate_index(index, walked)?.unwrap_or_default();
                    match text.parse::<usize>() {
                        Ok(position) if position <= max_index => Step::Index(position),
                        Ok(position) => {
                            log::debug!(
                                "skipping write to '{}': index {} is past the limit of {}",
                                self.raw,
                                position,
                                max_index
                            );
                            return Ok(None);
                        }
                        Err(_) => {
                            log::debug!(
                                "skipping write to '{}': '{}' is not an array index",
                                self.raw,
                                text
                            );
                            return Ok(None);
                        }
                    }
                }
            };
            steps.push(step);
        }
        Ok(Some(steps))
    }

    /// Evaluates the template and writes `data` there. Returns whether a
    /// write happened.
    pub fn write(
        &self,
        data: Value,
        output: &mut Value,
        walked: &WalkedPath<'_>,
        traversr: &Traversr,
    ) -> Result<bool, TransformError> {
        let Some(steps) = self.evaluate(walked, traversr.max_index())? else {
            return Ok(false);
        };
        log::trace!("writing to {:?}", steps);
        let written = traversr.write(output, &steps, data);
        if !written {
            log::debug!(
                "skipping write to '{}': output already holds a value of another kind",
                self.raw
            );
        }
        Ok(written)
    }
}
