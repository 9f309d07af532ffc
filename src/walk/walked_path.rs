//! The stack of matches along the current root-to-node walk.
//!
//! Every level of the parallel walk pushes one [`PathStep`] holding the
//! input data at that level and the [`MatchedElement`] that claimed it.
//! References such as `&(1,2)` index this stack from the end.

use super::matched::MatchedElement;
use crate::error::TransformError;
use crate::path::ast::Reference;
use serde_json::Value;
use std::ops::{Deref, DerefMut};

/// One frame of the walk.
#[derive(Debug, Clone)]
pub struct PathStep<'a> {
    data: Option<&'a Value>,
    matched: MatchedElement,
}

impl<'a> PathStep<'a> {
    /// The input data at this level, if any.
    pub fn data(&self) -> Option<&'a Value> {
        self.data
    }

    pub fn matched(&self) -> &MatchedElement {
        &self.matched
    }

    pub fn matched_mut(&mut self) -> &mut MatchedElement {
        &mut self.matched
    }
}

/// Append-at-the-tail stack of [`PathStep`]s.
#[derive(Debug, Default)]
pub struct WalkedPath<'a> {
    steps: Vec<PathStep<'a>>,
}

impl<'a> WalkedPath<'a> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn push(&mut self, data: Option<&'a Value>, matched: MatchedElement) {
        self.steps.push(PathStep { data, matched });
    }

    pub fn pop(&mut self) -> Option<PathStep<'a>> {
        self.steps.pop()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The frame `n` levels up from the current one; 0 is the current frame.
    pub fn element_from_end(&self, n: usize) -> Option<&PathStep<'a>> {
        let len = self.steps.len();
        if n >= len {
            return None;
        }
        self.steps.get(len - 1 - n)
    }

    pub fn last(&self) -> Option<&PathStep<'a>> {
        self.steps.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut PathStep<'a>> {
        self.steps.last_mut()
    }

    /// Like [`element_from_end`](Self::element_from_end), but an out-of-range
    /// level is an error.
    pub fn step(&self, n: usize, reference: &str) -> Result<&PathStep<'a>, TransformError> {
        self.element_from_end(n)
            .ok_or_else(|| TransformError::ReferenceDepth {
                reference: reference.to_string(),
                depth: n,
                available: self.steps.len(),
            })
    }

    /// Resolves a backreference to the captured text it names.
    pub fn resolve(&self, reference: &Reference) -> Result<&str, TransformError> {
        let name = reference.canonical_form();
        let matched = self.step(reference.depth, &name)?.matched();
        matched
            .sub_key(reference.group)
            .ok_or_else(|| TransformError::CaptureGroup {
                reference: name,
                group: reference.group,
                available: matched.capture_count(),
            })
    }

    /// Counts one more matched child under the current frame.
    pub fn increment_hash_count(&mut self) {
        if let Some(step) = self.steps.last_mut() {
            step.matched.increment_hash_count();
        }
    }

    /// Pushes a frame that is popped again when the returned guard drops,
    /// so an error in a subtree never leaves stale frames behind.
    pub fn descend<'w>(
        &'w mut self,
        data: Option<&'a Value>,
        matched: MatchedElement,
    ) -> Frame<'w, 'a> {
        self.push(data, matched);
        Frame { path: self }
    }
}

/// Scope guard returned by [`WalkedPath::descend`].
#[derive(Debug)]
pub struct Frame<'w, 'a> {
    path: &'w mut WalkedPath<'a>,
}

impl<'a> Deref for Frame<'_, 'a> {
    type Target = WalkedPath<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.path
    }
}

impl<'a> DerefMut for Frame<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.path
    }
}

impl Drop for Frame<'_, '_> {
    fn drop(&mut self) {
        self.path.pop();
    }
}
