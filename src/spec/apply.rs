//! The parallel walk of a spec tree and an input document.
//!
//! At each level a node first matches its own element against the input
//! key. On success it pushes a frame onto the [`WalkedPath`], fires its
//! special children, and then hands every key of the input value to the
//! single child that claims it: an exact literal if one exists, otherwise
//! the first computed child, in precedence order, that matches.

use super::node::{CompositeSpec, LeafSpec, SpecNode};
use crate::document::lookup::scalar_key;
use crate::document::traversr::Traversr;
use crate::error::TransformError;
use crate::path::ast::PathElement;
use crate::walk::{MatchedElement, WalkedPath};
use serde_json::Value;

/// Per-invocation settings for a walk.
#[derive(Debug, Clone, Copy)]
pub struct ApplyContext {
    pub max_depth: usize,
    pub traversr: Traversr,
}

impl SpecNode {
    /// Applies this node to one input key and its value.
    ///
    /// Returns `Ok(false)` if the node does not claim `key`. `data` is `None`
    /// when the key was synthesized from a scalar value; plain leaves then
    /// have nothing to write.
    pub fn apply<'a>(
        &self,
        key: &str,
        data: Option<&'a Value>,
        walked: &mut WalkedPath<'a>,
        output: &mut Value,
        ctx: &ApplyContext,
    ) -> Result<bool, TransformError> {
        match self {
            SpecNode::Leaf(leaf) => leaf.apply(key, data, walked, output, ctx),
            SpecNode::Composite(composite) => composite.apply(key, data, walked, output, ctx),
        }
    }
}

fn check_depth(walked: &WalkedPath<'_>, ctx: &ApplyContext) -> Result<(), TransformError> {
    if walked.len() >= ctx.max_depth {
        return Err(TransformError::DepthExceeded {
            limit: ctx.max_depth,
        });
    }
    Ok(())
}

impl LeafSpec {
    pub fn apply<'a>(
        &self,
        key: &str,
        data: Option<&'a Value>,
        walked: &mut WalkedPath<'a>,
        output: &mut Value,
        ctx: &ApplyContext,
    ) -> Result<bool, TransformError> {
        let Some(matched) = self.element.match_key(key, walked)? else {
            return Ok(false);
        };

        // Special leaves compute their data from the walk before this
        // level's frame is pushed.
        let value = match &self.element {
            PathElement::Dollar(reference) => {
                Some(Value::String(walked.resolve(reference)?.to_string()))
            }
            PathElement::Hash(text) => Some(Value::String(text.clone())),
            PathElement::Transpose(transpose) => match transpose.read(walked)? {
                Some(found) => Some(found.clone()),
                None => return Ok(false),
            },
            _ => data.cloned(),
        };

        check_depth(walked, ctx)?;
        let frame = walked.descend(data, matched);
        log::trace!("leaf '{}' matched '{}'", self.element, key);

        if let Some(value) = value {
            for output_path in &self.outputs {
                output_path.write(value.clone(), output, &frame, &ctx.traversr)?;
            }
        }
        Ok(true)
    }
}

impl CompositeSpec {
    pub fn apply<'a>(
        &self,
        key: &str,
        data: Option<&'a Value>,
        walked: &mut WalkedPath<'a>,
        output: &mut Value,
        ctx: &ApplyContext,
    ) -> Result<bool, TransformError> {
        let Some(mut matched) = self.element.match_key(key, walked)? else {
            return Ok(false);
        };

        // A transpose composite walks the value it reads instead of `data`.
        let data = match &self.element {
            PathElement::Transpose(transpose) => match transpose.read(walked)? {
                Some(found) => Some(found),
                None => return Ok(false),
            },
            _ => data,
        };

        if let Some(Value::Array(items)) = data {
            matched = matched.with_orig_size(items.len());
        }

        check_depth(walked, ctx)?;
        let mut frame = walked.descend(data, matched);
        log::trace!("composite '{}' matched '{}'", self.element, key);

        for child in &self.special {
            child.apply(key, data, &mut frame, output, ctx)?;
        }

        match data {
            Some(Value::Object(map)) => {
                for (child_key, child_value) in map {
                    self.dispatch(child_key, Some(child_value), &mut frame, output, ctx)?;
                }
            }
            Some(Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    self.dispatch(&index.to_string(), Some(item), &mut frame, output, ctx)?;
                }
            }
            Some(scalar) => {
                if let Some(synthesized) = scalar_key(scalar) {
                    self.dispatch(&synthesized, None, &mut frame, output, ctx)?;
                }
            }
            None => {}
        }

        Ok(true)
    }

    /// Hands one input key to the child that claims it, if any.
    fn dispatch<'a>(
        &self,
        key: &str,
        data: Option<&'a Value>,
        walked: &mut WalkedPath<'a>,
        output: &mut Value,
        ctx: &ApplyContext,
    ) -> Result<bool, TransformError> {
        let claimed = match self.literals.get(key) {
            Some(child) => child.apply(key, data, walked, output, ctx)?,
            None => {
                let mut claimed = false;
                for child in &self.computed {
                    if child.apply(key, data, walked, output, ctx)? {
                        claimed = true;
                        break;
                    }
                }
                claimed
            }
        };

        if claimed {
            walked.increment_hash_count();
        }
        Ok(claimed)
    }
}

/// Runs a root composite over `input` the way a fresh transform does: the
/// walk starts with a frame for the root key holding the whole input.
pub fn apply_root(
    root: &CompositeSpec,
    root_key: &str,
    input: &Value,
    ctx: &ApplyContext,
) -> Result<Value, TransformError> {
    let mut output = Value::Null;
    let mut walked = WalkedPath::new();
    walked.push(Some(input), MatchedElement::new(root_key));
    root.apply(root_key, Some(input), &mut walked, &mut output, ctx)?;
    Ok(output)
}
