//! Building spec trees from spec documents.

use super::node::{compare_computed, CompositeSpec, LeafSpec, SpecNode};
use crate::document::output_path::OutputPath;
use crate::error::SpecError;
use crate::path::ast::{ArrayIndex, OutputElement, PathElement};
use crate::path::parser::{parse_key, split_alternatives};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Builds the root composite for a spec document.
///
/// The root is keyed `root_key` and matches exactly that key.
pub fn build_root(root_key: &str, spec: &Value) -> Result<CompositeSpec, SpecError> {
    let map = spec.as_object().ok_or(SpecError::NotAnObject)?;
    let root = build_composite(root_key, PathElement::Literal(root_key.to_string()), map)?;
    log::debug!(
        "built spec tree: {} literal, {} computed, {} special top-level keys",
        root.literals.len(),
        root.computed.len(),
        root.special.len()
    );
    Ok(root)
}

/// Builds a composite node from the object under `raw_key`.
pub fn build_composite(
    raw_key: &str,
    element: PathElement,
    spec: &Map<String, Value>,
) -> Result<CompositeSpec, SpecError> {
    if spec.is_empty() {
        return Err(SpecError::EmptyComposite {
            key: raw_key.to_string(),
        });
    }

    let mut literals = IndexMap::new();
    let mut computed = Vec::new();
    let mut special = Vec::new();
    let mut seen: HashMap<String, String> = HashMap::new();

    for (key, value) in spec {
        for alternative in split_alternatives(key) {
            let child_element = parse_key(&alternative)?;
            let canonical = child_element.canonical_form();
            if seen.insert(canonical.clone(), alternative.clone()).is_some() {
                return Err(SpecError::DuplicateKey {
                    key: alternative,
                    canonical,
                });
            }

            let literal_key = match &child_element {
                PathElement::Literal(text) => Some(text.clone()),
                _ => None,
            };
            let is_special = child_element.is_special();

            let child = build_node(&alternative, child_element, value)?;
            if let Some(text) = literal_key {
                literals.insert(text, child);
            } else if is_special {
                special.push(child);
            } else {
                computed.push(child);
            }
        }
    }

    computed.sort_by(|a: &SpecNode, b: &SpecNode| {
        compare_computed(a.path_element(), b.path_element())
    });

    Ok(CompositeSpec {
        element,
        literals,
        computed,
        special,
    })
}

/// Rejects output paths whose literal `[n]` positions exceed `max_index`.
pub fn check_explicit_indices(spec: &CompositeSpec, max_index: usize) -> Result<(), SpecError> {
    let children = spec
        .literals
        .values()
        .chain(&spec.computed)
        .chain(&spec.special);
    for child in children {
        match child {
            SpecNode::Composite(composite) => check_explicit_indices(composite, max_index)?,
            SpecNode::Leaf(leaf) => {
                for output in &leaf.outputs {
                    let too_large = output.elements().iter().any(|element| {
                        matches!(
                            element,
                            OutputElement::Array(ArrayIndex::Explicit(n)) if *n > max_index
                        )
                    });
                    if too_large {
                        return Err(SpecError::InvalidArray {
                            key: output.raw().to_string(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Builds a leaf or composite node depending on the shape of `value`.
fn build_node(raw_key: &str, element: PathElement, value: &Value) -> Result<SpecNode, SpecError> {
    if matches!(element, PathElement::Array(_)) {
        return Err(SpecError::IllegalMatchElement {
            key: raw_key.to_string(),
        });
    }

    match value {
        Value::Object(children) => {
            if !element.can_have_children() {
                return Err(SpecError::IllegalChildren {
                    key: raw_key.to_string(),
                });
            }
            Ok(SpecNode::Composite(build_composite(raw_key, element, children)?))
        }
        Value::String(path) => Ok(SpecNode::Leaf(LeafSpec::new(
            element,
            vec![OutputPath::parse(path)?],
        ))),
        Value::Array(paths) if !paths.is_empty() => {
            let outputs = paths
                .iter()
                .map(|path| match path {
                    Value::String(path) => OutputPath::parse(path),
                    _ => Err(SpecError::InvalidLeafValue {
                        key: raw_key.to_string(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SpecNode::Leaf(LeafSpec::new(element, outputs)))
        }
        _ => Err(SpecError::InvalidLeafValue {
            key: raw_key.to_string(),
        }),
    }
}
