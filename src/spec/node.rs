//! Spec tree node types.

use crate::document::output_path::OutputPath;
use crate::path::ast::PathElement;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// A node of a built spec tree.
#[derive(Debug, Clone)]
pub enum SpecNode {
    Leaf(LeafSpec),
    Composite(CompositeSpec),
}

impl SpecNode {
    /// The element this node matches input keys with.
    pub fn path_element(&self) -> &PathElement {
        match self {
            SpecNode::Leaf(leaf) => &leaf.element,
            SpecNode::Composite(composite) => &composite.element,
        }
    }
}

/// A node whose value is one or more output paths.
#[derive(Debug, Clone)]
pub struct LeafSpec {
    pub(crate) element: PathElement,
    pub(crate) outputs: Vec<OutputPath>,
}

impl LeafSpec {
    pub fn new(element: PathElement, outputs: Vec<OutputPath>) -> Self {
        Self { element, outputs }
    }

    pub fn path_element(&self) -> &PathElement {
        &self.element
    }

    pub fn outputs(&self) -> &[OutputPath] {
        &self.outputs
    }
}

/// A node with children, partitioned into three buckets.
///
/// - literal children, looked up by exact key
/// - computed children (wildcards and references), tried in precedence order
/// - special children (`@`, `$`, `#`, transposes), fired for every match
#[derive(Debug, Clone)]
pub struct CompositeSpec {
    pub(crate) element: PathElement,
    pub(crate) literals: IndexMap<String, SpecNode>,
    pub(crate) computed: Vec<SpecNode>,
    pub(crate) special: Vec<SpecNode>,
}

impl CompositeSpec {
    pub fn path_element(&self) -> &PathElement {
        &self.element
    }

    pub fn literal_children(&self) -> &IndexMap<String, SpecNode> {
        &self.literals
    }

    /// Computed children, already sorted by [`compare_computed`].
    pub fn computed_children(&self) -> &[SpecNode] {
        &self.computed
    }

    pub fn special_children(&self) -> &[SpecNode] {
        &self.special
    }
}

/// Precedence order for computed siblings.
///
/// Reference keys come before wildcards; within a kind, longer canonical
/// forms come first so `rating-range-*` is tried before `rating-*`; equal
/// lengths fall back to alphabetical order.
pub fn compare_computed(a: &PathElement, b: &PathElement) -> Ordering {
    let rank_a = a.computed_rank().unwrap_or(u8::MAX);
    let rank_b = b.computed_rank().unwrap_or(u8::MAX);
    let form_a = a.canonical_form();
    let form_b = b.canonical_form();

    rank_a
        .cmp(&rank_b)
        .then_with(|| form_b.len().cmp(&form_a.len()))
        .then_with(|| form_a.cmp(&form_b))
}
