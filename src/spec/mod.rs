//! Spec trees: building them from spec documents and walking them against
//! input documents.
//!
//! A spec document is a JSON object whose keys are path elements and whose
//! values are either nested objects (composite nodes) or output paths
//! (leaf nodes):
//!
//! ```text
//! {
//!   "rating": {
//!     "primary": { "value": "Rating" },
//!     "*": { "value": "SecondaryRatings.&1.Value" }
//!   }
//! }
//! ```
//!
//! - `node`: [`SpecNode`], [`CompositeSpec`], [`LeafSpec`] and the
//!   precedence order for computed children
//! - `builder`: turns a spec document into a tree
//! - `apply`: the parallel walk

pub mod apply;
pub mod builder;
pub mod node;

pub use apply::{apply_root, ApplyContext};
pub use builder::{build_composite, build_root, check_explicit_indices};
pub use node::{compare_computed, CompositeSpec, LeafSpec, SpecNode};
