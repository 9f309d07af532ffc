//! The shift transform: build a spec tree once, apply it to many inputs.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use shiftquill::shiftr::Shiftr;
//!
//! let shiftr = Shiftr::new(&json!({
//!     "rating": {
//!         "primary": { "value": "Rating" },
//!         "*": { "value": "SecondaryRatings.&1.Value" }
//!     }
//! }))
//! .unwrap();
//!
//! let output = shiftr
//!     .transform(&json!({
//!         "rating": {
//!             "primary": { "value": 3 },
//!             "quality": { "value": 4 }
//!         }
//!     }))
//!     .unwrap();
//!
//! assert_eq!(
//!     output,
//!     json!({ "Rating": 3, "SecondaryRatings": { "quality": { "Value": 4 } } })
//! );
//! ```

use crate::config::Config;
use crate::document::traversr::{Traversr, WriteDiscipline, DEFAULT_MAX_INDEX};
use crate::error::{SpecError, TransformError};
use crate::spec::{apply_root, build_root, check_explicit_indices, ApplyContext, CompositeSpec};
use serde_json::Value;

/// Key of the implicit root level of every walk.
pub const ROOT_KEY: &str = "root";

/// Default ceiling on walk depth.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// A built shift spec.
///
/// The spec tree is read-only once built, so one `Shiftr` can serve many
/// concurrent transforms.
#[derive(Debug, Clone)]
pub struct Shiftr {
    root: CompositeSpec,
    max_depth: usize,
    max_array_index: usize,
}

impl Shiftr {
    /// Builds a spec tree from a spec document.
    pub fn new(spec: &Value) -> Result<Self, SpecError> {
        Self::with_max_depth(spec, DEFAULT_MAX_DEPTH)
    }

    /// Builds a spec tree with a custom walk depth ceiling.
    pub fn with_max_depth(spec: &Value, max_depth: usize) -> Result<Self, SpecError> {
        Self::with_limits(spec, max_depth, DEFAULT_MAX_INDEX)
    }

    /// Builds a spec tree with custom walk depth and array position ceilings.
    ///
    /// Literal `[n]` positions above `max_array_index` are rejected here;
    /// positions taken from input keys above it are skipped at transform time.
    pub fn with_limits(
        spec: &Value,
        max_depth: usize,
        max_array_index: usize,
    ) -> Result<Self, SpecError> {
        let root = build_root(ROOT_KEY, spec)?;
        check_explicit_indices(&root, max_array_index)?;
        Ok(Self {
            root,
            max_depth,
            max_array_index,
        })
    }

    /// Builds a spec tree using the limits from `config`.
    pub fn from_config(spec: &Value, config: &Config) -> Result<Self, SpecError> {
        Self::with_limits(spec, config.max_depth, config.max_array_index)
    }

    pub fn root_spec(&self) -> &CompositeSpec {
        &self.root
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_array_index(&self) -> usize {
        self.max_array_index
    }

    /// Applies the spec to `input`, returning the new document.
    ///
    /// Returns `Value::Null` when nothing in the input matched.
    pub fn transform(&self, input: &Value) -> Result<Value, TransformError> {
        let ctx = ApplyContext {
            max_depth: self.max_depth,
            traversr: Traversr::new(WriteDiscipline::Shift)
                .with_max_index(self.max_array_index),
        };
        apply_root(&self.root, ROOT_KEY, input, &ctx)
    }
}
