//! Error types for spec building and transformation.
//!
//! Two kinds of failure exist. A [`SpecError`] means the spec document itself
//! is malformed and is only ever raised while building a spec tree. A
//! [`TransformError`] is raised while applying a valid spec to one particular
//! input; the spec tree is left untouched and can be reused.

use std::fmt;

/// Errors raised while parsing path elements or building a spec tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// A key that could not be parsed as any path element.
    InvalidKey { key: String, message: String },
    /// A key mixing `*` with `&` or `[`.
    MixedWildcard { key: String },
    /// Malformed `&`/`$` reference syntax.
    InvalidReference { key: String, message: String },
    /// An array element that is not `[]`, `[n]`, `[&..]` or `[#n]`.
    InvalidArray { key: String },
    /// Two siblings with the same canonical form.
    DuplicateKey { key: String, canonical: String },
    /// A composite whose value is `{}`.
    EmptyComposite { key: String },
    /// An element type that may not carry children.
    IllegalChildren { key: String },
    /// An element that cannot appear on the left-hand side.
    IllegalMatchElement { key: String },
    /// An element that cannot appear in an output path.
    IllegalOutputElement { path: String, element: String },
    /// A leaf value that is neither a string nor a list of strings.
    InvalidLeafValue { key: String },
    /// The spec document is not a JSON object.
    NotAnObject,
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::InvalidKey { key, message } => {
                write!(f, "Invalid spec key '{}': {}", key, message)
            }
            SpecError::MixedWildcard { key } => {
                write!(f, "Invalid spec key '{}': can not mix '*' with '&' or '['", key)
            }
            SpecError::InvalidReference { key, message } => {
                write!(f, "Invalid reference in '{}': {}", key, message)
            }
            SpecError::InvalidArray { key } => {
                write!(f, "Invalid array element '{}'", key)
            }
            SpecError::DuplicateKey { key, canonical } => write!(
                f,
                "Duplicate spec key '{}' (canonical form '{}')",
                key, canonical
            ),
            SpecError::EmptyComposite { key } => write!(
                f,
                "Spec key '{}': empty object is not a valid composite value",
                key
            ),
            SpecError::IllegalChildren { key } => {
                write!(f, "Spec key '{}' can not have children", key)
            }
            SpecError::IllegalMatchElement { key } => {
                write!(f, "Spec key '{}' can not be used to match input", key)
            }
            SpecError::IllegalOutputElement { path, element } => write!(
                f,
                "Output path '{}' contains '{}', which can not be used in an output path",
                path, element
            ),
            SpecError::InvalidLeafValue { key } => write!(
                f,
                "Spec key '{}': value must be an object, a string, or a list of strings",
                key
            ),
            SpecError::NotAnObject => write!(f, "Spec must be a JSON object"),
        }
    }
}

impl std::error::Error for SpecError {}

/// Errors raised while applying a spec to an input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// A reference pointing further up the walk than the walk is deep.
    ReferenceDepth {
        reference: String,
        depth: usize,
        available: usize,
    },
    /// A reference naming a capture group its frame does not have.
    CaptureGroup {
        reference: String,
        group: usize,
        available: usize,
    },
    /// The walk went deeper than the configured ceiling.
    DepthExceeded { limit: usize },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::ReferenceDepth {
                reference,
                depth,
                available,
            } => write!(
                f,
                "Reference '{}' looks {} levels up, but the walk is only {} levels deep",
                reference, depth, available
            ),
            TransformError::CaptureGroup {
                reference,
                group,
                available,
            } => write!(
                f,
                "Reference '{}' asks for capture group {}, but only {} were captured",
                reference, group, available
            ),
            TransformError::DepthExceeded { limit } => {
                write!(f, "Input nesting exceeds the maximum depth of {}", limit)
            }
        }
    }
}

impl std::error::Error for TransformError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_error_display() {
        let err = SpecError::EmptyComposite {
            key: "photos".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Spec key 'photos': empty object is not a valid composite value"
        );
    }

    #[test]
    fn test_transform_error_display() {
        let err = TransformError::ReferenceDepth {
            reference: "&(4,0)".to_string(),
            depth: 4,
            available: 2,
        };
        assert!(err.to_string().contains("only 2 levels deep"));
    }
}
