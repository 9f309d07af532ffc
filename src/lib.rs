//! shiftquill - declarative JSON-to-JSON restructuring.
//!
//! A shift spec is a JSON document that mirrors the shape of its input.
//! Keys match input keys (literally, with `*` wildcards, or by referring back
//! to keys matched further up), and leaf values name where the matched data
//! lands in the output.
//!
//! ```
//! use serde_json::json;
//! use shiftquill::Shiftr;
//!
//! let shiftr = Shiftr::new(&json!({ "user": { "name": "people.&1.fullName" } })).unwrap();
//! let output = shiftr.transform(&json!({ "user": { "name": "Ada" } })).unwrap();
//! assert_eq!(output, json!({ "people": { "user": { "fullName": "Ada" } } }));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod file;
pub mod path;
pub mod shiftr;
pub mod spec;
pub mod walk;

pub use error::{SpecError, TransformError};
pub use shiftr::Shiftr;
