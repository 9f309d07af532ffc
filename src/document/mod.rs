//! Reading input documents and writing output documents.
//!
//! Documents are plain `serde_json::Value` trees with insertion-ordered maps.
//!
//! - `lookup`: read-only navigation used by transposes and scalar keys
//! - `output_path`: right-hand side templates resolved against the walk
//! - `traversr`: creating containers and landing values in the output

pub mod lookup;
pub mod output_path;
pub mod traversr;

pub use lookup::{read_path, scalar_key};
pub use output_path::OutputPath;
pub use traversr::{Step, Traversr, WriteDiscipline};
