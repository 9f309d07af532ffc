//! Path elements: the grammar of spec keys and output paths.
//!
//! Every `.`-delimited segment of a spec key or output path parses into one
//! [`PathElement`]. The same elements match input keys on the left-hand side
//! and evaluate to concrete keys on the right-hand side.
//!
//! # Supported Syntax
//!
//! - `name` - Literal key (`\.` escapes a dot, `\@` a leading at, etc.)
//! - `*` - Any key
//! - `rating-*` - One wildcard, captured as group 1
//! - `*-tuna-*` - Two wildcards around a literal middle, non-greedy
//! - `a*b*c*` - Any other wildcard mix, as an anchored non-greedy regex
//! - `&`, `&1`, `&(1,2)` - Backreference to a matched key or capture
//! - `$`, `$(1,2)` - Write a matched key as data (left-hand side only)
//! - `#text` - Write a fixed string as data (left-hand side only)
//! - `@` - The data at the current level (left-hand side only)
//! - `@1`, `@(1,a.b)` - Read a value from the input (transpose)
//! - `[]`, `[3]`, `[&1]`, `[#2]` - Array positions (output side only)
//! - `a|b` - Alternatives sharing one right-hand side
//!
//! # Examples
//!
//! ```
//! // "tuna-*-marlin-*": { "rating-*": "&(1,2).&.value" }
//! // "photos": { "*": { "url": "images[&1].href" } }
//! // "*": { "$": "keys[]", "@": "values[]" }
//! ```

pub mod ast;
pub mod matcher;
pub mod parser;

pub use ast::{ArrayIndex, OutputElement, PathElement, Reference, Token, Transpose};
pub use matcher::evaluate_tokens;
pub use parser::{parse_key, parse_output_path, split_alternatives, split_dot_notation};
