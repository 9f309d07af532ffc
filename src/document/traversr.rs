//! Writing values into output trees along resolved key paths.
//!
//! A [`Traversr`] walks the output one [`Step`] at a time, creating an
//! object or array at each hop that is still empty. Whether a hop becomes an
//! object or an array is decided by the step that follows it. At the final
//! step the configured [`WriteDiscipline`] decides how the value lands.
//!
//! # Example
//!
//! ```
//! use serde_json::{json, Value};
//! use shiftquill::document::traversr::{Step, Traversr, WriteDiscipline};
//!
//! let traversr = Traversr::new(WriteDiscipline::Shift);
//! let mut output = Value::Null;
//! let path = vec![Step::Key("tags".to_string())];
//!
//! traversr.write(&mut output, &path, json!("a"));
//! traversr.write(&mut output, &path, json!("b"));
//! assert_eq!(output, json!({"tags": ["a", "b"]}));
//! ```

use serde_json::{Map, Value};

/// One concrete hop in an output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// An object key.
    Key(String),
    /// An array position; shorter arrays are padded with nulls.
    Index(usize),
    /// One past the end of the array.
    Append,
}

impl Step {
    /// An empty container of the kind this step addresses.
    fn new_container(&self) -> Value {
        match self {
            Step::Key(_) => Value::Object(Map::new()),
            Step::Index(_) | Step::Append => Value::Array(Vec::new()),
        }
    }
}

/// How the final step treats a value that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteDiscipline {
    /// Replace whatever is there.
    Set,
    /// Accumulate: set if empty, append to a list, or turn a single value
    /// into a two-element list. Nothing already written is dropped.
    #[default]
    Shift,
}

/// Largest explicit array position a write may address by default.
pub const DEFAULT_MAX_INDEX: usize = 100_000;

/// Generic output-tree writer.
#[derive(Debug, Clone, Copy)]
pub struct Traversr {
    discipline: WriteDiscipline,
    max_index: usize,
}

impl Default for Traversr {
    fn default() -> Self {
        Self::new(WriteDiscipline::default())
    }
}

impl Traversr {
    pub fn new(discipline: WriteDiscipline) -> Self {
        Self {
            discipline,
            max_index: DEFAULT_MAX_INDEX,
        }
    }

    /// Caps the array positions this writer will pad up to.
    pub fn with_max_index(mut self, max_index: usize) -> Self {
        self.max_index = max_index;
        self
    }

    pub fn discipline(&self) -> WriteDiscipline {
        self.discipline
    }

    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// Writes `data` at `path` under `root`.
    ///
    /// Returns `false` without touching the final location when a hop runs
    /// into a value of the wrong kind (for instance a key step landing on an
    /// array, or any step landing on a scalar), or when an index step is
    /// past [`max_index`](Self::max_index).
    pub fn write(&self, root: &mut Value, path: &[Step], data: Value) -> bool {
        let out_of_range = path
            .iter()
            .any(|step| matches!(step, Step::Index(index) if *index > self.max_index));
        if out_of_range {
            return false;
        }

        let Some((last, hops)) = path.split_last() else {
            self.place(root, data);
            return true;
        };

        let mut current = root;
        for step in hops {
            current = match descend(current, step) {
                Some(child) => child,
                None => return false,
            };
        }

        if current.is_null() {
            *current = last.new_container();
        }
        match (current, last) {
            (Value::Object(map), Step::Key(key)) => {
                match map.get_mut(key) {
                    Some(existing) => self.place(existing, data),
                    None => {
                        map.insert(key.clone(), data);
                    }
                }
                true
            }
            (Value::Array(items), Step::Index(index)) => match pad_to(items, *index) {
                Some(slot) => {
                    self.place(slot, data);
                    true
                }
                None => false,
            },
            (Value::Array(items), Step::Append) => {
                items.push(data);
                true
            }
            _ => false,
        }
    }

    /// Final write into an existing slot.
    fn place(&self, slot: &mut Value, data: Value) {
        match self.discipline {
            WriteDiscipline::Set => *slot = data,
            WriteDiscipline::Shift => {
                if slot.is_null() {
                    *slot = data;
                } else if let Value::Array(items) = slot {
                    items.push(data);
                } else {
                    let previous = slot.take();
                    *slot = Value::Array(vec![previous, data]);
                }
            }
        }
    }
}

/// Moves one hop down, creating the container for `step` if `current` is
/// still null.
fn descend<'v>(current: &'v mut Value, step: &Step) -> Option<&'v mut Value> {
    if current.is_null() {
        *current = step.new_container();
    }
    match (current, step) {
        (Value::Object(map), Step::Key(key)) => Some(map.entry(key.clone()).or_insert(Value::Null)),
        (Value::Array(items), Step::Index(index)) => pad_to(items, *index),
        (Value::Array(items), Step::Append) => {
            items.push(Value::Null);
            items.last_mut()
        }
        _ => None,
    }
}

/// Grows `items` with nulls so that `index` is in bounds and returns that
/// slot.
fn pad_to(items: &mut Vec<Value>, index: usize) -> Option<&mut Value> {
    if items.len() <= index {
        items.resize(index.checked_add(1)?, Value::Null);
    }
    items.get_mut(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(k: &str) -> Step {
        Step::Key(k.to_string())
    }

    #[test]
    fn test_creates_intermediate_objects() {
        let traversr = Traversr::default();
        let mut output = Value::Null;
        assert!(traversr.write(&mut output, &[key("a"), key("b")], json!(1)));
        assert_eq!(output, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_next_step_decides_container_kind() {
        let traversr = Traversr::default();
        let mut output = Value::Null;
        traversr.write(&mut output, &[key("list"), Step::Index(1), key("x")], json!(1));
        assert_eq!(output, json!({"list": [null, {"x": 1}]}));
    }

    #[test]
    fn test_explicit_index_pads_with_nulls() {
        let traversr = Traversr::default();
        let mut output = json!({"out": []});
        traversr.write(&mut output, &[key("out"), Step::Index(3)], json!("v"));
        assert_eq!(output, json!({"out": [null, null, null, "v"]}));
    }

    #[test]
    fn test_shift_accumulates() {
        let traversr = Traversr::new(WriteDiscipline::Shift);
        let mut output = Value::Null;
        let path = [key("x")];
        traversr.write(&mut output, &path, json!(1));
        traversr.write(&mut output, &path, json!(2));
        traversr.write(&mut output, &path, json!(3));
        assert_eq!(output, json!({"x": [1, 2, 3]}));
    }

    #[test]
    fn test_shift_wraps_existing_object() {
        let traversr = Traversr::new(WriteDiscipline::Shift);
        let mut output = json!({"x": {"a": 1}});
        traversr.write(&mut output, &[key("x")], json!("b"));
        assert_eq!(output, json!({"x": [{"a": 1}, "b"]}));
    }

    #[test]
    fn test_shift_fills_null_placeholder() {
        let traversr = Traversr::new(WriteDiscipline::Shift);
        let mut output = json!([null, null]);
        traversr.write(&mut output, &[Step::Index(1)], json!("v"));
        assert_eq!(output, json!([null, "v"]));
    }

    #[test]
    fn test_set_overwrites() {
        let traversr = Traversr::new(WriteDiscipline::Set);
        let mut output = json!({"x": [1, 2]});
        traversr.write(&mut output, &[key("x")], json!("new"));
        assert_eq!(output, json!({"x": "new"}));
    }

    #[test]
    fn test_append_creates_new_elements() {
        let traversr = Traversr::default();
        let mut output = Value::Null;
        traversr.write(&mut output, &[Step::Append, key("id")], json!(1));
        traversr.write(&mut output, &[Step::Append, key("id")], json!(2));
        traversr.write(&mut output, &[Step::Append], json!(3));
        assert_eq!(output, json!([{"id": 1}, {"id": 2}, 3]));
    }

    #[test]
    fn test_wrong_kind_is_skipped() {
        let traversr = Traversr::default();
        let mut output = json!({"a": "scalar", "list": [1]});
        assert!(!traversr.write(&mut output, &[key("a"), key("b")], json!(1)));
        assert!(!traversr.write(&mut output, &[key("list"), key("b")], json!(1)));
        assert_eq!(output, json!({"a": "scalar", "list": [1]}));
    }

    #[test]
    fn test_empty_path_writes_root() {
        let traversr = Traversr::default();
        let mut output = Value::Null;
        assert!(traversr.write(&mut output, &[], json!({"whole": true})));
        assert_eq!(output, json!({"whole": true}));
    }

    #[test]
    fn test_shift_collects_repeated_index() {
        let traversr = Traversr::new(WriteDiscipline::Shift);
        let mut output = Value::Null;
        let path = [key("out"), Step::Index(0)];
        assert!(traversr.write(&mut output, &path, json!(1)));
        assert!(traversr.write(&mut output, &path, json!(2)));
        assert_eq!(output, json!({"out": [[1, 2]]}));
    }

    #[test]
    fn test_index_past_ceiling_is_skipped() {
        let traversr = Traversr::default().with_max_index(10);
        let mut output = Value::Null;
        assert!(!traversr.write(&mut output, &[key("out"), Step::Index(11)], json!(1)));
        assert!(!traversr.write(&mut output, &[Step::Index(usize::MAX), key("x")], json!(1)));
        assert_eq!(output, Value::Null);
        assert!(traversr.write(&mut output, &[key("out"), Step::Index(10)], json!(1)));
        assert_eq!(output["out"].as_array().map(Vec::len), Some(11));
    }

    #[test]
    fn test_pad_to_does_not_overflow() {
        let mut items = Vec::new();
        assert!(pad_to(&mut items, usize::MAX).is_none());
        assert!(items.is_empty());
    }
}
