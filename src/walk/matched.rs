//! The record of one successful key match.

/// A key that matched a spec element, with its captured groups.
///
/// Capture 0 is always the whole matched key; wildcards add one capture per
/// `*`. The hash count is the number of children that have matched beneath
/// this element so far, and backs `[#N]` output indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedElement {
    captures: Vec<String>,
    orig_size: Option<usize>,
    hash_count: usize,
}

impl MatchedElement {
    /// A match with no sub-captures.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            captures: vec![key.into()],
            orig_size: None,
            hash_count: 0,
        }
    }

    /// A match with the given wildcard captures after the whole key.
    pub fn with_captures(key: impl Into<String>, subs: Vec<String>) -> Self {
        let mut captures = Vec::with_capacity(subs.len() + 1);
        captures.push(key.into());
        captures.extend(subs);
        Self {
            captures,
            orig_size: None,
            hash_count: 0,
        }
    }

    /// Records the original length of the list this level walks over.
    pub fn with_orig_size(mut self, size: usize) -> Self {
        self.orig_size = Some(size);
        self
    }

    pub fn raw_key(&self) -> &str {
        &self.captures[0]
    }

    /// Returns capture `group`, where 0 is the whole key.
    pub fn sub_key(&self, group: usize) -> Option<&str> {
        self.captures.get(group).map(String::as_str)
    }

    /// Number of captures, including the whole key.
    pub fn capture_count(&self) -> usize {
        self.captures.len()
    }

    pub fn orig_size(&self) -> Option<usize> {
        self.orig_size
    }

    pub fn hash_count(&self) -> usize {
        self.hash_count
    }

    pub fn increment_hash_count(&mut self) {
        self.hash_count += 1;
    }
}
