//! Matching input keys against path elements, and evaluating elements
//! against the walked path.

use super::ast::{ArrayIndex, PathElement, Token, Transpose};
use crate::document::lookup::{read_path, scalar_key};
use crate::error::TransformError;
use crate::walk::{MatchedElement, WalkedPath};
use serde_json::Value;

impl PathElement {
    /// Tries to match `key` at the current level of the walk.
    ///
    /// Reference keys evaluate themselves first and match on equality. The
    /// special elements (`@`, `$`, `#`, transposes) match anything and hand
    /// back their parent's matched element, so `&0` and `&1` both name the
    /// parent's key beneath them.
    pub fn match_key(
        &self,
        key: &str,
        walked: &WalkedPath<'_>,
    ) -> Result<Option<MatchedElement>, TransformError> {
        let matched = match self {
            PathElement::Literal(text) => (text == key).then(|| MatchedElement::new(key)),
            PathElement::StarAll => Some(MatchedElement::new(key)),
            PathElement::StarSingle(star) => {
                let fits = key.len() > star.prefix.len() + star.suffix.len()
                    && key.starts_with(&star.prefix)
                    && key.ends_with(&star.suffix);
                fits.then(|| {
                    let infix = &key[star.prefix.len()..key.len() - star.suffix.len()];
                    MatchedElement::with_captures(key, vec![infix.to_string()])
                })
            }
            PathElement::StarDouble(star) => {
                match_double(key, &star.prefix, &star.mid, &star.suffix).map(|(first, second)| {
                    MatchedElement::with_captures(key, vec![first.to_string(), second.to_string()])
                })
            }
            PathElement::StarRegex(star) => star.regex.captures(key).map(|caps| {
                let subs = caps
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect();
                MatchedElement::with_captures(key, subs)
            }),
            PathElement::Amp(tokens) => {
                let evaluated = evaluate_tokens(tokens, walked)?;
                (evaluated == key).then(|| MatchedElement::new(key))
            }
            PathElement::Dollar(_)
            | PathElement::At
            | PathElement::Hash(_)
            | PathElement::Transpose(_) => Some(
                walked
                    .last()
                    .map(|step| step.matched().clone())
                    .unwrap_or_else(|| MatchedElement::new(key)),
            ),
            PathElement::Array(_) => None,
        };
        Ok(matched)
    }

    /// Evaluates this element to a concrete key string.
    ///
    /// `Ok(None)` means the element has no key form here: wildcards and `@`
    /// never do, `[]` is positional, and a transpose whose source is absent
    /// or not a scalar yields nothing.
    pub fn evaluate(&self, walked: &WalkedPath<'_>) -> Result<Option<String>, TransformError> {
        match self {
            PathElement::Literal(text) => Ok(Some(text.clone())),
            PathElement::Amp(tokens) => evaluate_tokens(tokens, walked).map(Some),
            PathElement::Dollar(reference) => walked.resolve(reference).map(|s| Some(s.to_string())),
            PathElement::Hash(text) => Ok(Some(text.clone())),
            PathElement::Array(index) => evaluate_index(index, walked),
            PathElement::Transpose(transpose) => {
                Ok(transpose.read(walked)?.and_then(scalar_key))
            }
            PathElement::StarAll
            | PathElement::StarSingle(_)
            | PathElement::StarDouble(_)
            | PathElement::StarRegex(_)
            | PathElement::At => Ok(None),
        }
    }
}

impl Transpose {
    /// Reads this transpose's value out of the input: the data of the frame
    /// `up_level` levels up, followed by `sub_path`.
    pub fn read<'a>(&self, walked: &WalkedPath<'a>) -> Result<Option<&'a Value>, TransformError> {
        let step = walked.step(self.up_level, &self.canonical_form())?;
        Ok(step.data().and_then(|data| read_path(data, &self.sub_path)))
    }
}

/// Concatenates literal tokens and resolved references.
pub fn evaluate_tokens(tokens: &[Token], walked: &WalkedPath<'_>) -> Result<String, TransformError> {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Reference(reference) => out.push_str(walked.resolve(reference)?),
        }
    }
    Ok(out)
}

/// Index text for an array element; `None` for `[]`.
pub(crate) fn evaluate_index(
    index: &ArrayIndex,
    walked: &WalkedPath<'_>,
) -> Result<Option<String>, TransformError> {
    match index {
        ArrayIndex::AutoExpand => Ok(None),
        ArrayIndex::Explicit(n) => Ok(Some(n.to_string())),
        ArrayIndex::Reference(reference) => walked.resolve(reference).map(|s| Some(s.to_string())),
        ArrayIndex::HashCount(level) => {
            let step = walked.step(*level, &format!("[#{}]", level))?;
            Ok(Some(step.matched().hash_count().to_string()))
        }
    }
}

/// Matches `prefix*mid*suffix`, taking the first `mid` that leaves a
/// non-empty first capture.
fn match_double<'k>(
    key: &'k str,
    prefix: &str,
    mid: &str,
    suffix: &str,
) -> Option<(&'k str, &'k str)> {
    if key.len() < prefix.len() + mid.len() + suffix.len() + 2
        || !key.starts_with(prefix)
        || !key.ends_with(suffix)
    {
        return None;
    }
    let region = &key[prefix.len()..key.len() - suffix.len()];
    let skip = region.chars().next()?.len_utf8();
    let at = region[skip..].find(mid)? + skip;
    let first = &region[..at];
    let second = &region[at + mid.len()..];
    if second.is_empty() {
        return None;
    }
    Some((first, second))
}
