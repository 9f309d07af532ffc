//! Abstract syntax tree types for spec keys and output paths.

use regex::Regex;
use std::fmt;

/// A backreference into the walked path: `&(depth,group)` or `$(depth,group)`.
///
/// `depth` counts frames up from the end of the walk (0 is the current
/// level), `group` selects a capture of that frame (0 is the whole key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference {
    pub depth: usize,
    pub group: usize,
}

impl Reference {
    /// Creates a reference `depth` levels up, naming capture `group`.
    pub fn new(depth: usize, group: usize) -> Self {
        Self { depth, group }
    }

    /// Canonical `&(d,g)` rendering.
    pub fn canonical_form(&self) -> String {
        format!("&({},{})", self.depth, self.group)
    }
}

/// One piece of a mixed literal/reference key such as `tuna-&(1,1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text, already unescaped.
    Literal(String),
    /// A `&` reference.
    Reference(Reference),
}

/// The index forms an array element can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayIndex {
    /// `[]` - append to the end of the array.
    AutoExpand,
    /// `[3]` - an explicit position.
    Explicit(usize),
    /// `[&1]` / `[&(1,2)]` - the position is a captured key.
    Reference(Reference),
    /// `[#2]` - the number of matches seen so far two levels up.
    HashCount(usize),
}

/// `@N` / `@(N,a.b)`: read a value out of the input instead of a matched key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transpose {
    /// How many frames up the walk to start reading from.
    pub up_level: usize,
    /// Keys to follow from that frame's data; empty means the data itself.
    pub sub_path: Vec<String>,
}

impl Transpose {
    pub fn canonical_form(&self) -> String {
        format!("@({},{})", self.up_level, self.sub_path.join("."))
    }
}

/// A `prefix*suffix` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarSingle {
    pub raw: String,
    pub prefix: String,
    pub suffix: String,
}

/// A `prefix*mid*suffix` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarDouble {
    pub raw: String,
    pub prefix: String,
    pub mid: String,
    pub suffix: String,
}

/// Any other multi-wildcard key, compiled to an anchored non-greedy regex.
#[derive(Debug, Clone)]
pub struct StarRegex {
    pub raw: String,
    pub regex: Regex,
}

impl PartialEq for StarRegex {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for StarRegex {}

/// One parsed `.`-delimited segment of a spec key or output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathElement {
    /// Exact text.
    Literal(String),
    /// `*`
    StarAll,
    /// `prefix*suffix`
    StarSingle(StarSingle),
    /// `prefix*mid*suffix`
    StarDouble(StarDouble),
    /// Three or more wildcards, or adjacent ones.
    StarRegex(StarRegex),
    /// Literal text mixed with `&` references.
    Amp(Vec<Token>),
    /// `$`, `$N`, `$(N,M)` - write a matched key as data.
    Dollar(Reference),
    /// `@` - the data at the current level.
    At,
    /// `#text` - write a fixed string as data.
    Hash(String),
    /// `[]`, `[3]`, `[&1]`, `[#2]`
    Array(ArrayIndex),
    /// `@N` / `@(N,path)`
    Transpose(Transpose),
}

impl PathElement {
    /// Stable textual form used for duplicate detection and ordering.
    pub fn canonical_form(&self) -> String {
        match self {
            PathElement::Literal(text) => escape_literal(text, true),
            PathElement::StarAll => "*".to_string(),
            PathElement::StarSingle(star) => star.raw.clone(),
            PathElement::StarDouble(star) => star.raw.clone(),
            PathElement::StarRegex(star) => star.raw.clone(),
            PathElement::Amp(tokens) => tokens
                .iter()
                .enumerate()
                .map(|(i, token)| match token {
                    Token::Literal(text) => escape_literal(text, i == 0),
                    Token::Reference(reference) => reference.canonical_form(),
                })
                .collect(),
            PathElement::Dollar(reference) => {
                format!("$({},{})", reference.depth, reference.group)
            }
            PathElement::At => "@".to_string(),
            PathElement::Hash(text) => format!("#{}", text),
            PathElement::Array(index) => match index {
                ArrayIndex::AutoExpand => "[]".to_string(),
                ArrayIndex::Explicit(n) => format!("[{}]", n),
                ArrayIndex::Reference(reference) => format!("[{}]", reference.canonical_form()),
                ArrayIndex::HashCount(n) => format!("[#{}]", n),
            },
            PathElement::Transpose(transpose) => transpose.canonical_form(),
        }
    }

    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PathElement::Literal(_) => "literal",
            PathElement::StarAll
            | PathElement::StarSingle(_)
            | PathElement::StarDouble(_)
            | PathElement::StarRegex(_) => "wildcard",
            PathElement::Amp(_) => "reference",
            PathElement::Dollar(_) => "dollar",
            PathElement::At => "at",
            PathElement::Hash(_) => "hash",
            PathElement::Array(_) => "array",
            PathElement::Transpose(_) => "transpose",
        }
    }

    /// True for the wildcard variants.
    pub fn is_star(&self) -> bool {
        matches!(
            self,
            PathElement::StarAll
                | PathElement::StarSingle(_)
                | PathElement::StarDouble(_)
                | PathElement::StarRegex(_)
        )
    }

    /// Elements that fire for every input rather than matching a key.
    pub fn is_special(&self) -> bool {
        matches!(
            self,
            PathElement::Dollar(_) | PathElement::At | PathElement::Hash(_) | PathElement::Transpose(_)
        )
    }

    /// Elements that may head a composite spec node.
    pub fn can_have_children(&self) -> bool {
        matches!(self, PathElement::Literal(_) | PathElement::Amp(_) | PathElement::Transpose(_))
            || self.is_star()
    }

    /// Precedence rank among computed siblings; `None` for elements that
    /// never enter the computed bucket.
    pub fn computed_rank(&self) -> Option<u8> {
        match self {
            PathElement::Amp(_) => Some(1),
            _ if self.is_star() => Some(2),
            _ => None,
        }
    }
}

/// Re-escapes literal text so it can never read as another element kind.
/// `leading` marks text at the start of a key, where `@ $ # [` are sigils.
fn escape_literal(text: &str, leading: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.chars().enumerate() {
        let sigil = leading && i == 0 && matches!(ch, '@' | '$' | '#' | '[');
        if sigil || matches!(ch, '.' | '*' | '&' | '|' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_form())
    }
}

/// The subset of path elements that can be evaluated on the output side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputElement {
    Literal(String),
    Amp(Vec<Token>),
    Array(ArrayIndex),
    Transpose(Transpose),
}

impl TryFrom<PathElement> for OutputElement {
    type Error = PathElement;

    fn try_from(element: PathElement) -> Result<Self, Self::Error> {
        match element {
            PathElement::Literal(text) => Ok(OutputElement::Literal(text)),
            PathElement::Amp(tokens) => Ok(OutputElement::Amp(tokens)),
            PathElement::Array(index) => Ok(OutputElement::Array(index)),
            PathElement::Transpose(transpose) => Ok(OutputElement::Transpose(transpose)),
            other => Err(other),
        }
    }
}
