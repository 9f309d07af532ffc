//! Spec key and output path parser.

use super::ast::{
    ArrayIndex, OutputElement, PathElement, Reference, StarDouble, StarRegex, StarSingle, Token,
    Transpose,
};
use crate::error::SpecError;
use regex::Regex;

/// Parses one spec key into a path element.
///
/// The variant is decided by surface syntax: a leading `@`, `$`, `#` or `[`
/// selects the special forms, then the number of unescaped `*` picks a
/// wildcard variant, then any `&` makes a reference key, and everything else
/// is a literal.
pub fn parse_key(raw: &str) -> Result<PathElement, SpecError> {
    let mut parser = Parser::new(raw)?;
    parser.parse_element()
}

/// Parses a dot-notation output path such as `photos[&1].url`.
pub fn parse_output_path(path: &str) -> Result<Vec<OutputElement>, SpecError> {
    split_dot_notation(path)?
        .into_iter()
        .map(|segment| {
            let element = parse_key(&segment)?;
            OutputElement::try_from(element).map_err(|element| SpecError::IllegalOutputElement {
                path: path.to_string(),
                element: element.canonical_form(),
            })
        })
        .collect()
}

/// Splits `a|b|c` into its trimmed alternatives. Escaped `\|` is kept.
pub fn split_alternatives(key: &str) -> Vec<String> {
    split_unescaped(key, '|')
        .into_iter()
        .map(|alt| alt.trim().to_string())
        .collect()
}

/// Splits an output path on unescaped dots, giving every `[...]` group its
/// own segment. Parenthesised groups such as `@(1,a.b)` are never split.
/// Escapes are preserved in the returned segments.
pub fn split_dot_notation(path: &str) -> Result<Vec<String>, SpecError> {
    let mut segments = Vec::new();
    if path.is_empty() {
        return Ok(segments);
    }

    let invalid = |message: &str| SpecError::InvalidKey {
        key: path.to_string(),
        message: message.to_string(),
    };

    let mut current = String::new();
    let mut depth = 0usize;
    let mut after_bracket = false;
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                let escaped = chars.next().ok_or_else(|| invalid("trailing escape character"))?;
                current.push('\\');
                current.push(escaped);
            }
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            '.' if depth == 0 => {
                if current.is_empty() {
                    if !after_bracket {
                        return Err(invalid("empty path segment"));
                    }
                } else {
                    segments.push(std::mem::take(&mut current));
                }
                if chars.peek().is_none() {
                    return Err(invalid("path ends with '.'"));
                }
                after_bracket = false;
                continue;
            }
            '[' if depth == 0 => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                let mut bracket = String::from("[");
                loop {
                    match chars.next() {
                        Some('\\') => {
                            let escaped =
                                chars.next().ok_or_else(|| invalid("trailing escape character"))?;
                            bracket.push('\\');
                            bracket.push(escaped);
                        }
                        Some(']') => {
                            bracket.push(']');
                            break;
                        }
                        Some(c) => bracket.push(c),
                        None => {
                            return Err(SpecError::InvalidArray {
                                key: path.to_string(),
                            })
                        }
                    }
                }
                segments.push(bracket);
                match chars.peek() {
                    None | Some('.') | Some('[') => {}
                    Some(_) => return Err(invalid("array element must be followed by '.' or '['")),
                }
                after_bracket = true;
                continue;
            }
            _ => current.push(ch),
        }
        after_bracket = false;
    }

    if !current.is_empty() {
        segments.push(current);
    }
    Ok(segments)
}

/// Removes backslash escapes.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Splits on every unescaped `sep`, keeping escapes in the pieces.
fn split_unescaped(text: &str, sep: char) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            current.push(ch);
            if let Some(escaped) = chars.next() {
                current.push(escaped);
            }
        } else if ch == sep {
            pieces.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    pieces.push(current);
    pieces
}

/// Cursor over the characters of one key. Each character carries whether it
/// was escaped with a backslash.
struct Parser<'k> {
    key: &'k str,
    chars: Vec<(char, bool)>,
    position: usize,
}

impl<'k> Parser<'k> {
    fn new(key: &'k str) -> Result<Self, SpecError> {
        let mut chars = Vec::with_capacity(key.len());
        let mut iter = key.chars();
        while let Some(ch) = iter.next() {
            if ch == '\\' {
                let escaped = iter.next().ok_or_else(|| SpecError::InvalidKey {
                    key: key.to_string(),
                    message: "trailing escape character".to_string(),
                })?;
                chars.push((escaped, true));
            } else {
                chars.push((ch, false));
            }
        }
        Ok(Self {
            key,
            chars,
            position: 0,
        })
    }

    /// Returns the current unescaped character without advancing.
    fn peek(&self) -> Option<char> {
        match self.chars.get(self.position) {
            Some(&(ch, false)) => Some(ch),
            _ => None,
        }
    }

    /// Returns the next character (escaped or not) and advances.
    fn next(&mut self) -> Option<(char, bool)> {
        let item = self.chars.get(self.position).copied()?;
        self.position += 1;
        Some(item)
    }

    fn is_eof(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn has_unescaped(&self, wanted: char) -> bool {
        self.chars.iter().any(|&(ch, escaped)| !escaped && ch == wanted)
    }

    fn text(&self) -> String {
        self.chars.iter().map(|&(ch, _)| ch).collect()
    }

    fn reference_error(&self, message: &str) -> SpecError {
        SpecError::InvalidReference {
            key: self.key.to_string(),
            message: message.to_string(),
        }
    }

    fn parse_element(&mut self) -> Result<PathElement, SpecError> {
        match self.peek() {
            Some('@') => return self.parse_at(),
            Some('$') => return self.parse_dollar(),
            Some('#') => {
                self.next();
                let literal: String = self.chars[self.position..].iter().map(|&(ch, _)| ch).collect();
                return Ok(PathElement::Hash(literal));
            }
            Some('[') => return self.parse_array(),
            _ => {}
        }

        if self.has_unescaped('*') {
            if self.has_unescaped('&') || self.has_unescaped('[') {
                return Err(SpecError::MixedWildcard {
                    key: self.key.to_string(),
                });
            }
            return self.parse_star();
        }

        if self.has_unescaped('&') {
            return self.parse_amp();
        }

        Ok(PathElement::Literal(self.text()))
    }

    /// `@`, `@N`, `@path`, `@(N,path)`, `@(path)`
    fn parse_at(&mut self) -> Result<PathElement, SpecError> {
        if self.key == "@" {
            return Ok(PathElement::At);
        }

        let rest = &self.key[1..];
        let meat = if let Some(inner) = rest.strip_prefix('(') {
            inner.strip_suffix(')').ok_or_else(|| SpecError::InvalidKey {
                key: self.key.to_string(),
                message: "unbalanced parentheses".to_string(),
            })?
        } else {
            rest
        };

        let (up_level, path) = match meat.split_once(',') {
            Some((level, path)) => {
                let level = level.trim();
                let up_level = level.parse::<usize>().map_err(|_| SpecError::InvalidKey {
                    key: self.key.to_string(),
                    message: format!("invalid level '{}'", level),
                })?;
                (up_level, path.trim())
            }
            None if !meat.is_empty() && meat.chars().all(|c| c.is_ascii_digit()) => {
                let up_level = meat.parse::<usize>().map_err(|_| SpecError::InvalidKey {
                    key: self.key.to_string(),
                    message: format!("invalid level '{}'", meat),
                })?;
                (up_level, "")
            }
            None => (0, meat.trim()),
        };

        let sub_path = if path.is_empty() {
            Vec::new()
        } else {
            split_unescaped(path, '.')
                .iter()
                .map(|segment| unescape(segment))
                .collect()
        };

        Ok(PathElement::Transpose(Transpose { up_level, sub_path }))
    }

    /// `$`, `$N`, `$(N)`, `$(N,M)`
    fn parse_dollar(&mut self) -> Result<PathElement, SpecError> {
        self.next();
        let reference = self.parse_reference_body()?;
        if !self.is_eof() {
            return Err(self.reference_error("unexpected text after '$' reference"));
        }
        Ok(PathElement::Dollar(reference))
    }

    /// `[]`, `[3]`, `[&1]`, `[&(1,2)]`, `[#2]`
    fn parse_array(&mut self) -> Result<PathElement, SpecError> {
        let key = self.key;
        let invalid = || SpecError::InvalidArray {
            key: key.to_string(),
        };
        match self.chars.last() {
            Some(&(']', false)) if self.chars.len() >= 2 => {}
            _ => return Err(invalid()),
        }
        let end = self.chars.len() - 1;
        self.next();

        if self.position == end {
            return Ok(PathElement::Array(ArrayIndex::AutoExpand));
        }

        let index = match self.peek() {
            Some('&') => {
                self.next();
                let reference = self.parse_reference_body()?;
                ArrayIndex::Reference(reference)
            }
            Some('#') => {
                self.next();
                let count = self.parse_number().ok_or_else(invalid)?;
                ArrayIndex::HashCount(count)
            }
            _ => ArrayIndex::Explicit(self.parse_number().ok_or_else(invalid)?),
        };

        if self.position != end {
            return Err(invalid());
        }
        Ok(PathElement::Array(index))
    }

    /// Wildcard keys: `*`, `a*b`, `a*b*c`, or anything else as a regex.
    fn parse_star(&mut self) -> Result<PathElement, SpecError> {
        let mut chunks = vec![String::new()];
        for &(ch, escaped) in &self.chars {
            if ch == '*' && !escaped {
                chunks.push(String::new());
            } else if let Some(last) = chunks.last_mut() {
                last.push(ch);
            }
        }
        let raw = self.key.to_string();

        match chunks.as_slice() {
            [prefix, suffix] if prefix.is_empty() && suffix.is_empty() => Ok(PathElement::StarAll),
            [prefix, suffix] => Ok(PathElement::StarSingle(StarSingle {
                raw,
                prefix: prefix.clone(),
                suffix: suffix.clone(),
            })),
            [prefix, mid, suffix] if !mid.is_empty() => Ok(PathElement::StarDouble(StarDouble {
                raw,
                prefix: prefix.clone(),
                mid: mid.clone(),
                suffix: suffix.clone(),
            })),
            _ => {
                let body = chunks
                    .iter()
                    .map(|chunk| regex::escape(chunk))
                    .collect::<Vec<_>>()
                    .join("(.+?)");
                let regex = Regex::new(&format!("(?s)^{}$", body)).map_err(|e| {
                    SpecError::InvalidKey {
                        key: raw.clone(),
                        message: e.to_string(),
                    }
                })?;
                Ok(PathElement::StarRegex(StarRegex { raw, regex }))
            }
        }
    }

    /// Literal text interleaved with `&` references.
    fn parse_amp(&mut self) -> Result<PathElement, SpecError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();

        while let Some((ch, escaped)) = self.next() {
            if ch == '&' && !escaped {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Reference(self.parse_reference_body()?));
            } else {
                literal.push(ch);
            }
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(PathElement::Amp(tokens))
    }

    /// Parses what follows a `&` or `$` sigil: nothing, `N`, `(N)` or `(N,M)`.
    fn parse_reference_body(&mut self) -> Result<Reference, SpecError> {
        if self.peek() == Some('(') {
            self.next();
            let depth = self
                .parse_number()
                .ok_or_else(|| self.reference_error("expected a level number after '('"))?;
            let group = if self.peek() == Some(',') {
                self.next();
                self.parse_number()
                    .ok_or_else(|| self.reference_error("expected a group number after ','"))?
            } else {
                0
            };
            match self.next() {
                Some((')', false)) => Ok(Reference::new(depth, group)),
                _ => Err(self.reference_error("unbalanced parentheses")),
            }
        } else {
            Ok(Reference::new(self.parse_number().unwrap_or(0), 0))
        }
    }

    /// Parses a run of ASCII digits, if any.
    fn parse_number(&mut self) -> Option<usize> {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.position += 1;
            } else {
                break;
            }
        }
        if start == self.position {
            return None;
        }
        self.chars[start..self.position]
            .iter()
            .map(|&(ch, _)| ch)
            .collect::<String>()
            .parse()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal() {
        assert_eq!(parse_key("rating").unwrap(), PathElement::Literal("rating".to_string()));
    }

    #[test]
    fn test_parse_escaped_literal() {
        assert_eq!(parse_key("a\\.b").unwrap(), PathElement::Literal("a.b".to_string()));
        assert_eq!(parse_key("\\@home").unwrap(), PathElement::Literal("@home".to_string()));
        assert_eq!(parse_key("\\*").unwrap(), PathElement::Literal("*".to_string()));
    }

    #[test]
    fn test_parse_star_all() {
        assert_eq!(parse_key("*").unwrap(), PathElement::StarAll);
    }

    #[test]
    fn test_parse_star_single() {
        match parse_key("rating-*").unwrap() {
            PathElement::StarSingle(star) => {
                assert_eq!(star.prefix, "rating-");
                assert_eq!(star.suffix, "");
            }
            other => panic!("Expected StarSingle, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_star_double() {
        match parse_key("tuna-*-marlin-*").unwrap() {
            PathElement::StarDouble(star) => {
                assert_eq!(star.prefix, "tuna-");
                assert_eq!(star.mid, "-marlin-");
                assert_eq!(star.suffix, "");
            }
            other => panic!("Expected StarDouble, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_star_regex() {
        assert!(matches!(parse_key("a*b*c*d").unwrap(), PathElement::StarRegex(_)));
        assert!(matches!(parse_key("**").unwrap(), PathElement::StarRegex(_)));
    }

    #[test]
    fn test_parse_mixed_wildcard_fails() {
        assert!(matches!(
            parse_key("rating-*-&1"),
            Err(SpecError::MixedWildcard { .. })
        ));
        assert!(matches!(parse_key("a*[0]"), Err(SpecError::MixedWildcard { .. })));
    }

    #[test]
    fn test_parse_amp_forms() {
        let expected = |d, g| PathElement::Amp(vec![Token::Reference(Reference::new(d, g))]);
        assert_eq!(parse_key("&").unwrap(), expected(0, 0));
        assert_eq!(parse_key("&2").unwrap(), expected(2, 0));
        assert_eq!(parse_key("&(3)").unwrap(), expected(3, 0));
        assert_eq!(parse_key("&(1,2)").unwrap(), expected(1, 2));
    }

    #[test]
    fn test_parse_amp_with_literals() {
        assert_eq!(
            parse_key("tuna-&(1,1)-x").unwrap(),
            PathElement::Amp(vec![
                Token::Literal("tuna-".to_string()),
                Token::Reference(Reference::new(1, 1)),
                Token::Literal("-x".to_string()),
            ])
        );
    }

    #[test]
    fn test_parse_bad_references() {
        assert!(matches!(parse_key("&(1,2"), Err(SpecError::InvalidReference { .. })));
        assert!(matches!(parse_key("&(a)"), Err(SpecError::InvalidReference { .. })));
        assert!(matches!(parse_key("&(1,)"), Err(SpecError::InvalidReference { .. })));
        assert!(matches!(parse_key("$(1,2,3)"), Err(SpecError::InvalidReference { .. })));
    }

    #[test]
    fn test_parse_dollar() {
        assert_eq!(parse_key("$").unwrap(), PathElement::Dollar(Reference::new(0, 0)));
        assert_eq!(parse_key("$(1,2)").unwrap(), PathElement::Dollar(Reference::new(1, 2)));
        assert!(parse_key("$foo").is_err());
    }

    #[test]
    fn test_parse_at_and_transpose() {
        assert_eq!(parse_key("@").unwrap(), PathElement::At);
        assert_eq!(
            parse_key("@1").unwrap(),
            PathElement::Transpose(Transpose {
                up_level: 1,
                sub_path: vec![]
            })
        );
        assert_eq!(
            parse_key("@(2,client.id)").unwrap(),
            PathElement::Transpose(Transpose {
                up_level: 2,
                sub_path: vec!["client".to_string(), "id".to_string()]
            })
        );
        assert_eq!(
            parse_key("@name").unwrap(),
            PathElement::Transpose(Transpose {
                up_level: 0,
                sub_path: vec!["name".to_string()]
            })
        );
        assert!(parse_key("@(1,id").is_err());
    }

    #[test]
    fn test_parse_hash() {
        assert_eq!(parse_key("#pending").unwrap(), PathElement::Hash("pending".to_string()));
    }

    #[test]
    fn test_parse_arrays() {
        assert_eq!(parse_key("[]").unwrap(), PathElement::Array(ArrayIndex::AutoExpand));
        assert_eq!(parse_key("[3]").unwrap(), PathElement::Array(ArrayIndex::Explicit(3)));
        assert_eq!(
            parse_key("[&1]").unwrap(),
            PathElement::Array(ArrayIndex::Reference(Reference::new(1, 0)))
        );
        assert_eq!(
            parse_key("[&(2,1)]").unwrap(),
            PathElement::Array(ArrayIndex::Reference(Reference::new(2, 1)))
        );
        assert_eq!(parse_key("[#2]").unwrap(), PathElement::Array(ArrayIndex::HashCount(2)));
    }

    #[test]
    fn test_parse_bad_arrays() {
        assert!(matches!(parse_key("[3"), Err(SpecError::InvalidArray { .. })));
        assert!(matches!(parse_key("[x]"), Err(SpecError::InvalidArray { .. })));
        assert!(matches!(parse_key("[#]"), Err(SpecError::InvalidArray { .. })));
        assert!(matches!(parse_key("[1]x"), Err(SpecError::InvalidArray { .. })));
    }

    #[test]
    fn test_split_alternatives() {
        assert_eq!(split_alternatives("a | b|c"), vec!["a", "b", "c"]);
        assert_eq!(split_alternatives("a\\|b"), vec!["a\\|b"]);
    }

    #[test]
    fn test_split_dot_notation() {
        assert_eq!(
            split_dot_notation("photos[&1].url").unwrap(),
            vec!["photos", "[&1]", "url"]
        );
        assert_eq!(
            split_dot_notation("out.@(1,a.b).x").unwrap(),
            vec!["out", "@(1,a.b)", "x"]
        );
        assert_eq!(split_dot_notation("a\\.b.c").unwrap(), vec!["a\\.b", "c"]);
        assert_eq!(split_dot_notation("[0][1]").unwrap(), vec!["[0]", "[1]"]);
        assert!(split_dot_notation("").unwrap().is_empty());
    }

    #[test]
    fn test_split_dot_notation_errors() {
        assert!(split_dot_notation("a..b").is_err());
        assert!(split_dot_notation("a.").is_err());
        assert!(split_dot_notation("a[0").is_err());
    }

    #[test]
    fn test_parse_output_path() {
        let path = parse_output_path("&(1,2).&.value").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[2], OutputElement::Literal("value".to_string()));
    }

    #[test]
    fn test_output_path_rejects_unqualified_specials() {
        for bad in ["out.*", "out.@", "$.out", "a.#b", "x-*"] {
            assert!(
                matches!(
                    parse_output_path(bad),
                    Err(SpecError::IllegalOutputElement { .. })
                ),
                "expected '{}' to be rejected",
                bad
            );
        }
    }
}
