//! Nested path lookup inside JSON payloads
//!
//! Paths are dotted key chains with optional bracket segments:
//! - `a.b.c` walks object keys
//! - `items[0].name` indexes into arrays
//! - `a["x.y"]` addresses a key that contains a dot
//!
//! A path that does not match the data resolves to `None`. Only malformed
//! path syntax is an error.

use serde_json::Value;

use crate::error::PathError;

/// One step of a parsed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

/// A parsed nested path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Parse a path expression
    ///
    /// # Arguments
    /// * `path` - Path such as `a.b[0].c`
    ///
    /// # Returns
    /// * `Result<Self, PathError>` - Parsed path or syntax error
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let empty_segment = || PathError::EmptySegment {
            path: path.to_string(),
        };

        let mut segments = Vec::new();
        let mut key = String::new();
        // Set after '.', cleared once a key character arrives
        let mut expect_key = false;
        // Set after ']', a key may not follow without a separator
        let mut after_bracket = false;
        let mut chars = path.char_indices();

        while let Some((pos, ch)) = chars.next() {
            match ch {
                '.' => {
                    if key.is_empty() && !after_bracket {
                        return Err(empty_segment());
                    }
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    }
                    expect_key = true;
                    after_bracket = false;
                }
                '[' => {
                    if expect_key && key.is_empty() {
                        return Err(empty_segment());
                    }
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    }

                    let mut inner = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(PathError::UnterminatedBracket {
                            path: path.to_string(),
                        });
                    }

                    segments.push(Self::parse_bracket(path, &inner)?);
                    expect_key = false;
                    after_bracket = true;
                }
                _ => {
                    if after_bracket {
                        return Err(PathError::UnexpectedChar {
                            path: path.to_string(),
                            found: ch,
                            position: pos,
                        });
                    }
                    key.push(ch);
                    expect_key = false;
                }
            }
        }

        if expect_key {
            return Err(empty_segment());
        }
        if !key.is_empty() {
            segments.push(Segment::Key(key));
        }

        Ok(Self { segments })
    }

    /// Parse the content between `[` and `]`
    fn parse_bracket(path: &str, inner: &str) -> Result<Segment, PathError> {
        let quoted = inner.len() >= 2
            && ((inner.starts_with('"') && inner.ends_with('"'))
                || (inner.starts_with('\'') && inner.ends_with('\'')));
        if quoted {
            return Ok(Segment::Key(inner[1..inner.len() - 1].to_string()));
        }

        inner
            .trim()
            .parse::<usize>()
            .map(Segment::Index)
            .map_err(|_| PathError::InvalidIndex {
                path: path.to_string(),
                index: inner.to_string(),
            })
    }

    /// Parsed segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Look the path up in `data`
    ///
    /// # Returns
    /// * `Option<&Value>` - Addressed value, or None if any step is missing
    pub fn resolve<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(data, |current, segment| match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get(key),
                (Segment::Index(index), Value::Array(items)) => items.get(*index),
                _ => None,
            })
    }
}

/// Parse `path` and look it up in `data`
///
/// # Arguments
/// * `path` - Path expression
/// * `data` - Decoded JSON payload
///
/// # Returns
/// * `Result<Option<&Value>, PathError>` - Addressed value, None if absent
pub fn resolve<'a>(path: &str, data: &'a Value) -> Result<Option<&'a Value>, PathError> {
    Ok(JsonPath::parse(path)?.resolve(data))
}
