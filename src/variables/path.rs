//! Placeholder path resolution.
//!
//! A placeholder such as `{{user.addresses[0].city}}` names a path into the
//! data context. This module splits the path into segments and walks a
//! `serde_json::Value` tree with them.
//!
//! # Syntax
//!
//! ```text
//! .                  the whole context
//! name               object field
//! user.name          nested field
//! items[0]           array index
//! items.0            array index (numeric dotted segment)
//! .user.name         leading dot is allowed
//! ```

use serde_json::Value;

/// Represents a segment in a placeholder path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object field access (e.g., "user", "name").
    ///
    /// A field made only of digits also indexes into arrays.
    Field(String),

    /// Array index access (e.g., [0], [5])
    Index(usize),
}

/// Parses a placeholder path into segments.
///
/// An empty path, or `.`, yields no segments and therefore refers to the
/// whole context.
///
/// # Examples
///
/// ```
/// use request_template::variables::path::{parse_path, PathSegment};
///
/// assert_eq!(
///     parse_path("items[0].id"),
///     vec![
///         PathSegment::Field("items".to_string()),
///         PathSegment::Index(0),
///         PathSegment::Field("id".to_string()),
///     ]
/// );
/// assert!(parse_path(".").is_empty());
/// ```
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.trim().chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Field(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Field(std::mem::take(&mut current)));
                }

                let mut index_str = String::new();
                while let Some(&next_ch) = chars.peek() {
                    chars.next();
                    if next_ch == ']' {
                        break;
                    }
                    index_str.push(next_ch);
                }

                // Bracketed keys: items[0] indexes, data["key"] / data[key] selects a field
                let key = index_str.trim().trim_matches(|c| c == '"' || c == '\'');
                match key.parse::<usize>() {
                    Ok(index) => segments.push(PathSegment::Index(index)),
                    Err(_) if !key.is_empty() => segments.push(PathSegment::Field(key.to_string())),
                    Err(_) => {}
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(PathSegment::Field(current));
    }

    segments
}

/// Resolves a path against a data context.
///
/// Returns `None` when any segment is missing: an absent field, an index out
/// of bounds, or a segment applied to a scalar.
///
/// # Examples
///
/// ```
/// use request_template::variables::path::resolve_path;
/// use serde_json::json;
///
/// let data = json!({"user": {"tags": ["a", "b"]}});
/// assert_eq!(resolve_path(&data, "user.tags[1]"), Some(&json!("b")));
/// assert_eq!(resolve_path(&data, "user.tags.0"), Some(&json!("a")));
/// assert_eq!(resolve_path(&data, "user.email"), None);
/// ```
pub fn resolve_path<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    parse_path(path)
        .iter()
        .try_fold(context, |current, segment| match segment {
            PathSegment::Field(name) => match current {
                Value::Object(map) => map.get(name),
                Value::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            },
            PathSegment::Index(index) => current.as_array().and_then(|items| items.get(*index)),
        })
}

/// Converts a resolved value to the text inserted in place of a placeholder.
///
/// - Strings: returned as-is (without quotes)
/// - Numbers, booleans: their JSON text
/// - Null: empty string
/// - Objects, arrays: compact JSON
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
