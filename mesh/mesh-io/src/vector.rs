//! Parsing of delimited coordinate triples such as `(1.0, 2.3, 33.0)`.
//!
//! # Grammar
//!
//! ```text
//! vector  := open ws num ws ',' ws num ws ',' ws num ws [close] ws
//! open    := '(' | '[' | '{' | '<'
//! close   := ')' | ']' | '}' | '>'
//! ```
//!
//! Exactly three components are required. Two or four values are errors,
//! never truncated or padded. The closing bracket need not pair with the
//! opening one.

use mesh_types::Vector3;

use crate::error::{IoError, IoResult};

const fn is_open(c: char) -> bool {
    matches!(c, '(' | '[' | '{' | '<')
}

const fn is_close(c: char) -> bool {
    matches!(c, ')' | ']' | '}' | '>')
}

/// Parse a delimited textual triple into a vector.
///
/// # Errors
///
/// Returns [`IoError::Parse`] if:
/// - the leading delimiter is missing
/// - fewer or more than three numeric components are present
/// - a separator between components is not a comma
/// - a component is not a valid floating-point number
///
/// # Example
///
/// ```
/// use mesh_io::parse_vector3;
///
/// let v = parse_vector3("(1.0, 2.3, 33.0)").unwrap();
/// assert_eq!((v.x, v.y, v.z), (1.0, 2.3, 33.0));
///
/// assert!(parse_vector3("(1.0, 2.3)").is_err());
/// assert!(parse_vector3("(1,2,3,4)").is_err());
/// ```
pub fn parse_vector3(text: &str) -> IoResult<Vector3<f64>> {
    let text = text.trim();
    let open = text
        .chars()
        .next()
        .ok_or_else(|| IoError::parse("empty vector text, expected an opening delimiter"))?;
    if !is_open(open) {
        return Err(IoError::parse(format!("expected an opening delimiter, found '{open}'")));
    }

    let mut rest = &text[open.len_utf8()..];
    let mut components = [0.0_f64; 3];

    for (i, slot) in components.iter_mut().enumerate() {
        rest = rest.trim_start();
        let end = rest
            .find(|c: char| c.is_whitespace() || c == ',' || is_close(c))
            .unwrap_or(rest.len());
        let token = &rest[..end];
        if token.is_empty() {
            return Err(IoError::parse(format!("expected 3 components, found {i}")));
        }
        *slot = token
            .parse()
            .map_err(|e| IoError::parse(format!("invalid component '{token}': {e}")))?;

        rest = rest[end..].trim_start();
        if i == 2 {
            break;
        }
        match rest.chars().next() {
            Some(',') => rest = &rest[1..],
            Some(c) if is_close(c) => {
                return Err(IoError::parse(format!(
                    "expected 3 components, found {}",
                    i + 1
                )));
            }
            None => {
                return Err(IoError::parse(format!(
                    "expected 3 components, found {}",
                    i + 1
                )));
            }
            Some(c) => {
                return Err(IoError::parse(format!("expected ',' between components, found '{c}'")));
            }
        }
    }

    match rest.chars().next() {
        None => {}
        Some(',') => {
            return Err(IoError::parse("expected 3 components, found more"));
        }
        Some(c) if is_close(c) => {
            if !rest[c.len_utf8()..].trim().is_empty() {
                return Err(IoError::parse(format!("unexpected text after closing '{c}'")));
            }
        }
        Some(c) => {
            return Err(IoError::parse(format!("unexpected '{c}' after the third component")));
        }
    }

    let [x, y, z] = components;
    Ok(Vector3::new(x, y, z))
}
