//! Spaced JSON serialization
//!
//! Output files use the separators `", "` and `": "` on a single line and
//! escape every non-ASCII character as `\uXXXX`. Downstream consumers of the
//! export files expect exactly this layout.

use std::io;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::Formatter;

use crate::error::Result;

/// Single-line formatter with spaced separators and ASCII-only output
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            // DEL is ASCII but outside the printable range
            if ch.is_ascii() && ch != '\x7f' {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// JSON formatter for export output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Serialize a value into spaced JSON bytes
    ///
    /// # Arguments
    /// * `value` - Value to serialize
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - ASCII JSON text
    pub fn to_vec(value: &Value) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(128);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        value.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Serialize a value into a spaced JSON string
    pub fn to_string(value: &Value) -> Result<String> {
        let buf = Self::to_vec(value)?;
        // Output is ASCII-only
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spaced_separators() {
        let value: Value =
            serde_json::from_str(r#"{"vid":"abc","status":"success","n":[1,2]}"#).unwrap();
        assert_eq!(
            JsonFormatter::to_string(&value).unwrap(),
            r#"{"vid": "abc", "status": "success", "n": [1, 2]}"#
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(JsonFormatter::to_string(&json!({})).unwrap(), "{}");
        assert_eq!(JsonFormatter::to_string(&json!([])).unwrap(), "[]");
    }

    #[test]
    fn test_non_ascii_escaped() {
        assert_eq!(
            JsonFormatter::to_string(&json!("caf\u{e9}")).unwrap(),
            r#""caf\u00e9""#
        );
        // Astral characters become surrogate pairs
        assert_eq!(
            JsonFormatter::to_string(&json!("\u{1F600}")).unwrap(),
            r#""\ud83d\ude00""#
        );
        assert_eq!(
            JsonFormatter::to_string(&json!("a\u{7f}b")).unwrap(),
            r#""a\u007fb""#
        );
    }

    #[test]
    fn test_control_characters_still_escaped() {
        assert_eq!(
            JsonFormatter::to_string(&json!("line\n\"q\"")).unwrap(),
            r#""line\n\"q\"""#
        );
    }
}
