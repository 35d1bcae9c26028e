//! i3bar block serialization.
//!
//! Blocks are written with `", "` and `": "` separators and every character
//! outside printable ASCII escaped as `\uXXXX`, the byte format bar configs
//! consuming this output already match against.

use serde::Serialize;
use std::io;

/// One block of the i3bar protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub full_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
}

impl Block {
    /// A plain red block.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            full_text: text.into(),
            color: Some("#ff0000".to_string()),
            markup: None,
        }
    }

    /// A block whose text carries pango `<span>` markup.
    pub fn pango(text: impl Into<String>) -> Self {
        Self {
            full_text: text.into(),
            color: None,
            markup: Some("pango".to_string()),
        }
    }
}

/// Serializes `block` followed by the `,` the streaming protocol expects
/// between array elements.
pub fn render_line(block: &Block) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    block.serialize(&mut ser)?;
    buf.push(b',');
    // Formatter output is pure ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

struct SpacedAsciiFormatter;

impl serde_json::ser::Formatter for SpacedAsciiFormatter {
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
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if (' '..='~').contains(&c) {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_block_line() {
        let line = render_line(&Block::error("Could not connect to travelynx")).unwrap();
        assert_eq!(
            line,
            r##"{"full_text": "Could not connect to travelynx", "color": "#ff0000"},"##
        );
    }

    #[test]
    fn test_pango_block_escapes_quotes_and_umlauts() {
        let block = Block::pango(r##"RE26824, next: Düren at <span fgcolor="#ff0000">15:38+5</span>"##);
        let line = render_line(&block).unwrap();
        assert_eq!(
            line,
            r##"{"full_text": "RE26824, next: D\u00fcren at <span fgcolor=\"#ff0000\">15:38+5</span>", "markup": "pango"},"##
        );
    }

    #[test]
    fn test_astral_chars_use_surrogate_pairs() {
        let line = render_line(&Block::pango("🚆")).unwrap();
        assert_eq!(line, r#"{"full_text": "\ud83d\ude86", "markup": "pango"},"#);
    }

    #[test]
    fn test_control_chars_escaped() {
        let line = render_line(&Block::error("a\nb\u{7f}")).unwrap();
        assert!(line.starts_with(r#"{"full_text": "a\nb\u007f""#), "{line}");
    }

    #[test]
    fn test_output_is_valid_json() {
        let block = Block::pango("Köln Hbf at <span>12:00</span>");
        let line = render_line(&block).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(line.trim_end_matches(',')).unwrap();
        assert_eq!(parsed["full_text"], "Köln Hbf at <span>12:00</span>");
        assert_eq!(parsed["markup"], "pango");
        assert!(parsed.get("color").is_none());
    }
}
