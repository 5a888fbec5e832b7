//! JSON text form used for signatures.
//!
//! Signatures are written as `{"a": 1, "b": [1, 2]}`: a space after every
//! `:` and `,`, no other whitespace, DEL and non-ASCII escaped as `\uXXXX`. Key order
//! is whatever the value already holds; callers decide it.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{Formatter, Serializer};
use std::io::{self, Write};

struct SignatureFormatter;

impl Formatter for SignatureFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if fragment.bytes().all(is_printable_ascii) {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() && is_printable_ascii(ch as u8) {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

// Control characters below 0x20 never reach the fragment writer; DEL does.
fn is_printable_ascii(byte: u8) -> bool {
    byte.is_ascii() && byte != 0x7f
}

/// Serialize `value` in signature form.
pub fn to_signature_string(value: &Value) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, SignatureFormatter);
    value.serialize(&mut ser)?;
    // Output is pure ASCII.
    Ok(String::from_utf8_lossy(&out).into_owned())
}
