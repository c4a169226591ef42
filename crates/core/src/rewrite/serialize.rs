//! Canonical serialization of surviving tokens.
//!
//! The rewrite output is a lossy-by-design canonicalization: operand
//! spacing and line breaks are normalized, byte values are not. The
//! contract is "semantically equivalent minus removed content".

use crate::model::objects::{InlineImage, PdfObject};
use crate::parser::lexer::Operator;

/// Append the serialized form of an object.
pub fn write_object(obj: &PdfObject, out: &mut Vec<u8>) {
    match obj {
        PdfObject::Null => out.extend_from_slice(b"null"),
        PdfObject::Bool(true) => out.extend_from_slice(b"true"),
        PdfObject::Bool(false) => out.extend_from_slice(b"false"),
        PdfObject::Int(n) => out.extend_from_slice(n.to_string().as_bytes()),
        PdfObject::Real(v) => write_real(*v, out),
        PdfObject::Name(name) => write_name(name, out),
        PdfObject::String { bytes, hex: false } => write_literal_string(bytes, out),
        PdfObject::String { bytes, hex: true } => write_hex_string(bytes, out),
        PdfObject::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                write_object(item, out);
            }
            out.push(b']');
        }
        PdfObject::Dict(dict) => {
            out.extend_from_slice(b"<<");
            for (i, (key, value)) in dict.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                write_name(key, out);
                out.push(b' ');
                write_object(value, out);
            }
            out.extend_from_slice(b">>");
        }
        PdfObject::Stream(stream) => {
            // Streams do not occur inline in content; keep the dictionary
            write_object(&PdfObject::Dict(stream.attrs.clone()), out);
        }
        PdfObject::Ref(r) => {
            out.extend_from_slice(format!("{} {} R", r.objid, r.genno).as_bytes());
        }
        PdfObject::Op(op) => out.extend_from_slice(op.as_bytes()),
        PdfObject::InlineImage(image) => write_inline_image(image, out),
    }
}

/// Emit one operator line: operands in encountered order, each followed by
/// a space, then the mnemonic, then a newline.
pub fn write_operator_line(operands: &[PdfObject], op: &Operator, out: &mut Vec<u8>) {
    for operand in operands {
        write_object(operand, out);
        out.push(b' ');
    }
    out.extend_from_slice(op.as_bytes());
    out.push(b'\n');
}

/// Re-emit an inline image verbatim: `BI <dict-entries> ID <samples> EI`.
/// Sample bytes are never re-encoded.
pub fn write_inline_image(image: &InlineImage, out: &mut Vec<u8>) {
    out.extend_from_slice(b"BI");
    for (key, value) in image.dict.iter() {
        out.push(b' ');
        write_name(key, out);
        out.push(b' ');
        write_object(value, out);
    }
    out.extend_from_slice(b" ID\n");
    out.extend_from_slice(&image.data);
    out.extend_from_slice(b"\nEI");
}

fn write_real(v: f64, out: &mut Vec<u8>) {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        out.extend_from_slice(format!("{}", v as i64).as_bytes());
        return;
    }
    let s = format!("{v}");
    if s.contains('e') || s.contains('E') {
        // Scientific notation is not PDF syntax; fall back to fixed point
        let fixed = format!("{v:.6}");
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        out.extend_from_slice(trimmed.as_bytes());
    } else {
        out.extend_from_slice(s.as_bytes());
    }
}

fn write_name(name: &str, out: &mut Vec<u8>) {
    out.push(b'/');
    for &b in name.as_bytes() {
        let needs_escape = b == b'#'
            || !(33..=126).contains(&b)
            || crate::parser::lexer::is_delimiter(b);
        if needs_escape {
            out.extend_from_slice(format!("#{b:02X}").as_bytes());
        } else {
            out.push(b);
        }
    }
}

fn write_literal_string(bytes: &[u8], out: &mut Vec<u8>) {
    out.push(b'(');
    for &b in bytes {
        match b {
            b'(' => out.extend_from_slice(b"\\("),
            b')' => out.extend_from_slice(b"\\)"),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0c => out.extend_from_slice(b"\\f"),
            b if b < 0x20 => out.extend_from_slice(format!("\\{b:03o}").as_bytes()),
            b => out.push(b),
        }
    }
    out.push(b')');
}

fn write_hex_string(bytes: &[u8], out: &mut Vec<u8>) {
    out.push(b'<');
    for &b in bytes {
        out.extend_from_slice(format!("{b:02X}").as_bytes());
    }
    out.push(b'>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::objects::Dict;

    fn serialized(obj: &PdfObject) -> String {
        let mut out = Vec::new();
        write_object(obj, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_string_escaping() {
        let obj = PdfObject::literal_string(b"a(b)c\\".to_vec());
        assert_eq!(serialized(&obj), "(a\\(b\\)c\\\\)");
    }

    #[test]
    fn test_hex_string() {
        let obj = PdfObject::String {
            bytes: vec![0x48, 0x69],
            hex: true,
        };
        assert_eq!(serialized(&obj), "<4869>");
    }

    #[test]
    fn test_name_escaping() {
        assert_eq!(serialized(&PdfObject::Name("A B".to_string())), "/A#20B");
    }

    #[test]
    fn test_operator_line() {
        let mut out = Vec::new();
        write_operator_line(
            &[PdfObject::Int(1), PdfObject::Int(2)],
            &Operator::Td,
            &mut out,
        );
        assert_eq!(out, b"1 2 Td\n");
    }

    #[test]
    fn test_dict_round_trips_in_order() {
        let mut dict = Dict::new();
        dict.insert("Width".to_string(), PdfObject::Int(2));
        dict.insert("Height".to_string(), PdfObject::Int(1));
        assert_eq!(serialized(&PdfObject::Dict(dict)), "<</Width 2 /Height 1>>");
    }
}
