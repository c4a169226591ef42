//! Inline-image sub-parser (BI ... ID ... EI).
//!
//! Inline images violate the normal token grammar: raw sample bytes follow
//! the image dictionary with no quoting, so this parser is invoked by the
//! interpreter immediately after a `BI` operator and hands back a
//! synthesized `InlineImage` operand.

use crate::document::{ImageProbe, ObjectResolver, PageResources};
use crate::error::{Result, StreamError};
use crate::model::color::{
    INLINE_COLORSPACE_ABBREV, INLINE_FILTER_ABBREV, INLINE_KEY_ABBREV, PREDEFINED_COLORSPACE,
};
use crate::model::objects::{Dict, InlineImage, PdfObject};
use crate::parser::lexer::{Operator, Token, is_whitespace};
use crate::parser::objects::ObjectParser;

/// Parse an inline image. The cursor must be positioned immediately after
/// the `BI` operator; on success it is positioned after the closing `EI`.
pub fn parse_inline_image(
    parser: &mut ObjectParser<'_>,
    resources: &PageResources,
    resolver: &dyn ObjectResolver,
    probe: &dyn ImageProbe,
) -> Result<InlineImage> {
    let dict = read_image_dict(parser)?;

    // Exactly one whitespace byte separates ID from the sample data.
    // Tolerate its absence: a non-whitespace byte is already sample data.
    if matches!(parser.lexer.peek_byte(), Some(b) if is_whitespace(b)) {
        parser.lexer.next_byte();
    }

    let data = if dict.contains_key("Filter") {
        read_filtered_samples(parser, &dict, resources, probe)?
    } else {
        let len = unfiltered_sample_len(&dict, resources, resolver)?;
        let remaining = parser.lexer.remaining();
        if remaining.len() < len {
            return Err(StreamError::UnexpectedEof);
        }
        let data = remaining[..len].to_vec();
        parser.seek(parser.tell() + len);
        expect_ei(parser)?;
        data
    };

    Ok(InlineImage { dict, data })
}

/// Read key/value pairs the way a dictionary is read, stopping at the
/// literal `ID` token instead of `>>`. Abbreviated keys and values are
/// expanded to their canonical names.
fn read_image_dict(parser: &mut ObjectParser<'_>) -> Result<Dict> {
    let mut dict = Dict::new();
    loop {
        let Some((pos, token)) = parser.next_valid_token()? else {
            return Err(StreamError::UnexpectedEof);
        };
        match token {
            Token::Op(Operator::ID) => return Ok(dict),
            // With no separator after ID the first sample byte fuses into
            // the keyword token; split it and rewind to the sample data.
            Token::Op(Operator::Other(bytes)) if bytes.starts_with(b"ID") => {
                parser.seek(pos + 2);
                return Ok(dict);
            }
            Token::Name(key) => {
                let Some((vpos, vtoken)) = parser.next_valid_token()? else {
                    return Err(StreamError::UnexpectedEof);
                };
                let value = parser.object_from_token(vpos, vtoken)?;
                let key = expand_key(&key);
                let value = match key.as_str() {
                    "ColorSpace" => expand_names(value, &INLINE_COLORSPACE_ABBREV),
                    "Filter" => expand_names(value, &INLINE_FILTER_ABBREV),
                    _ => value,
                };
                dict.insert(key, value);
            }
            _ => return Err(StreamError::MalformedDictionary { pos }),
        }
    }
}

fn expand_key(key: &str) -> String {
    INLINE_KEY_ABBREV
        .get(key)
        .map_or_else(|| key.to_string(), |full| (*full).to_string())
}

/// Expand abbreviated names, recursing into arrays (filter chains may be
/// written as `[/AHx /Fl]`).
fn expand_names(
    value: PdfObject,
    table: &std::collections::HashMap<&'static str, &'static str>,
) -> PdfObject {
    match value {
        PdfObject::Name(name) => match table.get(name.as_str()) {
            Some(full) => PdfObject::Name((*full).to_string()),
            None => PdfObject::Name(name),
        },
        PdfObject::Array(items) => PdfObject::Array(
            items
                .into_iter()
                .map(|item| expand_names(item, table))
                .collect(),
        ),
        other => other,
    }
}

/// Sample length of an unfiltered image:
/// `ceil(width * bits_per_component * components / 8) * height`.
fn unfiltered_sample_len(
    dict: &Dict,
    resources: &PageResources,
    resolver: &dyn ObjectResolver,
) -> Result<usize> {
    let width = dict
        .get("Width")
        .and_then(|o| o.as_int().ok())
        .ok_or_else(|| StreamError::DecodeError("inline image missing Width".into()))?;
    let height = dict
        .get("Height")
        .and_then(|o| o.as_int().ok())
        .ok_or_else(|| StreamError::DecodeError("inline image missing Height".into()))?;
    if width < 0 || height < 0 {
        return Err(StreamError::DecodeError(
            "inline image dimensions negative".into(),
        ));
    }

    let is_mask = matches!(dict.get("ImageMask"), Some(PdfObject::Bool(true)));
    let bpc = if is_mask {
        1
    } else {
        dict.get("BitsPerComponent")
            .and_then(|o| o.as_int().ok())
            .unwrap_or(8)
    };
    let ncomponents = if is_mask {
        1
    } else {
        colorspace_components(dict.get("ColorSpace"), resources, resolver)?
    };

    let bits_per_row = (width as usize) * (bpc as usize) * ncomponents;
    let bytes_per_row = bits_per_row.div_ceil(8);
    Ok(bytes_per_row * height as usize)
}

/// Resolve the number of color components per pixel.
///
/// The color space may be a direct name, an indirect reference, a named
/// entry in the page's `/ColorSpace` resources, or an array form such as
/// `[/Indexed base hival lookup]`. Absent color space means bi-tonal.
pub(crate) fn colorspace_components(
    cs: Option<&PdfObject>,
    resources: &PageResources,
    resolver: &dyn ObjectResolver,
) -> Result<usize> {
    let Some(cs) = cs else {
        return Ok(1);
    };

    let mut current = resolver.resolve_object(cs)?;
    for _ in 0..8 {
        match current {
            PdfObject::Name(name) => {
                if let Some(space) = PREDEFINED_COLORSPACE.get(name.as_str()) {
                    return Ok(space.ncomponents);
                }
                match resources.color_space.get(&name) {
                    Some(entry) => current = resolver.resolve_object(entry)?,
                    None => return Err(StreamError::UnresolvedColorSpace(name)),
                }
            }
            PdfObject::Array(ref items) => {
                let family = items
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .unwrap_or_default()
                    .to_string();
                return match family.as_str() {
                    "Indexed" | "I" => Ok(1),
                    "Separation" => Ok(1),
                    "DeviceN" => {
                        let names = items
                            .get(1)
                            .map(|o| resolver.resolve_object(o))
                            .transpose()?;
                        match names {
                            Some(PdfObject::Array(list)) => Ok(list.len().max(1)),
                            _ => Err(StreamError::UnresolvedColorSpace(family)),
                        }
                    }
                    "ICCBased" => {
                        let stream = items
                            .get(1)
                            .map(|o| resolver.resolve_object(o))
                            .transpose()?;
                        let n = match stream {
                            Some(PdfObject::Stream(s)) => {
                                s.get("N").and_then(|o| o.as_int().ok()).unwrap_or(3)
                            }
                            _ => 3,
                        };
                        Ok(n.max(1) as usize)
                    }
                    _ => match PREDEFINED_COLORSPACE.get(family.as_str()) {
                        Some(space) => Ok(space.ncomponents),
                        None => Err(StreamError::UnresolvedColorSpace(family)),
                    },
                };
            }
            other => {
                return Err(StreamError::UnresolvedColorSpace(format!("{other:?}")));
            }
        }
    }
    Err(StreamError::UnresolvedColorSpace(
        "color space chain too deep".into(),
    ))
}

/// Read filtered sample data by scanning for the terminator.
///
/// The sample length is unknown upfront, so the scan looks for the
/// delimiter pattern `<whitespace> E I <whitespace-or-eof>` and asks the
/// image probe whether the accumulated bytes form a plausible image. A
/// failed probe means the EI-like sequence was image data, so the scan
/// keeps going. Best-effort by construction: ambiguity biases toward
/// treating bytes as still-image-data, never toward a premature match.
fn read_filtered_samples(
    parser: &mut ObjectParser<'_>,
    dict: &Dict,
    resources: &PageResources,
    probe: &dyn ImageProbe,
) -> Result<Vec<u8>> {
    // ASCII85 data carries its own end-of-data marker; scan for it directly.
    if first_filter(dict) == Some("ASCII85Decode") {
        return read_ascii85_samples(parser);
    }

    let start = parser.tell();
    let data = parser.lexer.remaining();

    let mut i = 0;
    while i + 2 < data.len() {
        if is_whitespace(data[i])
            && data[i + 1] == b'E'
            && data[i + 2] == b'I'
            && (i + 3 >= data.len() || is_whitespace(data[i + 3]))
        {
            let candidate = &data[..i];
            if probe.try_decode(dict, candidate, resources).is_ok() {
                parser.seek(start + i + 3);
                return Ok(candidate.to_vec());
            }
        }
        i += 1;
    }

    Err(StreamError::InlineImageTerminatorNotFound)
}

fn first_filter(dict: &Dict) -> Option<&str> {
    match dict.get("Filter") {
        Some(PdfObject::Name(name)) => Some(name),
        Some(PdfObject::Array(items)) => items.first().and_then(|o| o.as_name().ok()),
        _ => None,
    }
}

/// ASCII85 sample data runs to its `~>` end-of-data marker. The marker is
/// kept as part of the stored data so verbatim re-emission stays decodable.
fn read_ascii85_samples(parser: &mut ObjectParser<'_>) -> Result<Vec<u8>> {
    let start = parser.tell();
    let data = parser.lexer.remaining();
    for i in 0..data.len().saturating_sub(1) {
        if data[i] == b'~' && data[i + 1] == b'>' {
            parser.seek(start + i + 2);
            expect_ei(parser)?;
            return Ok(data[..i + 2].to_vec());
        }
    }
    Err(StreamError::InlineImageTerminatorNotFound)
}

/// Consume the closing `EI` operator token.
fn expect_ei(parser: &mut ObjectParser<'_>) -> Result<()> {
    match parser.next_valid_token()? {
        Some((_, Token::Op(Operator::EI))) => Ok(()),
        _ => Err(StreamError::UnexpectedEof),
    }
}
