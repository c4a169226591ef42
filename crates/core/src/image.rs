//! Structural validity probe for inline-image candidate data.

use crate::document::{ImageProbe, PageResources};
use crate::error::{Result, StreamError};
use crate::model::objects::{Dict, PdfObject};

/// Default `ImageProbe`: accepts candidate sample data when it is
/// structurally plausible for the declared filter chain.
///
/// The checks are shallow: the terminator search only needs a
/// success/failure signal, and a false rejection just keeps the scan going.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleProbe;

impl SampleProbe {
    pub fn new() -> Self {
        Self
    }

    fn first_filter(dict: &Dict) -> Option<&str> {
        match dict.get("Filter") {
            Some(PdfObject::Name(name)) => Some(name),
            Some(PdfObject::Array(arr)) => arr.first().and_then(|obj| obj.as_name().ok()),
            _ => None,
        }
    }
}

impl ImageProbe for SampleProbe {
    fn try_decode(&self, dict: &Dict, data: &[u8], _resources: &PageResources) -> Result<()> {
        let width = dict.get("Width").and_then(|o| o.as_int().ok()).unwrap_or(0);
        let height = dict.get("Height").and_then(|o| o.as_int().ok()).unwrap_or(0);
        if width <= 0 || height <= 0 {
            return Err(StreamError::DecodeError(
                "image dimensions missing or non-positive".into(),
            ));
        }
        if data.is_empty() {
            return Err(StreamError::DecodeError("empty image data".into()));
        }

        match Self::first_filter(dict) {
            Some("FlateDecode") => {
                crate::codec::inflate(data)?;
                Ok(())
            }
            Some("DCTDecode") => {
                // JPEG: SOI marker up front, EOI somewhere in the tail
                if data.starts_with(&[0xff, 0xd8])
                    && data.windows(2).rev().take(16).any(|w| w == [0xff, 0xd9])
                {
                    Ok(())
                } else {
                    Err(StreamError::DecodeError("not a JPEG payload".into()))
                }
            }
            Some("ASCIIHexDecode") => {
                let ok = data.iter().all(|&b| {
                    b.is_ascii_hexdigit()
                        || crate::parser::lexer::is_whitespace(b)
                        || b == b'>'
                });
                if ok {
                    Ok(())
                } else {
                    Err(StreamError::DecodeError("not ASCII hex data".into()))
                }
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn dict_wh(filter: Option<&str>) -> Dict {
        let mut dict = IndexMap::new();
        dict.insert("Width".to_string(), PdfObject::Int(4));
        dict.insert("Height".to_string(), PdfObject::Int(4));
        if let Some(f) = filter {
            dict.insert("Filter".to_string(), PdfObject::Name(f.to_string()));
        }
        dict
    }

    #[test]
    fn test_rejects_truncated_jpeg() {
        let probe = SampleProbe::new();
        let resources = PageResources::new();
        let dict = dict_wh(Some("DCTDecode"));
        assert!(probe.try_decode(&dict, &[0xff, 0xd8, 0x00], &resources).is_err());
        assert!(
            probe
                .try_decode(&dict, &[0xff, 0xd8, 0x01, 0x02, 0xff, 0xd9], &resources)
                .is_ok()
        );
    }

    #[test]
    fn test_rejects_missing_dimensions() {
        let probe = SampleProbe::new();
        let resources = PageResources::new();
        let dict: Dict = IndexMap::new();
        assert!(probe.try_decode(&dict, b"data", &resources).is_err());
    }
}
