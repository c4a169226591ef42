//! Default `StreamDecoder` for the common FlateDecode case.

use crate::document::StreamDecoder;
use crate::error::{Result, StreamError};
use crate::model::objects::{PdfObject, PdfStream};
use flate2::read::ZlibDecoder;
use std::io::Read;

/// Decodes `/FlateDecode` streams and passes through filterless streams.
/// Any other filter name is an error, never silently-raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlateCodec;

impl FlateCodec {
    pub fn new() -> Self {
        Self
    }

    fn filter_names(stream: &PdfStream) -> Vec<String> {
        match stream.get_any(&["Filter", "F"]) {
            Some(PdfObject::Name(name)) => vec![name.clone()],
            Some(PdfObject::Array(arr)) => arr
                .iter()
                .filter_map(|obj| obj.as_name().ok().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl StreamDecoder for FlateCodec {
    fn stream_bytes(&self, stream: &PdfStream) -> Result<Vec<u8>> {
        let filters = Self::filter_names(stream);
        if filters.is_empty() {
            return Ok(stream.rawdata().to_vec());
        }
        if filters.len() == 1 && matches!(filters[0].as_str(), "FlateDecode" | "Fl") {
            return inflate(stream.rawdata());
        }
        Err(StreamError::DecodeError(format!(
            "unsupported filter chain: {}",
            filters.join(" ")
        )))
    }
}

/// Decompress a zlib/deflate payload.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| StreamError::DecodeError(format!("flate: {e}")))?;
    Ok(out)
}
