//! Color-space component counts used for inline-image sizing.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Represents a PDF color space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpace {
    /// Name of the color space (e.g., "DeviceRGB")
    pub name: String,
    /// Number of color components per pixel
    pub ncomponents: usize,
}

impl ColorSpace {
    /// Create a new color space.
    pub fn new(name: &str, ncomponents: usize) -> Self {
        Self {
            name: name.to_string(),
            ncomponents,
        }
    }
}

/// Predefined PDF color spaces.
pub static PREDEFINED_COLORSPACE: LazyLock<HashMap<&'static str, ColorSpace>> =
    LazyLock::new(|| {
        let entries = [
            ("DeviceGray", 1),
            ("CalGray", 1),
            ("CalRGB", 3),
            ("Lab", 3),
            ("DeviceRGB", 3),
            ("DeviceCMYK", 4),
            ("Separation", 1),
            ("Indexed", 1),
            ("Pattern", 1),
        ];

        let mut map = HashMap::with_capacity(entries.len());
        for (name, n) in entries {
            map.insert(name, ColorSpace::new(name, n));
        }
        map
    });

/// Inline image color space abbreviations (`/CS` values).
pub static INLINE_COLORSPACE_ABBREV: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("G", "DeviceGray"),
            ("RGB", "DeviceRGB"),
            ("CMYK", "DeviceCMYK"),
            ("I", "Indexed"),
        ])
    });

/// Inline image filter abbreviations (`/F` values).
pub static INLINE_FILTER_ABBREV: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("AHx", "ASCIIHexDecode"),
            ("A85", "ASCII85Decode"),
            ("LZW", "LZWDecode"),
            ("Fl", "FlateDecode"),
            ("RL", "RunLengthDecode"),
            ("CCF", "CCITTFaxDecode"),
            ("DCT", "DCTDecode"),
        ])
    });

/// Inline image key abbreviations (`BI` dictionary keys).
pub static INLINE_KEY_ABBREV: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("BPC", "BitsPerComponent"),
            ("CS", "ColorSpace"),
            ("D", "Decode"),
            ("DP", "DecodeParms"),
            ("F", "Filter"),
            ("H", "Height"),
            ("IM", "ImageMask"),
            ("I", "Interpolate"),
            ("W", "Width"),
        ])
    });
