//! Graphics state tracked while replaying a content stream.

use crate::utils::{MATRIX_IDENTITY, Matrix};

/// Graphics state snapshot saved by `q` and restored by `Q`.
///
/// A plain value type: `q` pushes a clone onto the state stack and `Q` pops
/// it back, with no sharing between snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    /// Current transformation matrix
    pub ctm: Matrix,
    /// Character spacing (Tc)
    pub char_spacing: f64,
    /// Word spacing (Tw)
    pub word_spacing: f64,
    /// Horizontal scaling percentage (Tz, 100 = normal)
    pub horiz_scaling: f64,
    /// Text leading (TL)
    pub leading: f64,
    /// Active font resource name (Tf), None until set
    pub font: Option<String>,
    /// Font size in user units (Tf)
    pub font_size: f64,
    /// Text rendering mode (Tr, 0-7)
    pub render_mode: i32,
    /// Text rise (Ts)
    pub rise: f64,
    /// Text knockout flag (set via ExtGState /TK)
    pub knockout: bool,
}

impl GraphicsState {
    /// Create a new graphics state with default values.
    pub fn new() -> Self {
        Self {
            ctm: MATRIX_IDENTITY,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horiz_scaling: 100.0,
            leading: 0.0,
            font: None,
            font_size: 0.0,
            render_mode: 0,
            rise: 0.0,
            knockout: true,
        }
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self::new()
    }
}
