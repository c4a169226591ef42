//! Data model: objects, graphics state, and color definitions.

pub mod color;
pub mod objects;
pub mod state;

pub use color::ColorSpace;
pub use objects::{Dict, InlineImage, PdfObject, PdfRef, PdfStream};
pub use state::GraphicsState;
