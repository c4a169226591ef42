//! Content-stream parsing.
//!
//! - `lexer`: tokenizer over raw stream bytes
//! - `objects`: recursive-descent object parser with reference folding
//! - `inline`: special-cased BI/ID/EI inline-image sub-parser

pub mod inline;
pub mod lexer;
pub mod objects;

pub use inline::parse_inline_image;
pub use lexer::{ContentLexer, Operator, Token};
pub use objects::ObjectParser;
