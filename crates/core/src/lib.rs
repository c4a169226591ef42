//! delamina - selective rewriting of PDF content streams.
//!
//! Tokenizes raw content-stream bytes, reconstructs the object graph,
//! replays operators while tracking graphics and marked-content state,
//! and re-emits streams with targeted layers (optional content groups,
//! artifacts, layer-bound XObjects) removed.

pub mod codec;
pub mod document;
pub mod error;
pub mod image;
pub mod interp;
pub mod model;
pub mod parser;
pub mod rewrite;
pub mod utils;

pub use document::{
    ImageProbe, MemoryDocument, NullResolver, ObjectResolver, PageResources, StreamDecoder,
};
pub use error::{Result, StreamError};
pub use interp::{ContainerKind, ContentInterpreter, RemovablePageContainer, RemovalFilter};
pub use model::{Dict, GraphicsState, InlineImage, PdfObject, PdfRef, PdfStream};
pub use parser::{ContentLexer, ObjectParser, Operator, Token};
pub use rewrite::{DocumentCatalogue, PageInput, RemovalOutcome, RewriteEngine};
