//! Content-stream interpretation.
//!
//! - `interpreter`: operand accumulation, operator dispatch, output discipline
//! - `marked`: marked-content region records and removal filters

pub mod interpreter;
pub mod marked;

pub use interpreter::{ContentInterpreter, OpClass, StreamOutcome, op_class};
pub use marked::{ContainerKind, MarkedContentInfo, RemovablePageContainer, RemovalFilter};
