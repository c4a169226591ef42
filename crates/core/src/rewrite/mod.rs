//! Selective rewriting: the two-pass engine, document cleanup and the
//! output serializer.

pub mod cleanup;
pub mod engine;
pub mod serialize;

pub use cleanup::{oc_layer_names, prune_annotations, prune_oc_properties, prune_properties};
pub use engine::{
    ContainerEntry, DocumentCatalogue, PageCatalogue, PageInput, PageResult, RemovalOutcome,
    RewriteEngine, RewriteReport, StreamFailure, XObjectLayer,
};
