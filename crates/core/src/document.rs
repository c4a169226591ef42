//! Collaborator contracts implemented by the surrounding document layer.
//!
//! The content-stream core never parses cross-reference tables or page
//! trees; it consumes those capabilities through the traits below.

use crate::error::{Result, StreamError};
use crate::model::objects::{Dict, PdfObject, PdfRef, PdfStream};
use rustc_hash::FxHashMap;

/// Dereferences indirect references against the document's object table.
pub trait ObjectResolver {
    fn resolve(&self, r: &PdfRef) -> Result<PdfObject>;

    /// Resolve an object if it is a reference, otherwise clone it.
    /// Chains of references are followed to a fixed depth.
    fn resolve_object(&self, obj: &PdfObject) -> Result<PdfObject> {
        let mut current = obj.clone();
        for _ in 0..32 {
            match current {
                PdfObject::Ref(r) => current = self.resolve(&r)?,
                other => return Ok(other),
            }
        }
        Err(StreamError::DecodeError("reference chain too deep".into()))
    }
}

/// Returns decoded (filter-applied) bytes of a stream object.
pub trait StreamDecoder {
    fn stream_bytes(&self, stream: &PdfStream) -> Result<Vec<u8>>;
}

/// Validity probe used by the filtered inline-image terminator search.
///
/// Implementations only report whether the candidate bytes form a
/// plausible image; the core never needs decoded pixels.
pub trait ImageProbe {
    fn try_decode(&self, dict: &Dict, data: &[u8], resources: &PageResources) -> Result<()>;
}

/// Lookup dictionaries supplied by the page's resource dictionary.
#[derive(Debug, Clone, Default)]
pub struct PageResources {
    /// `/Properties` - marked-content property lists (OCG lookups)
    pub properties: Dict,
    /// `/XObject` - form and image XObjects
    pub xobject: Dict,
    /// `/ColorSpace` - named color spaces for inline images
    pub color_space: Dict,
}

impl PageResources {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Minimal in-memory object table implementing `ObjectResolver`.
///
/// Not a PDF file parser: callers (and tests) populate it with already
/// parsed objects.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    objects: FxHashMap<PdfRef, PdfObject>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object under (objid, genno).
    pub fn insert(&mut self, objid: u32, genno: u16, obj: PdfObject) {
        self.objects.insert(PdfRef::new(objid, genno), obj);
    }

    pub fn get(&self, objid: u32, genno: u16) -> Option<&PdfObject> {
        self.objects.get(&PdfRef::new(objid, genno))
    }
}

impl ObjectResolver for MemoryDocument {
    fn resolve(&self, r: &PdfRef) -> Result<PdfObject> {
        self.objects
            .get(r)
            .cloned()
            .ok_or(StreamError::ObjectNotFound {
                objid: r.objid,
                genno: r.genno,
            })
    }
}

/// Resolver for documents with no indirect objects; every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl ObjectResolver for NullResolver {
    fn resolve(&self, r: &PdfRef) -> Result<PdfObject> {
        Err(StreamError::ObjectNotFound {
            objid: r.objid,
            genno: r.genno,
        })
    }
}
