//! Marked-content region tracking and removal filters.

use crate::model::objects::Dict;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// How a marked-content region was classified at its `BDC`/`BMC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerKind {
    /// `/OC` region belonging to an optional content group
    Oc,
    /// `/Artifact` region (headers, footers, watermark artifacts)
    Artifact,
    /// Any other tag, including plain `BMC` regions
    Other,
}

/// Tag and property list attached to a `BDC` operator.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedContentInfo {
    /// Region tag (e.g. "OC", "Artifact", "Span")
    pub tag: String,
    /// Property dictionary, inline or resolved through `/Properties`
    pub properties: Dict,
    /// Property-list resource name the dictionary was resolved from, if any
    pub property_name: Option<String>,
    /// Marked content identifier, when present
    pub mcid: Option<i64>,
}

/// Per-region record, indexed by a monotonically increasing integer
/// assigned in document order (at the region's closing `EMC`). Created
/// when the region opens, appended to while its operators are processed,
/// never mutated after it closes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovablePageContainer {
    /// Region classification
    pub kind: ContainerKind,
    /// Layer name: OCG `/Name` for OC regions, `/Subtype` for artifacts,
    /// the raw tag otherwise
    pub layer_name: String,
    /// Marked content identifier, when present
    pub mcid: Option<i64>,
    /// Text shown inside the region, for inspection and reporting
    pub text: String,
    /// Names of XObjects invoked inside the region
    pub xobject_refs: Vec<String>,
}

impl RemovablePageContainer {
    pub fn new(kind: ContainerKind, layer_name: String, mcid: Option<i64>) -> Self {
        Self {
            kind,
            layer_name,
            mcid,
            text: String::new(),
            xobject_refs: Vec::new(),
        }
    }
}

/// Caller-supplied filter deciding which regions the removal pass drops:
/// a set of layer names, a set of explicit region indices, or both.
#[derive(Debug, Clone, Default)]
pub struct RemovalFilter {
    layer_names: FxHashSet<String>,
    indices: FxHashSet<usize>,
}

impl RemovalFilter {
    /// Filter matching regions whose layer name is in `names`.
    pub fn by_layer_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            layer_names: names.into_iter().map(Into::into).collect(),
            indices: FxHashSet::default(),
        }
    }

    /// Filter matching regions by their page-order index.
    pub fn by_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        Self {
            layer_names: FxHashSet::default(),
            indices: indices.into_iter().collect(),
        }
    }

    /// The layer names this filter targets (drives XObject removability).
    pub fn layer_names(&self) -> &FxHashSet<String> {
        &self.layer_names
    }

    pub fn is_empty(&self) -> bool {
        self.layer_names.is_empty() && self.indices.is_empty()
    }

    /// Decide removability at `BDC` time, before the region's content is
    /// seen. `Other` regions are only ever matched by explicit index.
    pub fn matches(&self, index: usize, kind: ContainerKind, layer_name: &str) -> bool {
        if self.indices.contains(&index) {
            return true;
        }
        match kind {
            ContainerKind::Oc | ContainerKind::Artifact => self.layer_names.contains(layer_name),
            ContainerKind::Other => false,
        }
    }
}
