//! Two-pass rewrite engine.
//!
//! Pass 1 (discovery) runs the interpreter read-only over every page and
//! produces a catalogue of removable regions and layer-bound XObjects.
//! Pass 2 (removal) re-runs the interpreter with a caller-supplied filter.
//! Discovery-pass and removal-pass region indices line up 1:1 as long as
//! the input bytes are identical between passes, so no mutation may happen
//! in between.

use crate::document::{ImageProbe, ObjectResolver, PageResources};
use crate::interp::interpreter::ContentInterpreter;
use crate::interp::marked::{ContainerKind, RemovablePageContainer, RemovalFilter};
use crate::model::objects::PdfObject;
use crate::rewrite::cleanup::oc_layer_names;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeSet;

/// One page's decoded content stream and resource lookups.
#[derive(Debug, Clone, Default)]
pub struct PageInput {
    /// Decoded (filter-applied) content stream bytes
    pub content: Vec<u8>,
    /// Page resource dictionaries
    pub resources: PageResources,
}

/// Catalogue entry for one marked-content region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerEntry {
    /// Page-order region index (the removal filter's index space)
    pub index: usize,
    pub kind: ContainerKind,
    pub layer_name: String,
    pub mcid: Option<i64>,
    pub text: String,
    pub xobject_refs: Vec<String>,
}

impl ContainerEntry {
    fn from_container(index: usize, container: RemovablePageContainer) -> Self {
        Self {
            index,
            kind: container.kind,
            layer_name: container.layer_name,
            mcid: container.mcid,
            text: container.text,
            xobject_refs: container.xobject_refs,
        }
    }
}

/// An XObject bound to an optional-content layer through its `/OC` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XObjectLayer {
    /// XObject resource name (the `Do` operand)
    pub name: String,
    /// Layer name its `/OC` resolves to
    pub layer_name: String,
}

/// What discovery found on one page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageCatalogue {
    pub containers: Vec<ContainerEntry>,
    pub removable_xobjects: Vec<XObjectLayer>,
    /// Parse failure, if the page's stream could not be interpreted
    pub error: Option<String>,
}

/// Human-inspectable summary of a document's removable content.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentCatalogue {
    pub pages: Vec<PageCatalogue>,
}

impl DocumentCatalogue {
    /// All layer names seen across the document, OC and Artifact regions
    /// plus layer-bound XObjects.
    pub fn layer_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for page in &self.pages {
            for entry in &page.containers {
                if matches!(entry.kind, ContainerKind::Oc | ContainerKind::Artifact)
                    && !entry.layer_name.is_empty()
                {
                    names.insert(entry.layer_name.clone());
                }
            }
            for xobj in &page.removable_xobjects {
                names.insert(xobj.layer_name.clone());
            }
        }
        names
    }
}

/// One page's removal result. On failure the original bytes are kept.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub content: Vec<u8>,
    pub rewritten: bool,
}

/// Per-stream failure record.
#[derive(Debug, Clone, Serialize)]
pub struct StreamFailure {
    pub page_index: usize,
    pub error: String,
}

/// Failures collected during a pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RewriteReport {
    pub failures: Vec<StreamFailure>,
}

/// Outcome of the removal pass.
#[derive(Debug, Clone)]
pub struct RemovalOutcome {
    pub pages: Vec<PageResult>,
    pub report: RewriteReport,
}

/// The rewrite engine, generic over the document collaborators.
pub struct RewriteEngine<'a> {
    resolver: &'a dyn ObjectResolver,
    probe: &'a dyn ImageProbe,
}

impl<'a> RewriteEngine<'a> {
    pub fn new(resolver: &'a dyn ObjectResolver, probe: &'a dyn ImageProbe) -> Self {
        Self { resolver, probe }
    }

    /// Discovery pass: interpret every page with no removal filter and
    /// catalogue its regions and layer-bound XObjects.
    pub fn discover(&self, pages: &[PageInput]) -> DocumentCatalogue {
        let mut catalogue = DocumentCatalogue::default();

        for (page_index, page) in pages.iter().enumerate() {
            let mut entry = PageCatalogue {
                removable_xobjects: self.xobject_layers(&page.resources),
                ..PageCatalogue::default()
            };

            let interp = ContentInterpreter::new(&page.resources, self.resolver, self.probe);
            match interp.process(&page.content) {
                Ok(outcome) => {
                    entry.containers = outcome
                        .containers
                        .into_iter()
                        .map(|(index, container)| ContainerEntry::from_container(index, container))
                        .collect();
                }
                Err(e) => {
                    tracing::warn!(page = page_index, error = %e, "discovery failed for content stream");
                    entry.error = Some(e.to_string());
                }
            }
            catalogue.pages.push(entry);
        }

        catalogue
    }

    /// Removal pass: re-interpret every page with `filter` active. Each
    /// stream's output is committed only if it parses fully; a failed
    /// stream keeps its original bytes and is recorded in the report.
    pub fn remove(&self, pages: &[PageInput], filter: &RemovalFilter) -> RemovalOutcome {
        let mut outcome = RemovalOutcome {
            pages: Vec::with_capacity(pages.len()),
            report: RewriteReport::default(),
        };

        for (page_index, page) in pages.iter().enumerate() {
            let xobjects_to_remove = self.removable_xobject_names(&page.resources, filter);
            let interp = ContentInterpreter::with_filter(
                &page.resources,
                self.resolver,
                self.probe,
                filter,
                xobjects_to_remove,
            );
            match interp.process(&page.content) {
                Ok(result) => outcome.pages.push(PageResult {
                    content: result.output,
                    rewritten: true,
                }),
                Err(e) => {
                    tracing::warn!(page = page_index, error = %e, "removal failed, keeping original stream");
                    outcome.report.failures.push(StreamFailure {
                        page_index,
                        error: e.to_string(),
                    });
                    outcome.pages.push(PageResult {
                        content: page.content.clone(),
                        rewritten: false,
                    });
                }
            }
        }

        outcome
    }

    /// Inspect the page's XObject resources for `/OC` entries.
    fn xobject_layers(&self, resources: &PageResources) -> Vec<XObjectLayer> {
        let mut layers = Vec::new();
        for (name, entry) in resources.xobject.iter() {
            let Ok(resolved) = self.resolver.resolve_object(entry) else {
                continue;
            };
            let oc = match &resolved {
                PdfObject::Stream(stream) => stream.get("OC").cloned(),
                PdfObject::Dict(dict) => dict.get("OC").cloned(),
                _ => None,
            };
            let Some(oc) = oc else { continue };
            for layer_name in oc_layer_names(&oc, self.resolver) {
                layers.push(XObjectLayer {
                    name: name.clone(),
                    layer_name,
                });
            }
        }
        layers
    }

    /// Names of XObjects whose `/OC` layer is targeted by the filter.
    /// Independent of marked-content state by design.
    fn removable_xobject_names(
        &self,
        resources: &PageResources,
        filter: &RemovalFilter,
    ) -> FxHashSet<String> {
        self.xobject_layers(resources)
            .into_iter()
            .filter(|xobj| filter.layer_names().contains(&xobj.layer_name))
            .map(|xobj| xobj.name)
            .collect()
    }
}
