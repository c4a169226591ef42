//! Document-level structural cleanup after layer removal.
//!
//! Run once per document: annotation dictionaries whose `/OC` names a
//! removed layer are dropped, removed-layer entries are stripped from each
//! page's `/Properties` resource dictionary, and the document-wide
//! `/OCProperties` configuration arrays are pruned of any dictionary
//! referencing a removed layer name.

use crate::document::ObjectResolver;
use crate::model::objects::{Dict, PdfObject};
use rustc_hash::FxHashSet;

/// Collect every layer name reachable from an optional-content entry:
/// an OCG dictionary's `/Name`, or all OCGs referenced by an OCMD's
/// `/OCGs` (single reference or array). Explicit worklist, no recursion.
pub fn oc_layer_names(obj: &PdfObject, resolver: &dyn ObjectResolver) -> Vec<String> {
    let mut names = Vec::new();
    let mut worklist = vec![obj.clone()];

    while let Some(item) = worklist.pop() {
        let Ok(resolved) = resolver.resolve_object(&item) else {
            continue;
        };
        match resolved {
            PdfObject::Dict(dict) => {
                match dict.get("Name") {
                    Some(PdfObject::String { bytes, .. }) => {
                        names.push(String::from_utf8_lossy(bytes).into_owned());
                    }
                    Some(PdfObject::Name(name)) => names.push(name.clone()),
                    _ => {}
                }
                if let Some(ocgs) = dict.get("OCGs") {
                    worklist.push(ocgs.clone());
                }
            }
            PdfObject::Array(items) => worklist.extend(items),
            _ => {}
        }
    }

    names
}

/// Whether an object resolves to an optional-content dictionary that
/// references one of the removed layer names.
fn references_removed(
    obj: &PdfObject,
    removed: &FxHashSet<String>,
    resolver: &dyn ObjectResolver,
) -> bool {
    match resolver.resolve_object(obj) {
        Ok(dict @ PdfObject::Dict(_)) => oc_layer_names(&dict, resolver)
            .iter()
            .any(|name| removed.contains(name)),
        _ => false,
    }
}

/// Drop annotation entries whose `/OC` names a removed layer.
pub fn prune_annotations(
    annots: &[PdfObject],
    removed: &FxHashSet<String>,
    resolver: &dyn ObjectResolver,
) -> Vec<PdfObject> {
    annots
        .iter()
        .filter(|annot| {
            let oc = resolver
                .resolve_object(annot)
                .ok()
                .and_then(|obj| obj.as_dict().ok().and_then(|d| d.get("OC").cloned()));
            match oc {
                Some(oc) => !oc_layer_names(&oc, resolver)
                    .iter()
                    .any(|name| removed.contains(name)),
                None => true,
            }
        })
        .cloned()
        .collect()
}

/// Strip removed-layer entries from a page's `/Properties` dictionary.
pub fn prune_properties(
    properties: &Dict,
    removed: &FxHashSet<String>,
    resolver: &dyn ObjectResolver,
) -> Dict {
    properties
        .iter()
        .filter(|(_, value)| {
            !oc_layer_names(value, resolver)
                .iter()
                .any(|name| removed.contains(name))
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Prune the `/OCProperties` dictionary (`/OCGs`, `/D`, `/Configs` and the
/// arrays nested inside them: `/ON /OFF /Locked /RBGroups /Order /AS`).
pub fn prune_oc_properties(
    oc_properties: &Dict,
    removed: &FxHashSet<String>,
    resolver: &dyn ObjectResolver,
) -> Dict {
    oc_properties
        .iter()
        .map(|(key, value)| (key.clone(), prune_value(value.clone(), removed, resolver)))
        .collect()
}

/// Worklist state for `prune_value`.
enum Frame {
    Array {
        pending: std::vec::IntoIter<PdfObject>,
        done: Vec<PdfObject>,
    },
    Dict {
        pending: indexmap::map::IntoIter<String, PdfObject>,
        done: Dict,
        key: Option<String>,
    },
}

/// Remove, at any nesting depth, array elements that reference a removed
/// layer. Implemented with an explicit stack so adversarial nesting cannot
/// overflow the call stack.
pub fn prune_value(
    obj: PdfObject,
    removed: &FxHashSet<String>,
    resolver: &dyn ObjectResolver,
) -> PdfObject {
    let mut stack: Vec<Frame> = Vec::new();
    let mut descend: Option<PdfObject> = Some(obj);
    let mut finished: Option<PdfObject> = None;

    loop {
        if let Some(value) = descend.take() {
            match value {
                PdfObject::Array(items) => stack.push(Frame::Array {
                    pending: items.into_iter(),
                    done: Vec::new(),
                }),
                PdfObject::Dict(dict) => stack.push(Frame::Dict {
                    pending: dict.into_iter(),
                    done: Dict::new(),
                    key: None,
                }),
                leaf => finished = Some(leaf),
            }
        }

        let Some(frame) = stack.last_mut() else {
            return finished.expect("pruned value");
        };

        match frame {
            Frame::Array { pending, done } => {
                if let Some(value) = finished.take() {
                    done.push(value);
                }
                let next = pending.find(|item| !references_removed(item, removed, resolver));
                match next {
                    Some(item) => descend = Some(item),
                    None => {
                        let Some(Frame::Array { done, .. }) = stack.pop() else {
                            unreachable!()
                        };
                        finished = Some(PdfObject::Array(done));
                    }
                }
            }
            Frame::Dict { pending, done, key } => {
                if let Some(value) = finished.take() {
                    if let Some(k) = key.take() {
                        done.insert(k, value);
                    }
                }
                match pending.next() {
                    Some((k, v)) => {
                        *key = Some(k);
                        descend = Some(v);
                    }
                    None => {
                        let Some(Frame::Dict { done, .. }) = stack.pop() else {
                            unreachable!()
                        };
                        finished = Some(PdfObject::Dict(done));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MemoryDocument, NullResolver};
    use crate::model::objects::PdfRef;

    fn ocg(name: &str) -> PdfObject {
        let mut dict = Dict::new();
        dict.insert("Type".to_string(), PdfObject::Name("OCG".to_string()));
        dict.insert("Name".to_string(), PdfObject::literal_string(name.as_bytes()));
        PdfObject::Dict(dict)
    }

    fn removed(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_oc_layer_names_through_ocmd() {
        let mut doc = MemoryDocument::new();
        doc.insert(7, 0, ocg("Watermark"));
        let mut ocmd = Dict::new();
        ocmd.insert(
            "OCGs".to_string(),
            PdfObject::Array(vec![PdfObject::Ref(PdfRef::new(7, 0))]),
        );
        let names = oc_layer_names(&PdfObject::Dict(ocmd), &doc);
        assert_eq!(names, vec!["Watermark".to_string()]);
    }

    #[test]
    fn test_prune_deep_nesting() {
        // /Order style nesting: [label [ocg [ocg]]]
        let value = PdfObject::Array(vec![
            PdfObject::literal_string(b"Layers".to_vec()),
            PdfObject::Array(vec![
                ocg("Keep"),
                PdfObject::Array(vec![ocg("Watermark")]),
            ]),
        ]);
        let pruned = prune_value(value, &removed(&["Watermark"]), &NullResolver);
        assert_eq!(
            pruned,
            PdfObject::Array(vec![
                PdfObject::literal_string(b"Layers".to_vec()),
                PdfObject::Array(vec![ocg("Keep"), PdfObject::Array(vec![])]),
            ])
        );
    }

    #[test]
    fn test_prune_survives_adversarial_depth() {
        let mut value = ocg("Keep");
        for _ in 0..5_000 {
            value = PdfObject::Array(vec![value]);
        }
        let pruned = prune_value(value, &removed(&["Watermark"]), &NullResolver);
        let mut depth = 0;
        let mut cursor = &pruned;
        while let PdfObject::Array(items) = cursor {
            depth += 1;
            match items.first() {
                Some(inner) => cursor = inner,
                None => break,
            }
        }
        assert_eq!(depth, 5_000);
    }
}
