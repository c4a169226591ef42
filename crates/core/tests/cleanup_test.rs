use delamina_core::document::MemoryDocument;
use delamina_core::model::objects::{Dict, PdfObject, PdfRef};
use delamina_core::rewrite::cleanup::{
    prune_annotations, prune_oc_properties, prune_properties,
};
use rustc_hash::FxHashSet;

fn ocg(name: &str) -> PdfObject {
    let mut dict = Dict::new();
    dict.insert("Type".to_string(), PdfObject::Name("OCG".to_string()));
    dict.insert(
        "Name".to_string(),
        PdfObject::literal_string(name.as_bytes()),
    );
    PdfObject::Dict(dict)
}

fn removed(names: &[&str]) -> FxHashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Document with OCGs 5 0 ("Watermark") and 6 0 ("Diagram").
fn fixture() -> MemoryDocument {
    let mut doc = MemoryDocument::new();
    doc.insert(5, 0, ocg("Watermark"));
    doc.insert(6, 0, ocg("Diagram"));
    doc
}

#[test]
fn test_annotations_with_removed_oc_dropped() {
    let doc = fixture();

    let mut stamp = Dict::new();
    stamp.insert("Subtype".to_string(), PdfObject::Name("Stamp".to_string()));
    stamp.insert("OC".to_string(), PdfObject::Ref(PdfRef::new(5, 0)));
    let mut link = Dict::new();
    link.insert("Subtype".to_string(), PdfObject::Name("Link".to_string()));
    let annots = vec![PdfObject::Dict(stamp), PdfObject::Dict(link.clone())];

    let kept = prune_annotations(&annots, &removed(&["Watermark"]), &doc);
    assert_eq!(kept, vec![PdfObject::Dict(link)]);
}

#[test]
fn test_annotation_behind_reference() {
    let mut doc = fixture();
    let mut stamp = Dict::new();
    stamp.insert("OC".to_string(), PdfObject::Ref(PdfRef::new(5, 0)));
    doc.insert(20, 0, PdfObject::Dict(stamp));

    let annots = vec![PdfObject::Ref(PdfRef::new(20, 0))];
    let kept = prune_annotations(&annots, &removed(&["Watermark"]), &doc);
    assert!(kept.is_empty());
}

#[test]
fn test_properties_stripped() {
    let doc = fixture();
    let mut properties = Dict::new();
    properties.insert("P0".to_string(), PdfObject::Ref(PdfRef::new(5, 0)));
    properties.insert("P1".to_string(), PdfObject::Ref(PdfRef::new(6, 0)));

    let kept = prune_properties(&properties, &removed(&["Watermark"]), &doc);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept.get("P1"), Some(&PdfObject::Ref(PdfRef::new(6, 0))));
}

#[test]
fn test_oc_properties_pruned_recursively() {
    let doc = fixture();

    let mut usage_entry = Dict::new();
    usage_entry.insert("Event".to_string(), PdfObject::Name("View".to_string()));
    usage_entry.insert(
        "OCGs".to_string(),
        PdfObject::Array(vec![
            PdfObject::Ref(PdfRef::new(5, 0)),
            PdfObject::Ref(PdfRef::new(6, 0)),
        ]),
    );

    let mut default_config = Dict::new();
    default_config.insert(
        "ON".to_string(),
        PdfObject::Array(vec![
            PdfObject::Ref(PdfRef::new(5, 0)),
            PdfObject::Ref(PdfRef::new(6, 0)),
        ]),
    );
    default_config.insert(
        "Order".to_string(),
        PdfObject::Array(vec![
            PdfObject::literal_string(b"Layers".to_vec()),
            PdfObject::Array(vec![
                PdfObject::Ref(PdfRef::new(5, 0)),
                PdfObject::Ref(PdfRef::new(6, 0)),
            ]),
        ]),
    );
    default_config.insert(
        "AS".to_string(),
        PdfObject::Array(vec![PdfObject::Dict(usage_entry)]),
    );

    let mut oc_properties = Dict::new();
    oc_properties.insert(
        "OCGs".to_string(),
        PdfObject::Array(vec![
            PdfObject::Ref(PdfRef::new(5, 0)),
            PdfObject::Ref(PdfRef::new(6, 0)),
        ]),
    );
    oc_properties.insert("D".to_string(), PdfObject::Dict(default_config));

    let pruned = prune_oc_properties(&oc_properties, &removed(&["Watermark"]), &doc);

    assert_eq!(
        pruned.get("OCGs"),
        Some(&PdfObject::Array(vec![PdfObject::Ref(PdfRef::new(6, 0))]))
    );

    let config = pruned.get("D").unwrap().as_dict().unwrap();
    assert_eq!(
        config.get("ON"),
        Some(&PdfObject::Array(vec![PdfObject::Ref(PdfRef::new(6, 0))]))
    );

    let order = config.get("Order").unwrap().as_array().unwrap();
    assert_eq!(order[0], PdfObject::literal_string(b"Layers".to_vec()));
    assert_eq!(
        order[1],
        PdfObject::Array(vec![PdfObject::Ref(PdfRef::new(6, 0))])
    );

    // The usage-application dict references the removed layer through its
    // OCGs, so it is dropped from /AS wholesale
    assert_eq!(config.get("AS"), Some(&PdfObject::Array(vec![])));
}

#[test]
fn test_nothing_removed_is_a_no_op() {
    let doc = fixture();
    let mut oc_properties = Dict::new();
    oc_properties.insert(
        "OCGs".to_string(),
        PdfObject::Array(vec![PdfObject::Ref(PdfRef::new(6, 0))]),
    );
    let pruned = prune_oc_properties(&oc_properties, &removed(&["Gone"]), &doc);
    assert_eq!(PdfObject::Dict(pruned), PdfObject::Dict(oc_properties));
}
