use arbor_xdm::simple_node::{attr, comment, elem, ns, pi, text};
use arbor_xdm::{ErrorCode, ExpandedName, NodeKind, SchemaType, SimpleNode, XdmNode};
use rstest::rstest;
use std::cmp::Ordering;

#[rstest]
fn builder_wires_parents_and_string_values() {
    // <root id="r"><child>Hello</child><child> world</child></root>
    let root = elem("root")
        .attr(attr("id", "r"))
        .child(elem("child").child(text("Hello")))
        .child(elem("child").child(text(" world")))
        .build();

    assert_eq!(root.kind(), NodeKind::Element);
    assert_eq!(root.string_value(), "Hello world");

    let first = root.children()[0].clone();
    assert_eq!(first.parent(), Some(root.clone()));
    assert_eq!(first.root(), root);

    let id = root.attributes()[0].clone();
    assert_eq!(id.kind(), NodeKind::Attribute);
    assert_eq!(id.string_value(), "r");
    assert_eq!(id.parent(), Some(root));
}

#[rstest]
fn identity_is_by_node_not_by_content() {
    let a = text("same");
    let b = text("same");
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
}

#[rstest]
fn document_order_ancestor_precedes_descendant() {
    let root = elem("r").child(elem("a").child(elem("b"))).build();
    let b = root.children()[0].children()[0].clone();
    assert_eq!(root.compare_document_order(&b).expect("ok"), Ordering::Less);
    assert_eq!(b.compare_document_order(&root).expect("ok"), Ordering::Greater);
    assert_eq!(b.compare_document_order(&b).expect("ok"), Ordering::Equal);
}

#[rstest]
fn document_order_attributes_precede_children() {
    let root = elem("r").attr(attr("id", "1")).child(elem("a")).build();
    let id = root.attributes()[0].clone();
    let a = root.children()[0].clone();
    assert_eq!(id.compare_document_order(&a).expect("ok"), Ordering::Less);
}

#[rstest]
fn document_order_siblings_follow_insertion_order() {
    let root = elem("r").child(elem("a")).child(elem("b")).build();
    let a = root.children()[0].clone();
    let b = root.children()[1].clone();
    assert_eq!(a.compare_document_order(&b).expect("ok"), Ordering::Less);
}

#[rstest]
fn document_order_across_roots_is_an_error() {
    let one = elem("one").build();
    let two = elem("two").build();
    let err = one.compare_document_order(&two).expect_err("no global order");
    assert_eq!(err.code_enum(), ErrorCode::FOER0000);
}

#[rstest]
fn namespace_lookup_walks_the_ancestor_chain() {
    let root = elem("root")
        .namespace(ns("p", "urn:outer"))
        .child(elem("mid").namespace(ns("p", "urn:inner")).child(elem("leaf")))
        .build();
    let leaf = root.children()[0].children()[0].clone();
    assert_eq!(leaf.lookup_namespace_uri("p").as_deref(), Some("urn:inner"));
    assert_eq!(root.lookup_namespace_uri("p").as_deref(), Some("urn:outer"));
    assert_eq!(leaf.lookup_namespace_uri("q"), None);
}

#[rstest]
fn annotations_are_stored_and_reported() {
    let annotation = SchemaType::Named(ExpandedName::new(Some("urn:s".into()), "price"));
    let root = elem("r").typed(annotation.clone()).build();
    assert_eq!(root.type_annotation(), annotation);

    // Unannotated nodes fall back to the untyped defaults.
    let plain = elem("p").build();
    assert_eq!(plain.type_annotation(), SchemaType::Untyped);
    assert_eq!(attr("a", "v").type_annotation(), SchemaType::UntypedAtomic);
}

#[rstest]
fn document_node_wraps_its_children() {
    let document = arbor_xdm::simple_doc()
        .child(pi("target", "data"))
        .child(comment("note"))
        .child(elem("root").child(text("body")))
        .build();
    assert_eq!(document.kind(), NodeKind::Document);
    assert_eq!(document.string_value(), "body");
    assert_eq!(document.children().len(), 3);
    assert_eq!(document.children()[0].kind(), NodeKind::ProcessingInstruction);
    assert_eq!(document.children()[1].string_value(), "note");
}
