use arbor_xdm::simple_node::{elem, ns};
use arbor_xdm::{
    ErrorCode, InMemoryNamePool, NamePool, NamespaceResolver, NodeNamespaceResolver,
    SavedNamespaceContext, SimpleNode, WithDefaultNamespace, XML_NS, XdmNode,
    parse_lexical_qname, resolve_lexical_qname,
};
use rstest::rstest;
use std::collections::BTreeMap;

// <root xmlns:p="urn:outer" xmlns="urn:default">
//   <mid xmlns:p="urn:inner"><leaf/></mid>
// </root>
fn namespaced_tree() -> SimpleNode {
    elem("root")
        .namespace(ns("p", "urn:outer"))
        .namespace(ns("", "urn:default"))
        .child(elem("mid").namespace(ns("p", "urn:inner")).child(elem("leaf")))
        .build()
}

fn leaf_resolver() -> NodeNamespaceResolver<SimpleNode> {
    // Keep the tree rooted for the duration of the tests: SimpleNode parent
    // links are weak, so the leaf alone would not keep its ancestors alive.
    static ROOT: std::sync::OnceLock<SimpleNode> = std::sync::OnceLock::new();
    let root = ROOT.get_or_init(namespaced_tree);
    let leaf = root.children()[0].children()[0].clone();
    NodeNamespaceResolver::new(leaf)
}

#[rstest]
fn node_resolver_sees_the_nearest_declaration() {
    let resolver = leaf_resolver();
    assert_eq!(resolver.uri_for_prefix("p", false).as_deref(), Some("urn:inner"));
}

#[rstest]
fn node_resolver_handles_the_empty_prefix() {
    let resolver = leaf_resolver();
    // Default-namespace semantics pick up the inherited declaration.
    assert_eq!(resolver.uri_for_prefix("", true).as_deref(), Some("urn:default"));
    // Element-name-only contexts ask without default semantics and always
    // get the no-namespace URI.
    assert_eq!(resolver.uri_for_prefix("", false).as_deref(), Some(""));
}

#[rstest]
fn xml_prefix_is_always_bound() {
    let root = elem("bare").build();
    let resolver = NodeNamespaceResolver::new(root);
    assert_eq!(resolver.uri_for_prefix("xml", false).as_deref(), Some(XML_NS));
}

#[rstest]
fn undeclared_prefix_resolves_to_none() {
    let resolver = leaf_resolver();
    assert_eq!(resolver.uri_for_prefix("nope", false), None);
}

#[rstest]
fn default_namespace_decorator_substitutes_only_default_lookups() {
    let resolver = WithDefaultNamespace::new(leaf_resolver(), "urn:override");
    assert_eq!(resolver.uri_for_prefix("", true).as_deref(), Some("urn:override"));
    // Non-default and prefixed lookups pass through to the base.
    assert_eq!(resolver.uri_for_prefix("", false).as_deref(), Some(""));
    assert_eq!(resolver.uri_for_prefix("p", false).as_deref(), Some("urn:inner"));
    assert_eq!(resolver.iterate_prefixes(), leaf_resolver().iterate_prefixes());
}

/// Mutable map-backed resolver, as an embedder's dynamic prolog would be.
#[derive(Default)]
struct MapResolver {
    bindings: BTreeMap<String, String>,
}

impl MapResolver {
    fn declare(&mut self, prefix: &str, uri: &str) {
        self.bindings.insert(prefix.to_string(), uri.to_string());
    }
}

impl NamespaceResolver for MapResolver {
    fn uri_for_prefix(&self, prefix: &str, use_default: bool) -> Option<String> {
        if prefix.is_empty() && !use_default {
            return Some(String::new());
        }
        if prefix == "xml" {
            return Some(XML_NS.to_string());
        }
        match self.bindings.get(prefix) {
            Some(uri) => Some(uri.clone()),
            None if prefix.is_empty() => Some(String::new()),
            None => None,
        }
    }

    fn iterate_prefixes(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }
}

#[rstest]
fn saved_context_is_immune_to_later_mutation() {
    let mut live = MapResolver::default();
    live.declare("a", "urn:a");

    let mut pool = InMemoryNamePool::new();
    let saved = SavedNamespaceContext::from_resolver(&live, &mut pool);
    assert_eq!(saved.len(), 1);

    live.declare("b", "urn:b");
    live.declare("a", "urn:changed");

    assert_eq!(saved.len(), 1);
    assert_eq!(saved.uri_for_prefix("a", false).as_deref(), Some("urn:a"));
    assert_eq!(saved.uri_for_prefix("b", false), None);
}

#[rstest]
fn saved_context_answers_indexed_lookups() {
    let mut live = MapResolver::default();
    live.declare("a", "urn:a");
    live.declare("b", "urn:b");

    let mut pool = InMemoryNamePool::new();
    let saved = SavedNamespaceContext::from_resolver(&live, &mut pool);

    assert_eq!(saved.len(), 2);
    assert!(!saved.is_empty());
    assert_eq!(saved.prefix(0), Some("a"));
    assert_eq!(saved.uri(0), Some("urn:a"));
    assert_eq!(saved.prefix(1), Some("b"));
    assert_eq!(saved.uri(1), Some("urn:b"));
    assert_eq!(saved.prefix(2), None);

    // The pool interned one code per binding; re-interning is idempotent.
    let code_a = saved.namespace_code(0).expect("code for a");
    assert_eq!(pool.allocate_namespace_code("a", "urn:a"), code_a);
}

#[rstest]
#[case("local", None, "local")]
#[case("p:local", Some("p"), "local")]
fn lexical_qname_parsing_accepts_valid_forms(
    #[case] lexical: &str,
    #[case] prefix: Option<&str>,
    #[case] local: &str,
) {
    assert_eq!(parse_lexical_qname(lexical).expect("well formed"), (prefix, local));
}

#[rstest]
#[case("foo:")]
#[case(":bar")]
#[case("a:b:c")]
#[case("1abc")]
#[case("")]
#[case("a b")]
fn lexical_qname_parsing_rejects_malformed_forms(#[case] lexical: &str) {
    let err = parse_lexical_qname(lexical).expect_err("malformed");
    assert_eq!(err.code_enum(), ErrorCode::FOCA0002);
}

#[rstest]
fn qname_resolution_interns_through_the_pool() {
    let mut live = MapResolver::default();
    live.declare("p", "urn:p");
    let mut pool = InMemoryNamePool::new();

    let first = resolve_lexical_qname("p:item", false, &live, &mut pool).expect("resolves");
    let again = resolve_lexical_qname("p:item", false, &live, &mut pool).expect("resolves");
    assert_eq!(first, again);

    let other = resolve_lexical_qname("p:other", false, &live, &mut pool).expect("resolves");
    assert_ne!(first, other);
}

#[rstest]
fn unprefixed_qname_honors_the_use_default_flag() {
    let mut live = MapResolver::default();
    live.declare("", "urn:default");
    let mut pool = InMemoryNamePool::new();

    let with_default = resolve_lexical_qname("item", true, &live, &mut pool).expect("resolves");
    let without = resolve_lexical_qname("item", false, &live, &mut pool).expect("resolves");
    // Different target namespaces, so different codes.
    assert_ne!(with_default, without);
    assert_eq!(without, pool.allocate("", "", "item"));
}

#[rstest]
fn undeclared_prefix_fails_resolution() {
    let live = MapResolver::default();
    let mut pool = InMemoryNamePool::new();
    let err =
        resolve_lexical_qname("ghost:item", false, &live, &mut pool).expect_err("undeclared");
    assert_eq!(err.code_enum(), ErrorCode::FONS0004);
}
