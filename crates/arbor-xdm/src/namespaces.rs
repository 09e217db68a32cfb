//! Prefix-to-URI resolution against an in-scope context.
//!
//! Every resolver is derived from one backing reference (a node, or another
//! resolver); resolution is a pure read-only traversal. Lexical QName
//! resolution sits on top and interns through an external name pool.

use crate::cursor::SequenceCursor;
use crate::error::{Error, ErrorCode};
use crate::model::{Axis, XdmNode};
use crate::xdm::XdmItem;
use std::collections::HashMap;
use string_cache::DefaultAtom;
use tracing::debug;

/// The reserved `xml` prefix is bound to this URI on every element.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Maps (prefix, use-default flag) to a URI, and enumerates declared
/// prefixes. The empty prefix stands for the default namespace.
pub trait NamespaceResolver {
    /// Resolve a prefix. `use_default` controls whether the empty prefix
    /// means the default namespace or always the no-namespace URI ("").
    /// `None` means the prefix is undeclared (an error for mandatory
    /// lookups, decided by the caller).
    fn uri_for_prefix(&self, prefix: &str, use_default: bool) -> Option<String>;

    /// One entry per in-scope declaration, including the empty string for
    /// the default namespace when declared.
    fn iterate_prefixes(&self) -> Vec<String>;
}

impl<T: NamespaceResolver + ?Sized> NamespaceResolver for &T {
    fn uri_for_prefix(&self, prefix: &str, use_default: bool) -> Option<String> {
        (**self).uri_for_prefix(prefix, use_default)
    }
    fn iterate_prefixes(&self) -> Vec<String> {
        (**self).iterate_prefixes()
    }
}

impl<T: NamespaceResolver + ?Sized> NamespaceResolver for Box<T> {
    fn uri_for_prefix(&self, prefix: &str, use_default: bool) -> Option<String> {
        (**self).uri_for_prefix(prefix, use_default)
    }
    fn iterate_prefixes(&self) -> Vec<String> {
        (**self).iterate_prefixes()
    }
}

/// Resolver scoped to the in-scope namespaces of one node.
#[derive(Debug, Clone)]
pub struct NodeNamespaceResolver<N: XdmNode> {
    node: N,
}

impl<N: XdmNode> NodeNamespaceResolver<N> {
    pub fn new(node: N) -> Self {
        Self { node }
    }

    fn scan(&self) -> Box<dyn SequenceCursor<N>> {
        self.node.iterate_axis(Axis::Namespace)
    }
}

impl<N: XdmNode> NamespaceResolver for NodeNamespaceResolver<N> {
    fn uri_for_prefix(&self, prefix: &str, use_default: bool) -> Option<String> {
        if prefix.is_empty() && !use_default {
            return Some(String::new());
        }
        if prefix == "xml" {
            return Some(XML_NS.to_string());
        }
        let mut cursor = self.scan();
        loop {
            match cursor.next_item() {
                Ok(Some(XdmItem::Node(ns))) => {
                    if let Some(q) = ns.name()
                        && q.prefix.unwrap_or_default() == prefix
                    {
                        return Some(ns.string_value());
                    }
                }
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(err) => {
                    debug!(%err, "namespace axis scan failed");
                    break;
                }
            }
        }
        // Absent default namespace means "no namespace"; anything else is
        // undeclared.
        if prefix.is_empty() { Some(String::new()) } else { None }
    }

    fn iterate_prefixes(&self) -> Vec<String> {
        let mut prefixes = Vec::new();
        let mut cursor = self.scan();
        loop {
            match cursor.next_item() {
                Ok(Some(XdmItem::Node(ns))) => {
                    if let Some(q) = ns.name() {
                        prefixes.push(q.prefix.unwrap_or_default());
                    }
                }
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(err) => {
                    debug!(%err, "namespace axis scan failed");
                    break;
                }
            }
        }
        prefixes
    }
}

/// Decorator substituting a fixed URI when the empty prefix is resolved with
/// default-namespace semantics; everything else delegates to the base.
#[derive(Debug, Clone)]
pub struct WithDefaultNamespace<R: NamespaceResolver> {
    base: R,
    default_uri: String,
}

impl<R: NamespaceResolver> WithDefaultNamespace<R> {
    pub fn new(base: R, default_uri: impl Into<String>) -> Self {
        Self { base, default_uri: default_uri.into() }
    }
}

impl<R: NamespaceResolver> NamespaceResolver for WithDefaultNamespace<R> {
    fn uri_for_prefix(&self, prefix: &str, use_default: bool) -> Option<String> {
        if use_default && prefix.is_empty() {
            return Some(self.default_uri.clone());
        }
        self.base.uri_for_prefix(prefix, use_default)
    }

    fn iterate_prefixes(&self) -> Vec<String> {
        self.base.iterate_prefixes()
    }
}

/// Name-interning collaborator. Allocation is idempotent: the same name
/// always yields the same code.
pub trait NamePool: Send {
    fn allocate(&mut self, prefix: &str, uri: &str, local: &str) -> i32;
    fn allocate_namespace_code(&mut self, prefix: &str, uri: &str) -> i32;
}

/// Minimal atom-keyed pool for tests and embedders without their own
/// interning layer.
#[derive(Debug, Default)]
pub struct InMemoryNamePool {
    names: HashMap<(DefaultAtom, DefaultAtom, DefaultAtom), i32>,
    namespaces: HashMap<(DefaultAtom, DefaultAtom), i32>,
}

impl InMemoryNamePool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NamePool for InMemoryNamePool {
    fn allocate(&mut self, prefix: &str, uri: &str, local: &str) -> i32 {
        let key = (DefaultAtom::from(prefix), DefaultAtom::from(uri), DefaultAtom::from(local));
        let next = self.names.len() as i32;
        *self.names.entry(key).or_insert(next)
    }

    fn allocate_namespace_code(&mut self, prefix: &str, uri: &str) -> i32 {
        let key = (DefaultAtom::from(prefix), DefaultAtom::from(uri));
        let next = self.namespaces.len() as i32;
        *self.namespaces.entry(key).or_insert(next)
    }
}

/// One frozen namespace declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    pub prefix: String,
    pub uri: String,
    pub code: i32,
}

/// Snapshot of a resolver's declarations, answering indexed lookups against
/// the frozen list. Mutations to the source after construction are not
/// observed.
#[derive(Debug, Clone)]
pub struct SavedNamespaceContext {
    bindings: Vec<NamespaceBinding>,
}

impl SavedNamespaceContext {
    pub fn from_resolver(resolver: &dyn NamespaceResolver, pool: &mut dyn NamePool) -> Self {
        let mut bindings = Vec::new();
        for prefix in resolver.iterate_prefixes() {
            // URI lookup always requests default-namespace semantics.
            if let Some(uri) = resolver.uri_for_prefix(&prefix, true) {
                let code = pool.allocate_namespace_code(&prefix, &uri);
                bindings.push(NamespaceBinding { prefix, uri, code });
            }
        }
        Self { bindings }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn prefix(&self, index: usize) -> Option<&str> {
        self.bindings.get(index).map(|b| b.prefix.as_str())
    }

    pub fn uri(&self, index: usize) -> Option<&str> {
        self.bindings.get(index).map(|b| b.uri.as_str())
    }

    pub fn namespace_code(&self, index: usize) -> Option<i32> {
        self.bindings.get(index).map(|b| b.code)
    }
}

impl NamespaceResolver for SavedNamespaceContext {
    fn uri_for_prefix(&self, prefix: &str, use_default: bool) -> Option<String> {
        if prefix.is_empty() && !use_default {
            return Some(String::new());
        }
        for b in &self.bindings {
            if b.prefix == prefix {
                return Some(b.uri.clone());
            }
        }
        if prefix.is_empty() { Some(String::new()) } else { None }
    }

    fn iterate_prefixes(&self) -> Vec<String> {
        self.bindings.iter().map(|b| b.prefix.clone()).collect()
    }
}

fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Split a lexical QName into (prefix, local part).
///
/// Fails with `err:FOCA0002` when the form is malformed (empty parts, more
/// than one colon, invalid NCName characters).
pub fn parse_lexical_qname(lexical: &str) -> Result<(Option<&str>, &str), Error> {
    let malformed =
        || Error::from_code(ErrorCode::FOCA0002, format!("malformed lexical QName: {lexical:?}"));
    match lexical.split_once(':') {
        Some((prefix, local)) => {
            if !is_ncname(prefix) || !is_ncname(local) {
                return Err(malformed());
            }
            Ok((Some(prefix), local))
        }
        None => {
            if !is_ncname(lexical) {
                return Err(malformed());
            }
            Ok((None, lexical))
        }
    }
}

/// Resolve a lexical QName against in-scope namespaces and intern the
/// expanded name through the pool.
///
/// `use_default` applies only to unprefixed names. An undeclared non-empty
/// prefix fails with `err:FONS0004`.
pub fn resolve_lexical_qname(
    lexical: &str,
    use_default: bool,
    resolver: &dyn NamespaceResolver,
    pool: &mut dyn NamePool,
) -> Result<i32, Error> {
    let (prefix, local) = parse_lexical_qname(lexical)?;
    let uri = match prefix {
        Some(p) => match resolver.uri_for_prefix(p, false) {
            Some(uri) => uri,
            None => {
                debug!(prefix = p, "undeclared prefix in lexical QName");
                return Err(Error::from_code(
                    ErrorCode::FONS0004,
                    format!("no namespace declared for prefix {p:?}"),
                ));
            }
        },
        None => {
            if use_default {
                resolver.uri_for_prefix("", true).unwrap_or_default()
            } else {
                String::new()
            }
        }
    };
    Ok(pool.allocate(prefix.unwrap_or_default(), &uri, local))
}
