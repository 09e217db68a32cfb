//! Simple in-memory tree implementation of `XdmNode` used in tests and quick
//! prototypes.
//!
//! Focus:
//! - Ergonomic builder for quick test tree creation
//! - Stable `compare_document_order` (uses ancestry + sibling ordering)
//! - Optional stored type annotations, so projection type-stripping is
//!   observable
//!
//! Example:
//! ```
//! use arbor_xdm::simple_node::{attr, elem, text};
//! use arbor_xdm::XdmNode;
//!
//! // <root id="r"><child>Hello</child></root>
//! let root = elem("root")
//!     .attr(attr("id", "r"))
//!     .child(elem("child").child(text("Hello")))
//!     .build();
//!
//! assert_eq!(root.name().unwrap().local, "root");
//! assert_eq!(root.string_value(), "Hello");
//! ```

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use crate::model::{NodeKind, QName, SchemaType, XdmNode};

#[derive(Debug)]
struct Inner {
    kind: NodeKind,
    name: Option<QName>,
    value: RwLock<Option<String>>, // text / attribute / PI content
    annotation: RwLock<Option<SchemaType>>,
    parent: RwLock<Option<Weak<Inner>>>,
    attributes: RwLock<Vec<SimpleNode>>,
    namespaces: RwLock<Vec<SimpleNode>>,
    children: RwLock<Vec<SimpleNode>>,
    cached_text: RwLock<Option<String>>, // memoized string value for element/document
}

/// A simple Arc-backed node implementation. Identity is pointer identity.
#[derive(Clone)]
pub struct SimpleNode(Arc<Inner>);

impl PartialEq for SimpleNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for SimpleNode {}

impl std::hash::Hash for SimpleNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for SimpleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleNode")
            .field("kind", &self.0.kind)
            .field("name", &self.0.name)
            .field("value", &self.0.value)
            .finish()
    }
}

impl SimpleNode {
    fn new(kind: NodeKind, name: Option<QName>, value: Option<String>) -> Self {
        SimpleNode(Arc::new(Inner {
            kind,
            name,
            value: RwLock::new(value),
            annotation: RwLock::new(None),
            parent: RwLock::new(None),
            attributes: RwLock::new(Vec::new()),
            namespaces: RwLock::new(Vec::new()),
            children: RwLock::new(Vec::new()),
            cached_text: RwLock::new(None),
        }))
    }

    pub fn document() -> SimpleNodeBuilder {
        SimpleNodeBuilder::new(NodeKind::Document, None, None)
    }

    pub fn element(name: &str) -> SimpleNodeBuilder {
        SimpleNodeBuilder::new(
            NodeKind::Element,
            Some(QName { prefix: None, local: name.to_string(), ns_uri: None }),
            None,
        )
    }

    pub fn attribute(name: &str, value: &str) -> SimpleNode {
        SimpleNode::new(
            NodeKind::Attribute,
            Some(QName { prefix: None, local: name.to_string(), ns_uri: None }),
            Some(value.to_string()),
        )
    }

    pub fn text(value: &str) -> SimpleNode {
        SimpleNode::new(NodeKind::Text, None, Some(value.to_string()))
    }

    pub fn comment(value: &str) -> SimpleNode {
        SimpleNode::new(NodeKind::Comment, None, Some(value.to_string()))
    }

    pub fn pi(target: &str, data: &str) -> SimpleNode {
        SimpleNode::new(
            NodeKind::ProcessingInstruction,
            Some(QName { prefix: None, local: target.to_string(), ns_uri: None }),
            Some(data.to_string()),
        )
    }

    pub fn namespace(prefix: &str, uri: &str) -> SimpleNode {
        SimpleNode::new(
            NodeKind::Namespace,
            Some(QName {
                prefix: Some(prefix.to_string()),
                local: prefix.to_string(),
                ns_uri: Some(uri.to_string()),
            }),
            Some(uri.to_string()),
        )
    }

    /// Attach a type annotation, as an external validator would.
    pub fn set_annotation(&self, annotation: SchemaType) {
        *self.0.annotation.write().unwrap() = Some(annotation);
    }

    /// Resolve a namespace prefix by walking the ancestor chain (including self).
    pub fn lookup_namespace_uri(&self, prefix: &str) -> Option<String> {
        let mut cur: Option<SimpleNode> = Some(self.clone());
        while let Some(n) = cur {
            for ns in n.namespaces() {
                if let Some(name) = ns.name()
                    && name.prefix.as_deref() == Some(prefix)
                {
                    return Some(ns.string_value());
                }
            }
            cur = n.parent();
        }
        None
    }
}

pub struct SimpleNodeBuilder {
    node: SimpleNode,
    pending_children: Vec<SimpleNode>,
    pending_attrs: Vec<SimpleNode>,
    pending_ns: Vec<SimpleNode>,
}

impl SimpleNodeBuilder {
    fn new(kind: NodeKind, name: Option<QName>, value: Option<String>) -> Self {
        Self {
            node: SimpleNode::new(kind, name, value),
            pending_children: Vec::new(),
            pending_attrs: Vec::new(),
            pending_ns: Vec::new(),
        }
    }

    pub fn child(mut self, child: impl Into<SimpleNodeOrBuilder>) -> Self {
        match child.into() {
            SimpleNodeOrBuilder::Built(n) => self.pending_children.push(n),
            SimpleNodeOrBuilder::Builder(b) => self.pending_children.push(b.build()),
        }
        self
    }

    pub fn attr(mut self, attr: SimpleNode) -> Self {
        debug_assert!(attr.kind() == NodeKind::Attribute);
        self.pending_attrs.push(attr);
        self
    }

    pub fn namespace(mut self, ns: SimpleNode) -> Self {
        debug_assert!(ns.kind() == NodeKind::Namespace);
        self.pending_ns.push(ns);
        self
    }

    /// Annotate the node under construction with a schema type.
    pub fn typed(self, annotation: SchemaType) -> Self {
        self.node.set_annotation(annotation);
        self
    }

    pub fn build(self) -> SimpleNode {
        // finalize relationships
        {
            let mut attrs = self.node.0.attributes.write().unwrap();
            for a in &self.pending_attrs {
                *a.0.parent.write().unwrap() = Some(Arc::downgrade(&self.node.0));
            }
            attrs.extend(self.pending_attrs);
        }
        {
            let mut nss = self.node.0.namespaces.write().unwrap();
            for n in &self.pending_ns {
                *n.0.parent.write().unwrap() = Some(Arc::downgrade(&self.node.0));
            }
            nss.extend(self.pending_ns);
        }
        {
            let mut ch = self.node.0.children.write().unwrap();
            for c in &self.pending_children {
                *c.0.parent.write().unwrap() = Some(Arc::downgrade(&self.node.0));
            }
            ch.extend(self.pending_children);
        }
        // Precompute cached text for element/document
        if matches!(self.node.kind(), NodeKind::Element | NodeKind::Document) {
            let _ = self.node.string_value();
        }
        self.node
    }
}

pub enum SimpleNodeOrBuilder {
    Built(SimpleNode),
    Builder(SimpleNodeBuilder),
}

impl From<SimpleNode> for SimpleNodeOrBuilder {
    fn from(n: SimpleNode) -> Self {
        SimpleNodeOrBuilder::Built(n)
    }
}

impl From<SimpleNodeBuilder> for SimpleNodeOrBuilder {
    fn from(b: SimpleNodeBuilder) -> Self {
        SimpleNodeOrBuilder::Builder(b)
    }
}

// Convenience helper functions for concise test code
pub fn elem(name: &str) -> SimpleNodeBuilder {
    SimpleNode::element(name)
}
pub fn text(v: &str) -> SimpleNode {
    SimpleNode::text(v)
}
pub fn attr(name: &str, v: &str) -> SimpleNode {
    SimpleNode::attribute(name, v)
}
pub fn comment(v: &str) -> SimpleNode {
    SimpleNode::comment(v)
}
pub fn pi(target: &str, data: &str) -> SimpleNode {
    SimpleNode::pi(target, data)
}
pub fn ns(prefix: &str, uri: &str) -> SimpleNode {
    SimpleNode::namespace(prefix, uri)
}
pub fn doc() -> SimpleNodeBuilder {
    SimpleNode::document()
}

impl XdmNode for SimpleNode {
    fn kind(&self) -> NodeKind {
        self.0.kind.clone()
    }

    fn name(&self) -> Option<QName> {
        self.0.name.clone()
    }

    fn string_value(&self) -> String {
        match self.kind() {
            NodeKind::Text
            | NodeKind::Attribute
            | NodeKind::Comment
            | NodeKind::ProcessingInstruction
            | NodeKind::Namespace => self.0.value.read().unwrap().clone().unwrap_or_default(),
            NodeKind::Element | NodeKind::Document => {
                // Memoized
                if let Some(cached) = self.0.cached_text.read().unwrap().clone() {
                    return cached;
                }
                fn dfs(n: &SimpleNode, out: &mut String) {
                    if n.kind() == NodeKind::Text
                        && let Some(v) = &*n.0.value.read().unwrap()
                    {
                        out.push_str(v);
                    }
                    for c in n.children() {
                        dfs(&c, out);
                    }
                }
                let mut out = String::new();
                dfs(self, &mut out);
                *self.0.cached_text.write().unwrap() = Some(out.clone());
                out
            }
        }
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent.read().ok()?.as_ref().and_then(|w| w.upgrade()).map(SimpleNode)
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.read().map(|v| v.clone()).unwrap_or_default()
    }

    fn attributes(&self) -> Vec<Self> {
        self.0.attributes.read().map(|v| v.clone()).unwrap_or_default()
    }

    fn namespaces(&self) -> Vec<Self> {
        self.0.namespaces.read().map(|v| v.clone()).unwrap_or_default()
    }

    fn type_annotation(&self) -> SchemaType {
        if let Some(a) = self.0.annotation.read().unwrap().clone() {
            return a;
        }
        match self.kind() {
            NodeKind::Element | NodeKind::Document => SchemaType::Untyped,
            _ => SchemaType::UntypedAtomic,
        }
    }
}
