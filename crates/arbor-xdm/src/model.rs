//! Node contract consumed by cursors, projections, and resolvers.
//!
//! The physical tree storage stays behind this trait: implementations only
//! expose kind/name/value accessors, parent links, and the three structural
//! child lists. Axis traversal, copying, and atomization are layered on top
//! with overridable defaults.

use crate::axis::AxisCursor;
use crate::cursor::SequenceCursor;
use crate::error::{Error, ErrorCode};
use crate::receiver::{copy_subtree, CopyOptions, Receiver};
use crate::xdm::{ExpandedName, XdmAtomicValue};
use core::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
    pub ns_uri: Option<String>,
}

/// Type annotation attached to a node.
///
/// Schema validation is out of scope here; annotations exist so that virtual
/// untyped copies can be observed stripping them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// xs:untyped (the annotation of an unvalidated element).
    Untyped,
    /// xs:untypedAtomic (the annotation of an unvalidated attribute or text).
    UntypedAtomic,
    /// A named schema type assigned by some external validator.
    Named(ExpandedName),
}

/// The thirteen XPath navigation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Child,
    Attribute,
    Namespace,
    Parent,
    Ancestor,
    AncestorOrSelf,
    Descendant,
    DescendantOrSelf,
    SelfAxis,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
}

/// Compare two nodes by ancestry and stable sibling order (fallback algorithm).
///
/// Properties:
/// - If one node is an ancestor of the other, the ancestor precedes the descendant.
/// - Among siblings, attributes come first, then namespaces, then child nodes; within
///   each group the order provided by the adapter is preserved.
/// - If the nodes belong to different roots, returns an error (`err:FOER0000`) because
///   the fallback cannot establish a global order. Adapters with multi-root trees must
///   override `XdmNode::compare_document_order` and provide a total order.
pub fn try_compare_by_ancestry<N: XdmNode>(a: &N, b: &N) -> Result<Ordering, Error> {
    if a == b {
        return Ok(Ordering::Equal);
    }
    // Build paths from root to the node (inclusive)
    fn path_to_root<N: XdmNode>(mut n: N) -> Vec<N> {
        let mut p = vec![n.clone()];
        while let Some(parent) = n.parent() {
            p.push(parent.clone());
            n = parent;
        }
        p.reverse();
        p
    }
    let pa = path_to_root(a.clone());
    let pb = path_to_root(b.clone());
    let mut i = 0usize;
    let len = core::cmp::min(pa.len(), pb.len());
    while i < len && pa[i] == pb[i] {
        i += 1;
    }
    // One path is a prefix of the other → ancestor check
    if i == len {
        // shorter path is ancestor
        return Ok(if pa.len() < pb.len() { Ordering::Less } else { Ordering::Greater });
    }
    // Diverged at index i.
    if i == 0 {
        // Different roots. Default fallback cannot establish global order.
        return Err(Error::from_code(
            ErrorCode::FOER0000,
            "document order requires adapter: nodes from different roots",
        ));
    }
    // Compare the next nodes under the same parent (i-1)
    let parent = &pa[i - 1];
    // Sibling order: attributes, namespaces, then children
    let mut sibs: Vec<N> = Vec::new();
    sibs.extend(parent.attributes());
    sibs.extend(parent.namespaces());
    sibs.extend(parent.children());
    let na = &pa[i];
    let nb = &pb[i];
    let posa = sibs.iter().position(|n| n == na);
    let posb = sibs.iter().position(|n| n == nb);
    Ok(match (posa, posb) {
        (Some(aidx), Some(bidx)) => aidx.cmp(&bidx),
        // Fallback: if one is the parent itself (shouldn't happen here), treat parent before child
        _ => Ordering::Equal,
    })
}

pub trait XdmNode: Clone + Eq + core::fmt::Debug + Send + Sync + 'static {
    fn kind(&self) -> NodeKind;
    fn name(&self) -> Option<QName>;
    fn string_value(&self) -> String;
    fn base_uri(&self) -> Option<String> {
        None
    }

    fn parent(&self) -> Option<Self>;
    fn children(&self) -> Vec<Self>;
    fn attributes(&self) -> Vec<Self>;
    fn namespaces(&self) -> Vec<Self> {
        Vec::new()
    }

    /// Root of the tree this node belongs to (walks the parent chain).
    fn root(&self) -> Self {
        let mut cur = self.clone();
        while let Some(p) = cur.parent() {
            cur = p;
        }
        cur
    }

    /// Type annotation of this node. Unvalidated trees report the untyped
    /// annotations; adapters backed by a validating store override this.
    fn type_annotation(&self) -> SchemaType {
        match self.kind() {
            NodeKind::Element | NodeKind::Document => SchemaType::Untyped,
            _ => SchemaType::UntypedAtomic,
        }
    }

    /// Atomized (typed) value of this node.
    ///
    /// The default matches unvalidated trees: element/attribute/text/document
    /// nodes atomize to one untyped atomic wrapping the string value; the
    /// remaining kinds yield a plain string.
    fn typed_value(&self) -> Result<Vec<XdmAtomicValue>, Error> {
        let sv = self.string_value();
        Ok(match self.kind() {
            NodeKind::Comment | NodeKind::ProcessingInstruction | NodeKind::Namespace => {
                vec![XdmAtomicValue::String(sv)]
            }
            _ => vec![XdmAtomicValue::UntypedAtomic(sv)],
        })
    }

    /// Iterate an axis from this node. Every node on the axis is yielded;
    /// node-test filtering belongs to the consumer.
    fn iterate_axis(&self, axis: Axis) -> Box<dyn SequenceCursor<Self>> {
        Box::new(AxisCursor::new(self.clone(), axis))
    }

    /// Copy this subtree to a receiving sink as a stream of events.
    fn copy_to(&self, receiver: &mut dyn Receiver, options: CopyOptions) -> Result<(), Error> {
        copy_subtree(self, receiver, options)
    }

    /// Default document order comparison uses ancestry and sibling order.
    /// Returns an error for multi-root comparisons unless overridden by adapter.
    fn compare_document_order(&self, other: &Self) -> Result<Ordering, Error> {
        try_compare_by_ancestry(self, other)
    }
}
