//! Virtual projection of a subtree: a read-only alternate view rooted at an
//! arbitrary node, optionally with type annotations stripped, sharing the
//! underlying storage of the original tree.
//!
//! Navigation through a projection yields further projection nodes, each
//! parented within the projected tree and carrying the same substituted
//! root. Projections never nest: constructors unwrap projection arguments to
//! the true underlying nodes, so indirection is bounded to one level.

use crate::error::Error;
use crate::model::{NodeKind, QName, SchemaType, XdmNode};
use crate::receiver::{CopyOptions, Receiver};
use crate::xdm::XdmAtomicValue;
use tracing::trace;

/// How a projection reports type information. This is the single
/// customization point of the layer: the node-construction step (`wrap`)
/// carries it to every node reached by navigation, so a typed or untyped
/// variant differs only here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Typing {
    /// Report the original's annotations and typed values unchanged.
    Preserved,
    /// Elements report xs:untyped, attributes xs:untypedAtomic, and typed
    /// values collapse to the string value wrapped as untyped atomic.
    Untyped,
}

/// Argument adapter for projection constructors: accepts either a raw node
/// or an existing projection, unwrapping the latter to the true underlying
/// original and root.
pub trait Unproject<N: XdmNode> {
    fn into_original(self) -> N;
    fn into_root(self) -> N;
}

impl<N: XdmNode> Unproject<N> for N {
    fn into_original(self) -> N {
        self
    }
    fn into_root(self) -> N {
        self
    }
}

impl<N: XdmNode> Unproject<N> for VirtualNode<N> {
    fn into_original(self) -> N {
        self.original
    }
    fn into_root(self) -> N {
        self.root
    }
}

/// A node in a projected view of a subtree.
///
/// Wraps exactly one original node plus the substituted root node. Two
/// projection trees over the same original subtree are independent read-only
/// views; neither may mutate the shared storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNode<N: XdmNode> {
    original: N,
    root: N,
    typing: Typing,
}

impl<N: XdmNode> VirtualNode<N> {
    /// Projection preserving the original's type information.
    pub fn copy(original: impl Unproject<N>, root: impl Unproject<N>) -> Self {
        Self::make(original, root, Typing::Preserved)
    }

    /// Projection reporting untyped annotations and values.
    pub fn untyped_copy(original: impl Unproject<N>, root: impl Unproject<N>) -> Self {
        Self::make(original, root, Typing::Untyped)
    }

    fn make(original: impl Unproject<N>, root: impl Unproject<N>, typing: Typing) -> Self {
        let original = original.into_original();
        let root = root.into_root();
        trace!(kind = ?original.kind(), ?typing, "constructing virtual projection");
        Self { original, root, typing }
    }

    /// The underlying original node (never itself a projection).
    pub fn original(&self) -> &N {
        &self.original
    }

    /// The substituted root (never itself a projection).
    pub fn projection_root(&self) -> &N {
        &self.root
    }

    pub fn typing(&self) -> Typing {
        self.typing
    }

    /// The node-construction step used during navigation: wraps a node of
    /// the original tree with the same root and typing as `self`.
    fn wrap(&self, original: N) -> Self {
        Self { original, root: self.root.clone(), typing: self.typing }
    }
}

impl<N: XdmNode> XdmNode for VirtualNode<N> {
    fn kind(&self) -> NodeKind {
        self.original.kind()
    }

    fn name(&self) -> Option<QName> {
        self.original.name()
    }

    fn string_value(&self) -> String {
        self.original.string_value()
    }

    fn base_uri(&self) -> Option<String> {
        self.original.base_uri()
    }

    fn parent(&self) -> Option<Self> {
        // The projected subtree ends at the substituted root.
        if self.original == self.root {
            return None;
        }
        self.original.parent().map(|p| self.wrap(p))
    }

    fn children(&self) -> Vec<Self> {
        self.original.children().into_iter().map(|c| self.wrap(c)).collect()
    }

    fn attributes(&self) -> Vec<Self> {
        self.original.attributes().into_iter().map(|a| self.wrap(a)).collect()
    }

    fn namespaces(&self) -> Vec<Self> {
        self.original.namespaces().into_iter().map(|n| self.wrap(n)).collect()
    }

    fn type_annotation(&self) -> SchemaType {
        match (self.typing, self.original.kind()) {
            (Typing::Untyped, NodeKind::Element) => SchemaType::Untyped,
            (Typing::Untyped, NodeKind::Attribute) => SchemaType::UntypedAtomic,
            _ => self.original.type_annotation(),
        }
    }

    fn typed_value(&self) -> Result<Vec<XdmAtomicValue>, Error> {
        match (self.typing, self.original.kind()) {
            (Typing::Untyped, NodeKind::Element | NodeKind::Attribute) => {
                Ok(vec![XdmAtomicValue::UntypedAtomic(self.original.string_value())])
            }
            _ => self.original.typed_value(),
        }
    }

    fn copy_to(&self, receiver: &mut dyn Receiver, options: CopyOptions) -> Result<(), Error> {
        let options = match self.typing {
            // An untyped view never forwards annotations, whatever was asked.
            Typing::Untyped => CopyOptions { type_annotations: false, ..options },
            Typing::Preserved => options,
        };
        crate::receiver::copy_subtree(self, receiver, options)
    }
}
