pub mod axis;
pub mod closing;
pub mod cursor;
pub mod error;
pub mod model;
pub mod namespaces;
pub mod projection;
pub mod receiver;
pub mod simple_node;
pub mod xdm;

pub use axis::AxisCursor;
pub use closing::{CloseAction, ClosingCursor};
pub use cursor::{CursorProps, EmptyCursor, GroundedCursor, SequenceCursor, VecCursor};
pub use error::{ERR_NS, Error, ErrorCode};
pub use model::{Axis, NodeKind, QName, SchemaType, XdmNode, try_compare_by_ancestry};
pub use namespaces::{
    InMemoryNamePool, NamePool, NamespaceResolver, NodeNamespaceResolver, SavedNamespaceContext,
    WithDefaultNamespace, XML_NS, parse_lexical_qname, resolve_lexical_qname,
};
pub use projection::{Typing, Unproject, VirtualNode};
pub use receiver::{CopyOptions, Receiver};
pub use simple_node::{SimpleNode, SimpleNodeBuilder, attr, elem, ns, text, doc as simple_doc};
pub use xdm::{ExpandedName, XdmAtomicValue, XdmItem, XdmSequence};
