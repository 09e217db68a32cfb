//! Push-style sink for copying subtrees out of the model.

use crate::error::Error;
use crate::model::{NodeKind, QName, SchemaType, XdmNode};

/// What a subtree copy forwards besides structure and string content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    pub namespaces: bool,
    pub type_annotations: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self { namespaces: true, type_annotations: true }
    }
}

/// Receiving sink for a subtree copy. All events are fallible; a failing
/// sink aborts the copy and the error propagates to the caller.
pub trait Receiver {
    fn start_document(&mut self) -> Result<(), Error>;
    fn end_document(&mut self) -> Result<(), Error>;
    fn start_element(&mut self, name: &QName, annotation: &SchemaType) -> Result<(), Error>;
    fn namespace(&mut self, prefix: &str, uri: &str) -> Result<(), Error>;
    fn attribute(&mut self, name: &QName, annotation: &SchemaType, value: &str)
    -> Result<(), Error>;
    fn end_element(&mut self) -> Result<(), Error>;
    fn characters(&mut self, text: &str) -> Result<(), Error>;
    fn comment(&mut self, text: &str) -> Result<(), Error>;
    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<(), Error>;
}

fn element_annotation<N: XdmNode>(node: &N, options: CopyOptions) -> SchemaType {
    if options.type_annotations {
        node.type_annotation()
    } else {
        SchemaType::Untyped
    }
}

fn attribute_annotation<N: XdmNode>(node: &N, options: CopyOptions) -> SchemaType {
    if options.type_annotations {
        node.type_annotation()
    } else {
        SchemaType::UntypedAtomic
    }
}

/// Copy a subtree to `receiver` as a stream of events.
///
/// Structure and string content are always forwarded; namespace events and
/// type annotations only when the options ask for them.
pub fn copy_subtree<N: XdmNode>(
    node: &N,
    receiver: &mut dyn Receiver,
    options: CopyOptions,
) -> Result<(), Error> {
    match node.kind() {
        NodeKind::Document => {
            receiver.start_document()?;
            for child in node.children() {
                copy_subtree(&child, receiver, options)?;
            }
            receiver.end_document()
        }
        NodeKind::Element => {
            let name = node.name().unwrap_or(QName {
                prefix: None,
                local: String::new(),
                ns_uri: None,
            });
            receiver.start_element(&name, &element_annotation(node, options))?;
            if options.namespaces {
                for ns in node.namespaces() {
                    let prefix = ns.name().and_then(|q| q.prefix).unwrap_or_default();
                    receiver.namespace(&prefix, &ns.string_value())?;
                }
            }
            for attr in node.attributes() {
                let name = attr.name().unwrap_or(QName {
                    prefix: None,
                    local: String::new(),
                    ns_uri: None,
                });
                receiver.attribute(
                    &name,
                    &attribute_annotation(&attr, options),
                    &attr.string_value(),
                )?;
            }
            for child in node.children() {
                copy_subtree(&child, receiver, options)?;
            }
            receiver.end_element()
        }
        NodeKind::Attribute => {
            let name = node.name().unwrap_or(QName {
                prefix: None,
                local: String::new(),
                ns_uri: None,
            });
            receiver.attribute(&name, &attribute_annotation(node, options), &node.string_value())
        }
        NodeKind::Text => receiver.characters(&node.string_value()),
        NodeKind::Comment => receiver.comment(&node.string_value()),
        NodeKind::ProcessingInstruction => {
            let target = node.name().map(|q| q.local).unwrap_or_default();
            receiver.processing_instruction(&target, &node.string_value())
        }
        NodeKind::Namespace => {
            let prefix = node.name().and_then(|q| q.prefix).unwrap_or_default();
            receiver.namespace(&prefix, &node.string_value())
        }
    }
}
