//! The XDM value domain cursors range over: atomic values and node items.

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName {
    pub ns_uri: Option<String>,
    pub local: String,
}

impl ExpandedName {
    pub fn new(ns_uri: Option<String>, local: impl Into<String>) -> Self {
        Self { ns_uri, local: local.into() }
    }
}

/// Subset of the XDM atomic type universe carried by this core.
/// Rationale:
/// - Untyped atomics are the workhorse: projection typed values and the
///   atomizing fast path both produce them.
/// - Numeric/string/boolean/URI values cover what evaluators feed back into
///   sequences; further subtypes live with the evaluator, not here.
#[derive(Debug, Clone, PartialEq)]
pub enum XdmAtomicValue {
    Boolean(bool),
    String(String),
    Integer(i64),
    Double(f64),
    AnyUri(String),
    UntypedAtomic(String),
    QName {
        ns_uri: Option<String>,
        prefix: Option<String>,
        local: String,
    },
}

impl XdmAtomicValue {
    /// Lexical form of the value (the string an atomization consumer sees).
    pub fn lexical_form(&self) -> String {
        match self {
            XdmAtomicValue::Boolean(b) => b.to_string(),
            XdmAtomicValue::String(s)
            | XdmAtomicValue::AnyUri(s)
            | XdmAtomicValue::UntypedAtomic(s) => s.clone(),
            XdmAtomicValue::Integer(i) => i.to_string(),
            XdmAtomicValue::Double(d) => d.to_string(),
            XdmAtomicValue::QName { prefix, local, .. } => match prefix {
                Some(p) => format!("{p}:{local}"),
                None => local.clone(),
            },
        }
    }
}

pub type XdmSequence<N> = Vec<XdmItem<N>>;

#[derive(Debug, Clone, PartialEq)]
pub enum XdmItem<N> {
    Node(N),
    Atomic(XdmAtomicValue),
}

// Convenience conversion: allow passing a node directly where an XdmItem<N> is expected.
impl<N> From<N> for XdmItem<N> {
    fn from(n: N) -> Self {
        XdmItem::Node(n)
    }
}

impl<N> fmt::Display for XdmItem<N>
where
    N: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XdmItem::Node(_) => write!(f, "<node>"),
            XdmItem::Atomic(a) => write!(f, "{:?}", a),
        }
    }
}
