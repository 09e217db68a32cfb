//! The sequence cursor protocol: forward-only, restartable via a fresh
//! cursor, with optional per-instance capabilities.

use crate::error::Error;
use crate::model::XdmNode;
use crate::xdm::{XdmAtomicValue, XdmItem, XdmSequence};
use core::marker::PhantomData;
use core::ops::BitOr;
use std::sync::Arc;

/// Capability bitset attached to a cursor instance.
///
/// Flags describe the instance in its current state, not the type: a cursor
/// may legitimately report different properties as its internal state
/// changes. Empty is always a valid conservative answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorProps(u8);

impl CursorProps {
    /// The cursor can materialize its remaining items without replay.
    pub const GROUNDED: CursorProps = CursorProps(0b0001);
    /// The cursor understands the atomizing hint.
    pub const ATOMIZABLE: CursorProps = CursorProps(0b0010);

    pub const fn empty() -> Self {
        CursorProps(0)
    }

    pub const fn contains(self, other: CursorProps) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CursorProps {
    type Output = CursorProps;
    fn bitor(self, rhs: CursorProps) -> CursorProps {
        CursorProps(self.0 | rhs.0)
    }
}

/// Forward-only cursor over one logical sequence.
///
/// Contract:
/// - `next_item` returns `Ok(None)` exactly at exhaustion and on every call
///   thereafter; items are never resurrected after the end has been signaled.
/// - After an `Err` the cursor state is undefined and it must not be used
///   again; failures are never swallowed or retried here.
/// - `fresh` yields an independent cursor over the same logical sequence,
///   positioned before the first item, without disturbing `self`. It is the
///   only restart mechanism; consumers needing `last()` or a length replay
///   the sequence through it rather than rewinding.
pub trait SequenceCursor<N: XdmNode>: Send {
    fn next_item(&mut self) -> Result<Option<XdmItem<N>>, Error>;

    /// Item delivered by the most recent advance; `None` before the first
    /// advance and after exhaustion. Pure observer.
    fn current(&self) -> Option<XdmItem<N>>;

    /// 0 before the first advance, N after the Nth successful advance, -1
    /// after exhaustion. A provably stateless empty cursor may report 0
    /// throughout.
    fn position(&self) -> i64;

    /// Independent restart over the same logical sequence.
    fn fresh(&self) -> Result<Box<dyn SequenceCursor<N>>, Error>;

    fn properties(&self) -> CursorProps {
        CursorProps::empty()
    }

    /// One-way hint that the consumer atomizes every node it receives. The
    /// cursor may then deliver untyped atomics in place of node items for
    /// some, all, or none of the nodes; consumers must accept either form.
    fn set_atomizing(&mut self, _atomizing: bool) {}

    /// Checked downcast to the grounded capability.
    fn as_grounded(&mut self) -> Option<&mut dyn GroundedCursor<N>> {
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

/// A cursor that can hand over its remaining items as an in-memory sequence.
pub trait GroundedCursor<N: XdmNode>: SequenceCursor<N> {
    /// All items not yet consumed, in order. Leaves the cursor exhausted.
    fn materialize_rest(&mut self) -> Result<XdmSequence<N>, Error>;
}

/// Cursor over the empty sequence. Stateless, so its position is 0 throughout
/// rather than following the 0/N/-1 progression.
#[derive(Debug, Clone, Default)]
pub struct EmptyCursor<N> {
    _marker: PhantomData<N>,
}

impl<N> EmptyCursor<N> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<N: XdmNode> SequenceCursor<N> for EmptyCursor<N> {
    fn next_item(&mut self) -> Result<Option<XdmItem<N>>, Error> {
        Ok(None)
    }

    fn current(&self) -> Option<XdmItem<N>> {
        None
    }

    fn position(&self) -> i64 {
        0
    }

    fn fresh(&self) -> Result<Box<dyn SequenceCursor<N>>, Error> {
        Ok(Box::new(EmptyCursor::new()))
    }

    fn properties(&self) -> CursorProps {
        CursorProps::GROUNDED
    }

    fn as_grounded(&mut self) -> Option<&mut dyn GroundedCursor<N>> {
        Some(self)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(0))
    }
}

impl<N: XdmNode> GroundedCursor<N> for EmptyCursor<N> {
    fn materialize_rest(&mut self) -> Result<XdmSequence<N>, Error> {
        Ok(Vec::new())
    }
}

/// Cursor over an in-memory sequence. The backing storage is shared, so
/// `fresh` is cheap regardless of length.
pub struct VecCursor<N: XdmNode> {
    items: Arc<Vec<XdmItem<N>>>,
    // Index of the next item to deliver; equals the count already delivered.
    index: usize,
    exhausted: bool,
    current: Option<XdmItem<N>>,
    atomizing: bool,
}

impl<N: XdmNode> VecCursor<N> {
    pub fn new(items: impl Into<Vec<XdmItem<N>>>) -> Self {
        Self::from_shared(Arc::new(items.into()))
    }

    pub fn single(item: impl Into<XdmItem<N>>) -> Self {
        Self::new(vec![item.into()])
    }

    fn from_shared(items: Arc<Vec<XdmItem<N>>>) -> Self {
        Self { items, index: 0, exhausted: false, current: None, atomizing: false }
    }
}

impl<N: XdmNode> SequenceCursor<N> for VecCursor<N> {
    fn next_item(&mut self) -> Result<Option<XdmItem<N>>, Error> {
        if self.index >= self.items.len() {
            self.exhausted = true;
            self.current = None;
            return Ok(None);
        }
        let mut item = self.items[self.index].clone();
        self.index += 1;
        if self.atomizing
            && let XdmItem::Node(n) = &item
        {
            // Nodes already exist here, but delivering the untyped value keeps
            // the consumer on the cheap path it asked for.
            item = XdmItem::Atomic(XdmAtomicValue::UntypedAtomic(n.string_value()));
        }
        self.current = Some(item.clone());
        Ok(Some(item))
    }

    fn current(&self) -> Option<XdmItem<N>> {
        self.current.clone()
    }

    fn position(&self) -> i64 {
        if self.exhausted {
            -1
        } else {
            self.index as i64
        }
    }

    fn fresh(&self) -> Result<Box<dyn SequenceCursor<N>>, Error> {
        Ok(Box::new(VecCursor::from_shared(Arc::clone(&self.items))))
    }

    fn properties(&self) -> CursorProps {
        CursorProps::GROUNDED | CursorProps::ATOMIZABLE
    }

    fn set_atomizing(&mut self, atomizing: bool) {
        self.atomizing = atomizing;
    }

    fn as_grounded(&mut self) -> Option<&mut dyn GroundedCursor<N>> {
        Some(self)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.items.len().saturating_sub(self.index);
        (rest, Some(rest))
    }
}

impl<N: XdmNode> GroundedCursor<N> for VecCursor<N> {
    fn materialize_rest(&mut self) -> Result<XdmSequence<N>, Error> {
        let rest = self.items[self.index..].to_vec();
        self.index = self.items.len();
        self.exhausted = true;
        self.current = None;
        Ok(rest)
    }
}
