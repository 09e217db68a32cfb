//! Decorator that fires a completion callback exactly once when the wrapped
//! cursor first signals exhaustion.

use crate::cursor::{CursorProps, SequenceCursor};
use crate::error::Error;
use crate::model::XdmNode;
use crate::xdm::XdmItem;
use std::sync::Arc;
use tracing::trace;

/// Completion callback: receives the exhausted base cursor and the number of
/// items it had delivered.
pub type CloseAction<N> =
    Arc<dyn Fn(&mut dyn SequenceCursor<N>, i64) -> Result<(), Error> + Send + Sync>;

/// Wraps a base cursor and a registered close action.
///
/// The action fires at most once per decorator instance, precisely on the
/// transition from active to exhausted. A failing action surfaces as the
/// failure of the `next_item` call that triggered it, even though the base
/// cursor has legitimately reached its end.
pub struct ClosingCursor<N: XdmNode> {
    base: Box<dyn SequenceCursor<N>>,
    on_close: CloseAction<N>,
    fired: bool,
}

impl<N: XdmNode> ClosingCursor<N> {
    pub fn new(base: Box<dyn SequenceCursor<N>>, on_close: CloseAction<N>) -> Self {
        Self { base, on_close, fired: false }
    }
}

impl<N: XdmNode> SequenceCursor<N> for ClosingCursor<N> {
    fn next_item(&mut self) -> Result<Option<XdmItem<N>>, Error> {
        // Count of items the base has already yielded, taken before advancing.
        let before = self.base.position();
        let item = self.base.next_item()?;
        if item.is_none() && !self.fired {
            self.fired = true;
            trace!(count = before, "sequence exhausted, firing close action");
            (self.on_close)(self.base.as_mut(), before)?;
        }
        Ok(item)
    }

    fn current(&self) -> Option<XdmItem<N>> {
        self.base.current()
    }

    fn position(&self) -> i64 {
        self.base.position()
    }

    fn fresh(&self) -> Result<Box<dyn SequenceCursor<N>>, Error> {
        // A fresh traversal gets its own decorator, so the action may fire
        // once per distinct traversal.
        Ok(Box::new(ClosingCursor::new(self.base.fresh()?, Arc::clone(&self.on_close))))
    }

    fn properties(&self) -> CursorProps {
        CursorProps::empty()
    }

    fn set_atomizing(&mut self, atomizing: bool) {
        self.base.set_atomizing(atomizing);
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.base.size_hint()
    }
}
