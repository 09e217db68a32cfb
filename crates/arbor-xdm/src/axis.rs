//! Streaming axis traversal over any `XdmNode` implementation.
//!
//! One cursor per (context node, axis). Every node on the axis is yielded in
//! axis order; node-test filtering is the consumer's business. Traversal
//! never buffers whole axes: siblings and descendants are computed from
//! parent/child links on demand.

use crate::cursor::{CursorProps, SequenceCursor};
use crate::error::Error;
use crate::model::{Axis, NodeKind, XdmNode};
use crate::xdm::XdmItem;
use smallvec::SmallVec;
use string_cache::DefaultAtom;

pub struct AxisCursor<N: XdmNode> {
    node: N,
    axis: Axis,
    state: AxisState<N>,
    delivered: i64,
    exhausted: bool,
    current: Option<XdmItem<N>>,
}

enum AxisState<N> {
    // Uninitialized; replaced by a specific variant on the first advance
    Init,
    // Emit self once
    SelfOnce {
        emitted: bool,
    },
    // Stream child:: without pre-buffering
    ChildIter {
        current: Option<N>,
        initialized: bool,
    },
    AttributeIter {
        current: Option<N>,
        initialized: bool,
    },
    Parent {
        done: bool,
    },
    // Walks the parent chain; the starting point decides or-self
    Ancestors {
        current: Option<N>,
    },
    // Depth-first traversal for descendant/descendant-or-self using
    // document-order successors. `last` holds the last emitted node in
    // pre-order; we stop at the first node after the anchor's subtree.
    Descend {
        last: Option<N>,
        include_self: bool,
        started: bool,
        after: Option<N>,
    },
    FollowingSiblingIter {
        current: Option<N>,
        initialized: bool,
    },
    PrecedingSiblingIter {
        current: Option<N>,
        initialized: bool,
    },
    Following {
        next: Option<N>,
        initialized: bool,
    },
    Preceding {
        // path from root to context (inclusive) to filter ancestors
        path: SmallVec<[N; 16]>,
        current: Option<N>,
        initialized: bool,
    },
    // In-scope namespaces: walk ancestors, dedup by prefix
    Namespaces {
        seen: SmallVec<[DefaultAtom; 8]>,
        current: Option<N>,
        buf: SmallVec<[N; 8]>,
        idx: usize,
    },
}

impl<N: XdmNode> AxisCursor<N> {
    pub fn new(node: N, axis: Axis) -> Self {
        Self { node, axis, state: AxisState::Init, delivered: 0, exhausted: false, current: None }
    }

    #[inline]
    fn is_attr_or_namespace(node: &N) -> bool {
        matches!(node.kind(), NodeKind::Attribute | NodeKind::Namespace)
    }

    fn init_state(&mut self) {
        self.state = match self.axis {
            Axis::SelfAxis => AxisState::SelfOnce { emitted: false },
            Axis::Child => AxisState::ChildIter { current: None, initialized: false },
            Axis::Attribute => AxisState::AttributeIter { current: None, initialized: false },
            Axis::Parent => AxisState::Parent { done: false },
            Axis::Ancestor => AxisState::Ancestors { current: self.node.parent() },
            Axis::AncestorOrSelf => AxisState::Ancestors { current: Some(self.node.clone()) },
            Axis::Descendant => {
                AxisState::Descend { last: None, include_self: false, started: false, after: None }
            }
            Axis::DescendantOrSelf => {
                AxisState::Descend { last: None, include_self: true, started: false, after: None }
            }
            Axis::FollowingSibling => {
                AxisState::FollowingSiblingIter { current: None, initialized: false }
            }
            Axis::PrecedingSibling => {
                AxisState::PrecedingSiblingIter { current: None, initialized: false }
            }
            Axis::Following => AxisState::Following { next: None, initialized: false },
            Axis::Preceding => {
                let path = Self::path_to_root(self.node.clone());
                AxisState::Preceding { path, current: None, initialized: false }
            }
            Axis::Namespace => {
                let cur = if matches!(self.node.kind(), NodeKind::Element) {
                    Some(self.node.clone())
                } else {
                    None
                };
                AxisState::Namespaces {
                    seen: SmallVec::new(),
                    current: cur,
                    buf: SmallVec::new(),
                    idx: 0,
                }
            }
        };
    }

    fn next_candidate(&mut self) -> Option<N> {
        if matches!(self.state, AxisState::Init) {
            self.init_state();
        }
        match &mut self.state {
            AxisState::SelfOnce { emitted } => {
                if *emitted {
                    return None;
                }
                *emitted = true;
                Some(self.node.clone())
            }
            AxisState::ChildIter { current, initialized } => {
                if !*initialized {
                    *current = Self::first_child_in_doc(&self.node);
                    *initialized = true;
                }
                let cur = current.take()?;
                // Pre-compute next for the subsequent call
                *current = Self::next_sibling_in_doc(&cur);
                Some(cur)
            }
            AxisState::AttributeIter { current, initialized } => {
                if !*initialized {
                    *initialized = true;
                    *current = self.node.attributes().into_iter().next();
                }
                let cur = current.take()?;
                *current = Self::next_attribute(&self.node, &cur);
                Some(cur)
            }
            AxisState::Parent { done } => {
                if *done {
                    return None;
                }
                *done = true;
                self.node.parent()
            }
            AxisState::Ancestors { current } => {
                let cur = current.take()?;
                *current = cur.parent();
                Some(cur)
            }
            AxisState::Descend { last, include_self, started, after } => {
                if !*started {
                    *started = true;
                    // Boundary: first node after the subtree rooted at the context.
                    let end = Self::last_descendant_in_doc(self.node.clone());
                    *after = Self::doc_successor(&end);
                    if *include_self {
                        let n = self.node.clone();
                        *last = Some(n.clone());
                        return Some(n);
                    }
                    let first = Self::first_child_in_doc(&self.node)?;
                    *last = Some(first.clone());
                    return Some(first);
                }
                let prev = last.take()?;
                let succ = Self::doc_successor(&prev)?;
                if after.as_ref() == Some(&succ) {
                    return None;
                }
                *last = Some(succ.clone());
                Some(succ)
            }
            AxisState::FollowingSiblingIter { current, initialized } => {
                if !*initialized {
                    *current = Self::next_sibling_in_doc(&self.node);
                    *initialized = true;
                }
                let cur = current.take()?;
                *current = Self::next_sibling_in_doc(&cur);
                Some(cur)
            }
            AxisState::PrecedingSiblingIter { current, initialized } => {
                if !*initialized {
                    *current = Self::prev_sibling_in_doc(&self.node);
                    *initialized = true;
                }
                let cur = current.take()?;
                *current = Self::prev_sibling_in_doc(&cur);
                Some(cur)
            }
            AxisState::Following { next, initialized } => {
                if !*initialized {
                    *initialized = true;
                    let start = Self::last_descendant_in_doc(self.node.clone());
                    *next = Self::doc_successor(&start);
                }
                while let Some(n) = next.take() {
                    *next = Self::doc_successor(&n);
                    if !Self::is_attr_or_namespace(&n) {
                        return Some(n);
                    }
                }
                None
            }
            AxisState::Preceding { path, current, initialized } => {
                if !*initialized {
                    *initialized = true;
                    *current = Self::doc_predecessor(&self.node);
                }
                while let Some(cur) = current.take() {
                    *current = Self::doc_predecessor(&cur);
                    // Skip attributes/namespaces and ancestors of the context node
                    if Self::is_attr_or_namespace(&cur) {
                        continue;
                    }
                    if path.iter().any(|a| a == &cur) {
                        continue;
                    }
                    return Some(cur);
                }
                None
            }
            AxisState::Namespaces { seen, current, buf, idx } => {
                if *idx < buf.len() {
                    let n = buf[*idx].clone();
                    *idx += 1;
                    return Some(n);
                }
                // Refill buffer from the current element, then walk to parent.
                // A prefix seen on a nearer element shadows outer declarations.
                while let Some(cur) = current.take() {
                    if matches!(cur.kind(), NodeKind::Element) {
                        buf.clear();
                        *idx = 0;
                        for ns in cur.namespaces() {
                            if let Some(q) = ns.name() {
                                let atom = DefaultAtom::from(q.prefix.unwrap_or_default().as_str());
                                if !seen.iter().any(|a| a == &atom) {
                                    seen.push(atom);
                                    buf.push(ns.clone());
                                }
                            }
                        }
                        *current = cur.parent();
                        if !buf.is_empty() {
                            let n = buf[*idx].clone();
                            *idx += 1;
                            return Some(n);
                        }
                        continue;
                    }
                    *current = cur.parent();
                }
                None
            }
            AxisState::Init => unreachable!("axis cursor used before initialization"),
        }
    }

    fn path_to_root(n: N) -> SmallVec<[N; 16]> {
        let mut p: SmallVec<[N; 16]> = SmallVec::new();
        let mut cur: Option<N> = Some(n);
        while let Some(x) = cur {
            p.push(x.clone());
            cur = x.parent();
        }
        p.reverse();
        p
    }

    fn first_child_in_doc(node: &N) -> Option<N> {
        node.children().into_iter().find(|c| !Self::is_attr_or_namespace(c))
    }

    fn next_sibling_in_doc(node: &N) -> Option<N> {
        let parent = node.parent()?;
        let mut seen = false;
        for s in parent.children() {
            if seen && !Self::is_attr_or_namespace(&s) {
                return Some(s);
            }
            if s == *node {
                seen = true;
            }
        }
        None
    }

    fn prev_sibling_in_doc(node: &N) -> Option<N> {
        let parent = node.parent()?;
        let mut prev: Option<N> = None;
        for s in parent.children() {
            if s == *node {
                break;
            }
            if !Self::is_attr_or_namespace(&s) {
                prev = Some(s);
            }
        }
        prev
    }

    fn next_attribute(parent: &N, prev: &N) -> Option<N> {
        let mut seen = false;
        for a in parent.attributes() {
            if seen {
                return Some(a);
            }
            if &a == prev {
                seen = true;
            }
        }
        None
    }

    fn last_descendant_in_doc(mut node: N) -> N {
        loop {
            let mut last: Option<N> = None;
            for c in node.children() {
                if !Self::is_attr_or_namespace(&c) {
                    last = Some(c);
                }
            }
            match last {
                Some(n) => node = n,
                None => return node,
            }
        }
    }

    fn doc_successor(node: &N) -> Option<N> {
        if let Some(c) = Self::first_child_in_doc(node) {
            return Some(c);
        }
        let mut cur = node.clone();
        while let Some(p) = cur.parent() {
            if let Some(sib) = Self::next_sibling_in_doc(&cur) {
                return Some(sib);
            }
            cur = p;
        }
        None
    }

    fn doc_predecessor(node: &N) -> Option<N> {
        // Predecessor in doc order: last descendant of the preceding sibling,
        // else the parent.
        if let Some(prev_sib) = Self::prev_sibling_in_doc(node) {
            return Some(Self::last_descendant_in_doc(prev_sib));
        }
        node.parent()
    }
}

impl<N: XdmNode> SequenceCursor<N> for AxisCursor<N> {
    fn next_item(&mut self) -> Result<Option<XdmItem<N>>, Error> {
        if self.exhausted {
            return Ok(None);
        }
        match self.next_candidate() {
            Some(n) => {
                self.delivered += 1;
                self.current = Some(XdmItem::Node(n));
                Ok(self.current.clone())
            }
            None => {
                self.exhausted = true;
                self.current = None;
                Ok(None)
            }
        }
    }

    fn current(&self) -> Option<XdmItem<N>> {
        self.current.clone()
    }

    fn position(&self) -> i64 {
        if self.exhausted {
            -1
        } else {
            self.delivered
        }
    }

    fn fresh(&self) -> Result<Box<dyn SequenceCursor<N>>, Error> {
        Ok(Box::new(AxisCursor::new(self.node.clone(), self.axis)))
    }

    fn properties(&self) -> CursorProps {
        CursorProps::empty()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}
