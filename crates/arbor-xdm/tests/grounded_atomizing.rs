use arbor_xdm::simple_node::{elem, text};
use arbor_xdm::xdm::{XdmAtomicValue as A, XdmItem as I};
use arbor_xdm::{Axis, SequenceCursor, SimpleNode, VecCursor, XdmNode};
use rstest::rstest;

type N = SimpleNode;

#[rstest]
fn materialize_rest_excludes_consumed_items() {
    let items: Vec<I<N>> = (1..=4).map(|i| I::Atomic(A::Integer(i))).collect();
    let mut cursor = VecCursor::new(items);
    cursor.next_item().expect("ok");

    let rest = cursor.as_grounded().expect("vec cursor is grounded").materialize_rest().expect("ok");
    let values: Vec<_> = rest
        .into_iter()
        .map(|item| match item {
            I::Atomic(A::Integer(i)) => i,
            other => panic!("expected integer, got {other:?}"),
        })
        .collect();
    assert_eq!(values, [2, 3, 4]);

    // Grounding consumed the remainder.
    assert!(cursor.next_item().expect("ok").is_none());
    assert_eq!(cursor.position(), -1);
}

#[rstest]
fn axis_cursor_is_not_grounded() {
    let root = elem("root").child(elem("a")).build();
    let mut cursor = root.iterate_axis(Axis::Child);
    assert!(cursor.as_grounded().is_none());
}

#[rstest]
fn atomizing_hint_yields_values_matching_node_string_values() {
    let a = elem("a").child(text("alpha")).build();
    let b = elem("b").child(text("beta")).build();
    let expected = [a.string_value(), b.string_value()];

    let mut cursor = VecCursor::new(vec![I::Node(a), I::Node(b)]);
    cursor.set_atomizing(true);

    // The hint is non-binding: the consumer accepts nodes or atomics and
    // checks only that the string form matches.
    let mut seen = Vec::new();
    while let Some(item) = cursor.next_item().expect("ok") {
        seen.push(match item {
            I::Node(n) => n.string_value(),
            I::Atomic(v) => v.lexical_form(),
        });
    }
    assert_eq!(seen, expected);
}

#[rstest]
fn atomizing_hint_is_ignored_by_axis_cursors() {
    let root = elem("root").child(elem("a").child(text("x"))).build();
    let mut cursor = root.iterate_axis(Axis::Child);
    cursor.set_atomizing(true);
    match cursor.next_item().expect("ok") {
        Some(I::Node(n)) => assert_eq!(n.string_value(), "x"),
        other => panic!("axis cursor still yields nodes, got {other:?}"),
    }
}
