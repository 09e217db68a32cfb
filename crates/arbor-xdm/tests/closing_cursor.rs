use arbor_xdm::xdm::{XdmAtomicValue as A, XdmItem as I};
use arbor_xdm::{
    CloseAction, ClosingCursor, CursorProps, EmptyCursor, Error, ErrorCode, SequenceCursor,
    SimpleNode, VecCursor,
};
use rstest::rstest;
use std::sync::{Arc, Mutex};

type N = SimpleNode;

fn items(n: usize) -> Box<dyn SequenceCursor<N>> {
    let items: Vec<_> = (0..n).map(|i| I::Atomic(A::Integer(i as i64))).collect();
    Box::new(VecCursor::new(items))
}

fn recording_action(log: Arc<Mutex<Vec<i64>>>) -> CloseAction<N> {
    Arc::new(move |_base, count| {
        log.lock().unwrap().push(count);
        Ok(())
    })
}

#[rstest]
fn close_action_fires_exactly_once_with_item_count() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut cursor = ClosingCursor::new(items(2), recording_action(Arc::clone(&log)));

    assert!(cursor.next_item().expect("ok").is_some());
    assert!(cursor.next_item().expect("ok").is_some());
    assert!(log.lock().unwrap().is_empty());

    // The advance that discovers exhaustion fires the action with the count
    // of items the base had already yielded.
    assert!(cursor.next_item().expect("ok").is_none());
    assert_eq!(*log.lock().unwrap(), vec![2]);

    // Further advances after exhaustion never refire.
    assert!(cursor.next_item().expect("ok").is_none());
    assert!(cursor.next_item().expect("ok").is_none());
    assert_eq!(*log.lock().unwrap(), vec![2]);
}

#[rstest]
fn close_action_fires_with_zero_for_an_empty_base() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut cursor =
        ClosingCursor::new(Box::new(EmptyCursor::<N>::new()), recording_action(Arc::clone(&log)));
    assert!(cursor.next_item().expect("ok").is_none());
    assert_eq!(*log.lock().unwrap(), vec![0]);
}

#[rstest]
fn failing_close_action_surfaces_on_the_triggering_advance() {
    let action: CloseAction<N> =
        Arc::new(|_base, _count| Err(Error::from_code(ErrorCode::FOER0000, "cleanup failed")));
    let mut cursor = ClosingCursor::new(items(1), action);

    assert!(cursor.next_item().expect("ok").is_some());
    let err = cursor.next_item().expect_err("close failure propagates");
    assert_eq!(err.code_enum(), ErrorCode::FOER0000);
}

#[rstest]
fn fresh_traversal_gets_its_own_firing() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut cursor = ClosingCursor::new(items(3), recording_action(Arc::clone(&log)));

    let mut restart = cursor.fresh().expect("fresh cursor");
    while restart.next_item().expect("ok").is_some() {}
    assert_eq!(*log.lock().unwrap(), vec![3]);

    // The original decorator still fires for its own traversal.
    while cursor.next_item().expect("ok").is_some() {}
    assert_eq!(*log.lock().unwrap(), vec![3, 3]);
}

#[rstest]
fn decorator_delegates_position_and_current() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut cursor = ClosingCursor::new(items(2), recording_action(log));

    assert_eq!(cursor.position(), 0);
    let first = cursor.next_item().expect("ok");
    assert_eq!(cursor.position(), 1);
    assert_eq!(cursor.current(), first);
    assert_eq!(cursor.properties(), CursorProps::empty());
}
