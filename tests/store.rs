use ironcast::{ResultStore, TypedRecord, TypedValue};

fn rec(n: i64) -> TypedRecord {
    [("n", TypedValue::Int(n))].into_iter().collect()
}

#[test]
fn presized_store_keeps_position_order() {
    let store = ResultStore::with_capacity(4);
    assert_eq!(store.capacity(), 4);
    store.put(3, rec(3));
    store.put(0, rec(0));
    store.put(2, rec(2));
    assert_eq!(store.filled(), 3);

    let out: Vec<i64> = store
        .into_records()
        .iter()
        .map(|r| r.get("n").and_then(TypedValue::as_int).unwrap())
        .collect();
    assert_eq!(out, [0, 2, 3]);
}

#[test]
fn grows_by_doubling_past_the_estimate() {
    let store = ResultStore::with_capacity(4);
    store.ensure_position(4);
    assert_eq!(store.capacity(), 8);
    store.ensure_position(100);
    assert_eq!(store.capacity(), 101);
    store.ensure_position(50);
    assert_eq!(store.capacity(), 101);
    store.put(100, rec(100));
    assert_eq!(store.into_records().len(), 1);
}

#[test]
fn zero_estimate_still_grows() {
    let store = ResultStore::with_capacity(0);
    for i in 0..10 {
        store.ensure_position(i);
        store.put(i, rec(i as i64));
    }
    assert!(store.capacity() >= 10);
    assert_eq!(store.into_records().len(), 10);
}

#[test]
fn empty_store_compacts_to_nothing() {
    assert!(ResultStore::with_capacity(16).into_records().is_empty());
}

#[test]
#[should_panic(expected = "written twice")]
fn second_write_to_a_slot_panics() {
    let store = ResultStore::with_capacity(1);
    store.put(0, rec(1));
    store.put(0, rec(2));
}

#[test]
#[should_panic(expected = "out of range")]
fn write_past_capacity_panics() {
    let store = ResultStore::with_capacity(1);
    store.put(5, rec(1));
}

#[test]
fn concurrent_writers_to_distinct_slots() {
    let store = ResultStore::with_capacity(1000);
    std::thread::scope(|s| {
        for t in 0..4 {
            let store = &store;
            s.spawn(move || {
                for i in (t..1000).step_by(4) {
                    store.put(i, rec(i as i64));
                }
            });
        }
    });
    let out = store.into_records();
    assert_eq!(out.len(), 1000);
    for (i, r) in out.iter().enumerate() {
        assert_eq!(r.get("n").and_then(TypedValue::as_int), Some(i as i64));
    }
}
