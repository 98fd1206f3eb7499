use memsim::{
    Algorithm,
    FifoReplacer,
    FrameKey,
    MemoryEngine,
    ReplacementPolicy,
    SimConfig,
    Technique,
};

fn key(owner: u64, frame: usize) -> FrameKey {
    FrameKey::new(owner, frame)
}

#[test]
fn basic_ops() {
    let mut replacer = FifoReplacer::new();

    // Scenario: queue three frames, then re-insert one. Order is unchanged.
    replacer.insert(key(1, 0), 0);
    replacer.insert(key(2, 1), 0);
    replacer.insert(key(3, 2), 0);
    replacer.insert(key(1, 0), 5);
    assert_eq!(3, replacer.len());

    // Scenario: accesses do not reorder the queue.
    replacer.touch(key(1, 0), 7);
    assert_eq!(replacer.peek(), Some(key(1, 0)));
    assert_eq!(replacer.eviction_order(), vec![key(1, 0), key(2, 1), key(3, 2)]);

    // Scenario: remove from the middle, then drain.
    assert!(replacer.remove(key(2, 1)));
    assert!(!replacer.remove(key(2, 1)));
    assert_eq!(replacer.evict(), Some(key(1, 0)));
    assert_eq!(replacer.evict(), Some(key(3, 2)));
    assert_eq!(replacer.evict(), None);
    assert!(replacer.is_empty());
}

fn four_frames() -> MemoryEngine {
    MemoryEngine::new(SimConfig::new(Technique::Paging, 256, 64, Algorithm::Fifo)).unwrap()
}

#[test]
fn oldest_allocation_is_evicted() {
    let mut engine = four_frames();

    // Scenario: owners A..D take one frame each.
    for _ in 0..4 {
        engine.allocate(64).unwrap();
    }

    // Accessing A does not save it under FIFO.
    assert!(engine.access(0));

    assert_eq!(engine.allocate(64).unwrap(), 0);
    let state = engine.current_state();
    assert!(!state.page_table.contains_key(&1));
    assert_eq!(state.page_table[&5], vec![0]);
    assert_eq!(state.page_faults, 1);
}

#[test]
fn multi_frame_owners_are_evicted_frame_by_frame() {
    let mut engine = four_frames();
    engine.allocate(128).unwrap(); // owner 1: frames 0, 1
    engine.allocate(128).unwrap(); // owner 2: frames 2, 3

    // Scenario: a single-frame request evicts only frame 0; owner 1 keeps
    // frame 1.
    assert_eq!(engine.allocate(1).unwrap(), 0);
    let state = engine.current_state();
    assert_eq!(state.page_table[&1], vec![1]);
    assert_eq!(state.page_table[&3], vec![0]);

    // Scenario: the next three-frame request evicts frame 1, then 2 and 3.
    assert_eq!(engine.allocate(192).unwrap(), 64);
    let state = engine.current_state();
    assert!(!state.page_table.contains_key(&1));
    assert!(!state.page_table.contains_key(&2));
    assert_eq!(state.page_table[&4], vec![1, 2, 3]);
    assert_eq!(state.page_faults, 4);
    assert_eq!(
        state.eviction_order,
        vec![key(3, 0), key(4, 1), key(4, 2), key(4, 3)]
    );
}

#[test]
fn deallocation_removes_queue_entries() {
    let mut engine = four_frames();
    engine.allocate(64).unwrap(); // owner 1: frame 0
    engine.allocate(64).unwrap(); // owner 2: frame 1
    engine.deallocate(0).unwrap();

    assert_eq!(engine.eviction_order(), vec![key(2, 1)]);

    // Scenario: fill memory; the first victim is owner 2, not a stale entry.
    engine.allocate(192).unwrap(); // owner 3: frames 0, 2, 3
    assert_eq!(engine.allocate(64).unwrap(), 64);
    assert!(!engine.page_table().contains_key(&2));
}
