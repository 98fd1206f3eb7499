use {
    memsim::{
        AccessResult,
        Algorithm,
        Frame,
        FrameKey,
        MemoryEngine,
        Operation,
        OperationKind,
        SNAPSHOT_OPERATIONS,
        SimConfig,
        SimError,
        Technique,
    },
    proptest::prelude::*,
    rstest::rstest,
    std::collections::BTreeSet,
    tracing_subscriber::EnvFilter,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn engine(memory_size: usize, page_size: usize, algorithm: Algorithm) -> MemoryEngine {
    init_tracing();
    MemoryEngine::new(SimConfig::new(
        Technique::Paging,
        memory_size,
        page_size,
        algorithm,
    ))
    .unwrap()
}

/// Allocated frames, page table and replacement metadata all agree.
fn assert_consistent(engine: &MemoryEngine) {
    let allocated: BTreeSet<FrameKey> = engine
        .frames()
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.owner_id().map(|owner| FrameKey::new(owner, i)))
        .collect();

    let mut in_table = BTreeSet::new();
    for (&owner, frames) in engine.page_table() {
        assert!(!frames.is_empty(), "empty page table entry for {owner}");
        for &frame in frames {
            assert!(
                in_table.insert(FrameKey::new(owner, frame)),
                "frame {frame} listed twice"
            );
        }
    }
    assert_eq!(allocated, in_table);

    let tracked: BTreeSet<FrameKey> = engine.eviction_order().into_iter().collect();
    assert_eq!(tracked.len(), engine.eviction_order().len());
    assert_eq!(allocated, tracked);
}

#[rstest]
#[case(0, 64)]
#[case(256, 0)]
#[case(250, 64)]
fn rejects_bad_configuration(#[case] memory_size: usize, #[case] page_size: usize) {
    let config = SimConfig::new(Technique::Segmentation, memory_size, page_size, Algorithm::Lru);
    assert!(matches!(MemoryEngine::new(config), Err(SimError::Config(_))));
}

#[test]
fn fresh_engine() {
    let engine = engine(512, 64, Algorithm::Fifo);
    let state = engine.current_state();
    assert_eq!(state.total_frames, 8);
    assert!(state.frames.iter().all(|f| *f == Frame::Free));
    assert!(state.page_table.is_empty());
    assert!(state.last_operations.is_empty());
    assert_eq!(
        (state.page_faults, state.memory_accesses, state.page_hits),
        (0, 0, 0)
    );

    let results = engine.results();
    assert_eq!(results.hit_ratio, 0.0);
    assert_eq!(results.miss_ratio, 0.0);
    assert_eq!(results.memory_utilization, 0.0);
}

#[rstest]
#[case(1, 1)]
#[case(64, 1)]
#[case(65, 2)]
#[case(128, 2)]
#[case(256, 4)]
fn allocation_rounds_up_to_whole_frames(#[case] size: usize, #[case] frames: usize) {
    let mut engine = engine(256, 64, Algorithm::Fifo);
    assert_eq!(engine.allocate(size).unwrap(), 0);
    assert_eq!(engine.page_table()[&1], (0..frames).collect::<Vec<_>>());
    assert_eq!(engine.results().allocated_frame_count, frames);
}

#[test]
fn utilization() {
    let mut engine = engine(256, 64, Algorithm::Fifo);
    engine.allocate(128).unwrap();
    assert_eq!(engine.results().memory_utilization, 0.5);
}

#[test]
fn capacity_rejection_mutates_nothing() {
    let mut engine = engine(256, 64, Algorithm::Lru);
    engine.allocate(64).unwrap();
    let _ = engine.access(0);
    let before = engine.current_state();

    assert_eq!(
        engine.allocate(257),
        Err(SimError::Capacity {
            size: 257,
            memory_size: 256
        })
    );
    assert_eq!(engine.allocate(0), Err(SimError::InvalidSize));
    assert_eq!(engine.current_state(), before);

    // The owner id was not consumed either.
    engine.allocate(64).unwrap();
    assert!(engine.page_table().contains_key(&2));
}

#[test]
fn lowest_address_first_placement() {
    let mut engine = engine(512, 64, Algorithm::Fifo);
    assert_eq!(engine.allocate(128).unwrap(), 0); // frames 0, 1
    assert_eq!(engine.allocate(64).unwrap(), 128); // frame 2
    assert_eq!(engine.allocate(128).unwrap(), 192); // frames 3, 4
    engine.deallocate(128).unwrap();
    engine.deallocate(0).unwrap();

    // Scenario: holes at 0..=2, a three-frame request spans them in order.
    assert_eq!(engine.allocate(150).unwrap(), 0);
    assert_eq!(engine.page_table()[&4], vec![0, 1, 2]);

    // Scenario: non-contiguous free frames are used as well.
    engine.deallocate(0).unwrap();
    engine.allocate(64).unwrap(); // frame 0
    assert_eq!(engine.allocate(256).unwrap(), 64);
    assert_eq!(engine.page_table()[&6], vec![1, 2, 5, 6]);
    assert_consistent(&engine);
}

#[rstest]
#[case(0)]
#[case(64)]
#[case(130)]
fn deallocate_whole_allocation(#[case] address: usize) {
    let mut engine = engine(512, 64, Algorithm::Lru);
    engine.allocate(192).unwrap();
    engine.allocate(64).unwrap();

    engine.deallocate(address).unwrap();
    let state = engine.current_state();
    assert!(state.frames[..3].iter().all(|f| *f == Frame::Free));
    assert_eq!(state.frames[3], Frame::Allocated { owner_id: 2 });
    assert!(!state.page_table.contains_key(&1));
    assert_consistent(&engine);

    let last = &state.last_operations.last().unwrap().operation;
    assert_eq!(
        *last,
        Operation::Deallocate {
            owner_id: 1,
            address: address / 64 * 64,
            frames: vec![0, 1, 2],
        }
    );
}

#[test]
fn deallocate_free_frame_falls_back_to_first_allocated() {
    let mut engine = engine(256, 64, Algorithm::Fifo);
    assert_eq!(engine.deallocate(0), Err(SimError::NothingAllocated));

    engine.allocate(64).unwrap(); // frame 0
    engine.allocate(64).unwrap(); // frame 1
    engine.deallocate(0).unwrap();

    // Frame 2 is free, so frame 1 (owner 2) is released instead.
    engine.deallocate(128).unwrap();
    assert!(engine.page_table().is_empty());

    let last = &engine.operations().last().unwrap().operation;
    assert_eq!(
        *last,
        Operation::Deallocate {
            owner_id: 2,
            address: 64,
            frames: vec![1],
        }
    );

    assert_eq!(engine.deallocate(0), Err(SimError::NothingAllocated));
}

#[test]
fn deallocate_out_of_bounds() {
    let mut engine = engine(256, 64, Algorithm::Fifo);
    engine.allocate(64).unwrap();
    assert_eq!(
        engine.deallocate(256),
        Err(SimError::InvalidAddress {
            address: 256,
            frame: 4
        })
    );
    assert_consistent(&engine);
}

#[test]
fn access_hits_and_faults() {
    let mut engine = engine(256, 64, Algorithm::Fifo);
    engine.allocate(64).unwrap();

    assert!(engine.access(10));
    assert!(!engine.access(64));
    // Frame 1 was paged in by the fault.
    assert!(engine.access(100));

    let state = engine.current_state();
    assert_eq!(state.frames[1], Frame::Allocated { owner_id: 2 });
    assert_eq!(state.page_table[&2], vec![1]);
    assert_eq!((state.page_hits, state.page_faults, state.memory_accesses), (2, 1, 3));

    let results = engine.results();
    assert!((results.hit_ratio - 2.0 / 3.0).abs() < f64::EPSILON);
    assert!((results.miss_ratio - 1.0 / 3.0).abs() < f64::EPSILON);
}

#[test]
fn access_clamps_out_of_bounds_addresses() {
    let mut engine = engine(256, 64, Algorithm::Lru);

    assert!(!engine.access(10_000));
    assert_eq!(engine.frames()[3], Frame::Allocated { owner_id: 1 });
    assert!(engine.access(usize::MAX));

    // The log keeps the address as requested.
    let last = &engine.operations().last().unwrap().operation;
    assert_eq!(
        *last,
        Operation::Access {
            address: usize::MAX,
            result: AccessResult::Hit
        }
    );
}

#[test]
fn owner_ids_are_never_reused() {
    let mut engine = engine(128, 64, Algorithm::Fifo);
    engine.allocate(64).unwrap();
    engine.deallocate(0).unwrap();
    engine.allocate(64).unwrap();
    assert_eq!(engine.page_table().keys().copied().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn snapshot_exposes_last_operations() {
    let mut engine = engine(256, 64, Algorithm::Fifo);
    engine.allocate(64).unwrap();
    for i in 0..15 {
        let _ = engine.access(i * 8);
    }

    assert_eq!(engine.operations().len(), 16);
    let state = engine.current_state();
    assert_eq!(state.last_operations.len(), SNAPSHOT_OPERATIONS);
    assert_eq!(state.last_operations[..], engine.operations()[6..]);
    assert!(
        state
            .last_operations
            .iter()
            .all(|r| r.operation.kind() == OperationKind::Access)
    );
}

#[test]
fn snapshots_are_idempotent() {
    let mut engine = engine(512, 128, Algorithm::Lru);
    engine.allocate(300).unwrap();
    let _ = engine.access(400);

    assert_eq!(engine.current_state(), engine.current_state());
    assert_eq!(engine.results(), engine.results());
}

#[test]
fn segmentation_behaves_like_paging() {
    let run = |technique| {
        let mut engine =
            MemoryEngine::new(SimConfig::new(technique, 512, 64, Algorithm::Fifo)).unwrap();
        engine.allocate(200).unwrap();
        let _ = engine.access(300);
        engine.allocate(400).unwrap();
        engine.deallocate(0).unwrap();
        let state = engine.current_state();
        (state.frames, state.page_table, engine.results())
    };

    assert_eq!(run(Technique::Paging), run(Technique::Segmentation));
}

#[test]
fn state_serializes() {
    let mut engine = engine(256, 64, Algorithm::Lru);
    engine.allocate(64).unwrap();
    let _ = engine.access(128);

    let json = serde_json::to_value(engine.current_state()).unwrap();
    assert_eq!(json["algorithm"], "LRU");
    assert_eq!(json["technique"], "paging");
    assert_eq!(json["frames"][0]["status"], "allocated");
    assert_eq!(json["frames"][0]["owner_id"], 1);
    assert_eq!(json["frames"][1]["status"], "free");
    assert_eq!(json["page_table"]["2"][0], 2);
    assert_eq!(json["last_operations"][0]["type"], "allocate");
    assert_eq!(json["last_operations"][1]["result"], "fault");

    let json = serde_json::to_value(engine.results()).unwrap();
    assert_eq!(json["memory_utilization"], 0.5);
}

#[derive(Debug, Clone)]
enum Op {
    Allocate(usize),
    Deallocate(usize),
    Access(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1usize..600).prop_map(Op::Allocate),
        (0usize..600).prop_map(Op::Deallocate),
        (0usize..700).prop_map(Op::Access),
    ]
}

fn algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![Just(Algorithm::Fifo), Just(Algorithm::Lru)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bookkeeping_stays_consistent(
        algorithm in algorithm(),
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut engine = engine(512, 64, algorithm);
        let mut faults_before = 0;
        for op in ops {
            match op {
                Op::Allocate(size) => {
                    let res = engine.allocate(size);
                    prop_assert_eq!(res.is_err(), size > 512);
                }
                Op::Deallocate(address) => {
                    let _ = engine.deallocate(address);
                }
                Op::Access(address) => {
                    let _ = engine.access(address);
                }
            }
            assert_consistent(&engine);

            let state = engine.current_state();
            prop_assert!(state.page_faults >= faults_before);
            faults_before = state.page_faults;
        }
    }

    #[test]
    fn hits_and_faults_add_up(
        algorithm in algorithm(),
        addresses in prop::collection::vec(0usize..1024, 1..80),
    ) {
        let mut engine = engine(256, 32, algorithm);
        for address in addresses {
            let _ = engine.access(address);
        }
        let results = engine.results();
        prop_assert_eq!(results.page_hits + results.page_faults, results.memory_accesses);
        prop_assert!((results.hit_ratio + results.miss_ratio - 1.0).abs() < 1e-9);
    }
}
