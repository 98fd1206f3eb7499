use {
    super::{ExpectedOperation, Step, StepConfig, Tutorial},
    crate::{Algorithm, Technique},
};

const NO_CONFIG: StepConfig = StepConfig {
    technique: None,
    memory_size: None,
    page_size: None,
    algorithm: None,
};

const fn full(
    technique: Technique,
    memory_size: usize,
    page_size: usize,
    algorithm: Algorithm,
) -> StepConfig {
    StepConfig {
        technique: Some(technique),
        memory_size: Some(memory_size),
        page_size: Some(page_size),
        algorithm: Some(algorithm),
    }
}

const fn algorithm_only(algorithm: Algorithm) -> StepConfig {
    StepConfig {
        algorithm: Some(algorithm),
        ..NO_CONFIG
    }
}

const fn allocate(size: usize) -> Option<ExpectedOperation> {
    Some(ExpectedOperation::Allocate { size: Some(size) })
}

const fn access(address: usize) -> Option<ExpectedOperation> {
    Some(ExpectedOperation::Access {
        address: Some(address),
    })
}

const DEALLOCATE: Option<ExpectedOperation> = Some(ExpectedOperation::Deallocate);

const fn step(
    title: &'static str,
    content: &'static str,
    task: &'static str,
    expected_operation: Option<ExpectedOperation>,
    config: StepConfig,
) -> Step {
    Step {
        title,
        content,
        task,
        expected_operation,
        config,
    }
}

/// The built-in tutorials: `intro`, `fragmentation`, `page_replacement` and
/// `optimization`.
pub fn builtin() -> Vec<Tutorial> {
    vec![intro(), fragmentation(), page_replacement(), optimization()]
}

fn intro() -> Tutorial {
    Tutorial {
        id: "intro",
        title: "Introduction to Memory Management",
        description: "Learn the basics of memory allocation and management",
        steps: vec![
            step(
                "Welcome to Memory Management",
                "This tutorial walks through how memory is allocated and managed in a computer system.",
                "Click \"Next\" to continue.",
                None,
                full(Technique::Paging, 512, 64, Algorithm::Fifo),
            ),
            step(
                "Memory Allocation",
                "Allocation assigns memory space to program data and instructions.",
                "Allocate 128 bytes of memory.",
                allocate(128),
                NO_CONFIG,
            ),
            step(
                "Memory Access",
                "Programs read and modify memory locations. Every access is resolved to a frame of physical memory.",
                "Access memory at address 64.",
                access(64),
                NO_CONFIG,
            ),
            step(
                "Memory Deallocation",
                "Memory that is no longer needed is released so that other processes can reuse it.",
                "Deallocate memory using the address shown.",
                DEALLOCATE,
                NO_CONFIG,
            ),
            step(
                "Introduction Complete",
                "You have completed the introduction to memory management.",
                "Click \"Finish Tutorial\" to return to the main interface.",
                None,
                NO_CONFIG,
            ),
        ],
    }
}

fn fragmentation() -> Tutorial {
    Tutorial {
        id: "fragmentation",
        title: "Memory Fragmentation",
        description: "Learn about internal and external memory fragmentation",
        steps: vec![
            step(
                "Understanding Fragmentation",
                "Fragmentation appears as memory is allocated and released over time, leaving unused gaps.",
                "Click \"Next\" to continue.",
                None,
                full(Technique::Segmentation, 1024, 128, Algorithm::Fifo),
            ),
            step(
                "External Fragmentation",
                "External fragmentation happens when free memory is split into many small non-contiguous blocks.",
                "Allocate 256 bytes of memory to see how blocks are assigned.",
                allocate(256),
                NO_CONFIG,
            ),
            step(
                "Creating Fragmentation",
                "Allocating and releasing memory in a pattern leaves holes behind.",
                "Allocate another 128 bytes of memory.",
                allocate(128),
                NO_CONFIG,
            ),
            step(
                "Deallocating Memory",
                "Releasing the first block creates a hole at the start of memory.",
                "Deallocate the first memory block using the address shown.",
                DEALLOCATE,
                NO_CONFIG,
            ),
            step(
                "Observing Fragmentation",
                "Memory now has gaps between allocated blocks: external fragmentation.",
                "Allocate 192 bytes and observe where the memory is placed.",
                allocate(192),
                NO_CONFIG,
            ),
            step(
                "Internal Fragmentation",
                "Internal fragmentation is space wasted inside an allocated block that is larger than needed.",
                "Allocate 60 bytes and observe that a whole frame is handed out.",
                allocate(60),
                NO_CONFIG,
            ),
            step(
                "Fragmentation Complete",
                "You have seen both external and internal fragmentation.",
                "Click \"Finish Tutorial\" to return to the main interface.",
                None,
                NO_CONFIG,
            ),
        ],
    }
}

fn page_replacement() -> Tutorial {
    Tutorial {
        id: "page_replacement",
        title: "Page Replacement Algorithms",
        description: "Compare different page replacement strategies",
        steps: vec![
            step(
                "Page Replacement",
                "When memory is full, a page replacement algorithm decides which pages make room for new ones.",
                "Click \"Next\" to learn about different algorithms.",
                None,
                full(Technique::Paging, 512, 64, Algorithm::Fifo),
            ),
            step(
                "First-In-First-Out (FIFO)",
                "FIFO replaces the oldest page in memory, no matter how often it is used.",
                "Fill memory by allocating 512 bytes.",
                allocate(512),
                algorithm_only(Algorithm::Fifo),
            ),
            step(
                "FIFO Page Fault",
                "Memory is full. Watch how FIFO handles one more allocation.",
                "Allocate 128 more bytes and observe which pages are replaced.",
                allocate(128),
                NO_CONFIG,
            ),
            step(
                "Least Recently Used (LRU)",
                "LRU replaces the page that has not been accessed for the longest time.",
                "Reset the simulation and start a new one with the LRU algorithm.",
                Some(ExpectedOperation::Reset),
                algorithm_only(Algorithm::Lru),
            ),
            step(
                "LRU Memory Access",
                "LRU keeps track of page accesses to pick its victims.",
                "Allocate 256 bytes of memory, then access the first page at address 0.",
                allocate(256),
                NO_CONFIG,
            ),
            step(
                "LRU Page Replacement",
                "Fill memory and observe which pages LRU chooses to replace.",
                "Allocate 384 more bytes and observe the replacement pattern.",
                allocate(384),
                NO_CONFIG,
            ),
            step(
                "Algorithm Comparison",
                "Each algorithm performs best under different access patterns.",
                "Click \"Finish Tutorial\" to return to the main interface.",
                None,
                NO_CONFIG,
            ),
        ],
    }
}

fn optimization() -> Tutorial {
    Tutorial {
        id: "optimization",
        title: "Memory Optimization Techniques",
        description: "Learn practical techniques to optimize memory usage",
        steps: vec![
            step(
                "Memory Optimization",
                "Optimization reduces memory usage while keeping performance.",
                "Click \"Next\" to continue.",
                None,
                full(Technique::Paging, 1024, 64, Algorithm::Lru),
            ),
            step(
                "Right-Sizing Allocations",
                "Allocating exactly what is needed reduces internal fragmentation.",
                "Allocate 60 bytes and notice the unused space within the page.",
                allocate(60),
                NO_CONFIG,
            ),
            step(
                "Memory Pooling",
                "A memory pool pre-allocates fixed-size blocks for frequent allocations.",
                "Allocate four 64-byte blocks to simulate a memory pool.",
                allocate(64),
                NO_CONFIG,
            ),
            step(
                "Locality of Reference",
                "Programs accessing nearby addresses perform better.",
                "Access memory addresses 0, 4, 8 and 12 in sequence.",
                access(0),
                NO_CONFIG,
            ),
            step(
                "Compaction",
                "Compaction moves allocated blocks together to remove external fragmentation.",
                "Allocate and deallocate memory to create fragmentation.",
                DEALLOCATE,
                NO_CONFIG,
            ),
            step(
                "Optimization Challenge",
                "Allocate memory efficiently to reach at least 75% utilization.",
                "Allocate memory in a pattern that reaches the target utilization.",
                Some(ExpectedOperation::Allocate { size: None }),
                NO_CONFIG,
            ),
            step(
                "Optimization Complete",
                "You have learned several memory optimization techniques.",
                "Click \"Finish Tutorial\" to return to the main interface.",
                None,
                NO_CONFIG,
            ),
        ],
    }
}
