//! Time-ordered 64-bit identifiers.
//!
//! Layout from the most significant bit: one unused bit, 41 bits of
//! milliseconds since [`EPOCH`], 10 bits of node ID, 12 bits of sequence.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// 2023-01-01T00:00:00Z.
pub const EPOCH: Duration = Duration::from_millis(1_672_531_200_000);

const NODE_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const TIMESTAMP_MASK: u64 = (1 << 41) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

pub const MAX_NODE: u16 = (1 << NODE_BITS) - 1;

#[derive(Debug)]
pub struct Snowflake {
    node: u64,
    /// Timestamp and sequence of the last issued ID, packed as `millis << 12 | sequence`.
    last: AtomicU64,
}

impl Snowflake {
    /// Fails if the node ID does not fit in 10 bits.
    pub fn new(node: u16) -> Option<Self> {
        (node <= MAX_NODE).then(|| Self { node: node.into(), last: AtomicU64::new(0) })
    }

    fn elapsed_millis() -> u64 {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        let millis = now.saturating_sub(EPOCH).as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX)
    }

    /// Issues a fresh ID. IDs from the same generator strictly increase.
    pub fn generate(&self) -> u64 {
        let now = Self::elapsed_millis() << SEQUENCE_BITS;
        let mut current = self.last.load(Ordering::Relaxed);
        let next = loop {
            // Exhausted sequences spill into the next millisecond.
            let next = if now > current { now } else { current + 1 };
            match self.last.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed) {
                Ok(_) => break next,
                Err(actual) => current = actual,
            }
        };

        let millis = (next >> SEQUENCE_BITS) & TIMESTAMP_MASK;
        let sequence = next & SEQUENCE_MASK;
        millis << (NODE_BITS + SEQUENCE_BITS) | self.node << SEQUENCE_BITS | sequence
    }

    /// Decimal rendering of [`Snowflake::generate`], the form IDs are stored in.
    pub fn next_id(&self) -> String {
        self.generate().to_string()
    }
}
