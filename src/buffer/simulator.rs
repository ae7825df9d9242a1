//! Buffer Simulator - the slot lifecycle state machine.
//!
//! The [`BufferSimulator`] provides:
//! - Hit detection through the tag index
//! - Admission of new blocks into free slots
//! - FIFO reclamation of checkpointed (clean) slots
//! - Epochs that checkpoint every dirty slot and discard hidden ones
//! - Throughput accounting through attached [`ThroughputStats`]

use tracing::{debug, trace};

use crate::buffer::{IndexedList, SlotState, SlotTable, TagIndex, ThroughputStats};
use crate::common::{SimulatorConfig, SlotId, Tag};
use crate::error::Result;

/// What a single [`BufferSimulator::put`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The block was resident; `prior` is the slot state before the write.
    Hit { prior: SlotState },

    /// The block was admitted into a slot.
    Miss {
        /// A clean slot was evicted to make room.
        reclaimed: bool,
        /// An epoch ran before admission.
        epoch: bool,
    },
}

impl Access {
    /// True for [`Access::Hit`].
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, Access::Hit { .. })
    }

    /// True if this access forced an epoch.
    #[inline]
    pub fn triggered_epoch(&self) -> bool {
        matches!(self, Access::Miss { epoch: true, .. })
    }
}

/// Per-list slot counts, plus the size of the tag index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Occupancy {
    pub free: usize,
    pub dirty: usize,
    pub clean: usize,
    pub hidden: usize,
    pub indexed: usize,
}

impl Occupancy {
    /// Slots accounted for across all four lists.
    pub fn total(&self) -> usize {
        self.free + self.dirty + self.clean + self.hidden
    }

    /// Slots holding a block.
    pub fn resident(&self) -> usize {
        self.dirty + self.clean + self.hidden
    }
}

/// Access counters kept by the simulator itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessCounters {
    /// Writes that found their block resident.
    pub hits: u64,

    /// Writes that had to admit their block.
    pub misses: u64,

    /// Clean slots evicted to make room.
    pub reclamations: u64,

    /// Epochs run.
    pub epochs: u64,
}

impl AccessCounters {
    /// Hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Simulates a fixed-capacity write buffer with epoch checkpointing.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────────────────┐
/// │                       BufferSimulator                         │
/// │  ┌──────────────┐  ┌────────────────────────────────────┐     │
/// │  │  tag_index   │  │       slots: SlotTable             │     │
/// │  │ Tag → SlotId │─▶│  [Slot0] [Slot1] [Slot2] ...       │     │
/// │  └──────────────┘  └────────────────────────────────────┘     │
/// │        ▲  prev/next links partition the table into:           │
/// │  ┌─────┴───┐  ┌─────────┐  ┌─────────┐  ┌──────────┐          │
/// │  │  free   │  │  dirty  │  │  clean  │  │  hidden  │          │
/// │  └─────────┘  └─────────┘  └─────────┘  └──────────┘          │
/// │  ┌─────────────────────────────┐                              │
/// │  │ stats: Vec<ThroughputStats> │  (every event, every stats)  │
/// │  └─────────────────────────────┘                              │
/// └───────────────────────────────────────────────────────────────┘
/// ```
///
/// # Lifecycle
/// ```text
///   FREE ──miss──▶ DIRTY ──epoch──▶ CLEAN ──hit──▶ HIDDEN
///    ▲              │ ▲               │              │
///    │              └─┘ hit           │ reclaim      │ epoch
///    └────────────────────────────────┴──────────────┘
/// ```
///
/// # Usage
/// ```
/// use epochsim::{BufferSimulator, SimulatorConfig};
///
/// let mut sim = BufferSimulator::new(SimulatorConfig::new(2, 6, false)).unwrap();
/// sim.put(0x000, 0);
/// sim.put(0x040, 1);
/// let access = sim.put(0x080, 2); // buffer full of dirty blocks
///
/// assert!(access.triggered_epoch());
/// assert_eq!(sim.basic_stats().epoch_count(), 1);
/// ```
#[derive(Debug)]
pub struct BufferSimulator {
    /// Fixed arena of slots allocated at construction.
    slots: SlotTable,

    /// Maps resident tags to slots.
    tag_index: TagIndex,

    free: IndexedList,
    dirty: IndexedList,
    clean: IndexedList,
    hidden: IndexedList,

    /// Every attached collector; index 0 is the one built from the config.
    stats: Vec<ThroughputStats>,

    counters: AccessCounters,

    block_bits: u32,

    /// Logical time of the most recent put.
    last_time: u64,

    /// Logical time of the most recent epoch.
    last_epoch_time: u64,
}

impl BufferSimulator {
    /// Create a simulator with every slot free.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if `config` fails validation
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;

        let mut slots = SlotTable::new(config.capacity);
        let mut free = IndexedList::new();
        for id in 0..config.capacity {
            free.push_back(slots.nodes_mut(), SlotId::new(id));
        }

        let sim = Self {
            slots,
            tag_index: TagIndex::with_capacity(config.capacity),
            free,
            dirty: IndexedList::new(),
            clean: IndexedList::new(),
            hidden: IndexedList::new(),
            stats: vec![ThroughputStats::new(
                config.capacity,
                config.block_size(),
                config.has_dram,
            )],
            counters: AccessCounters::default(),
            block_bits: config.block_bits,
            last_time: 0,
            last_epoch_time: 0,
        };
        sim.check_invariants();
        Ok(sim)
    }

    // ========================================================================
    // Public API: Writes
    // ========================================================================

    /// Apply one write access at `logical_time`.
    ///
    /// A resident block is touched in place. Otherwise the block is admitted
    /// into a free slot, reclaiming the oldest clean slot if none is free,
    /// and running an epoch first if every slot is dirty or hidden.
    pub fn put(&mut self, address: u64, logical_time: u64) -> Access {
        let tag = Tag::from_address(address, self.block_bits);
        self.last_time = logical_time;

        if let Some(slot) = self.tag_index.get(tag) {
            let prior = self.touch(slot);
            trace!(target: "epochsim::buffer", %tag, %slot, %prior, "hit");
            return Access::Hit { prior };
        }

        let mut epoch = false;
        if self.free.is_empty() && self.clean.is_empty() {
            self.new_epoch(logical_time);
            epoch = true;
            // Epochs only drop tags, so the block is still a miss
            assert!(
                !self.free.is_empty() || !self.clean.is_empty(),
                "epoch left no free or clean slot"
            );
        }

        let mut reclaimed = false;
        if self.free.is_empty() {
            self.reclaim();
            reclaimed = true;
        }

        let slot = self.admit(tag);
        trace!(target: "epochsim::buffer", %tag, %slot, reclaimed, epoch, "miss");

        Access::Miss { reclaimed, epoch }
    }

    // ========================================================================
    // Public API: Stats and info
    // ========================================================================

    /// Attach another collector that receives every subsequent event.
    ///
    /// Events carry block counts, not bytes, so a collector whose block size
    /// differs from this simulator's charges its own block size for blocks
    /// of this simulator's size. Matching them is the caller's job.
    pub fn register_stats(&mut self, stats: ThroughputStats) {
        self.stats.push(stats);
    }

    /// The collector built from the simulator's own configuration.
    pub fn basic_stats(&self) -> &ThroughputStats {
        &self.stats[0]
    }

    /// All attached collectors in registration order.
    pub fn stats(&self) -> &[ThroughputStats] {
        &self.stats
    }

    /// Hit/miss/reclaim/epoch counters.
    pub fn counters(&self) -> AccessCounters {
        self.counters
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Block size exponent.
    pub fn block_bits(&self) -> u32 {
        self.block_bits
    }

    /// Logical time passed to the most recent [`put`](Self::put).
    pub fn last_time(&self) -> u64 {
        self.last_time
    }

    /// Current list sizes.
    pub fn occupancy(&self) -> Occupancy {
        Occupancy {
            free: self.free.len(),
            dirty: self.dirty.len(),
            clean: self.clean.len(),
            hidden: self.hidden.len(),
            indexed: self.tag_index.len(),
        }
    }

    /// Slot holding the block that contains `address`, if resident.
    pub fn slot_of(&self, address: u64) -> Option<SlotId> {
        self.tag_index
            .get(Tag::from_address(address, self.block_bits))
    }

    /// State of the block that contains `address`, if resident.
    pub fn state_of(&self, address: u64) -> Option<SlotState> {
        self.slot_of(address).map(|slot| self.slots.state(slot))
    }

    /// Block held by `slot`, `None` if free.
    pub fn tag_of(&self, slot: SlotId) -> Option<Tag> {
        self.slots.tag(slot)
    }

    /// Slots in `state`, in list order (front first).
    pub fn slots_in(&self, state: SlotState) -> Vec<SlotId> {
        self.list(state).iter(self.slots.nodes()).collect()
    }

    /// Tags of the slots in `state`, in list order (front first).
    pub fn tags_in(&self, state: SlotState) -> Vec<Tag> {
        self.list(state)
            .iter(self.slots.nodes())
            .filter_map(|slot| self.slots.tag(slot))
            .collect()
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Check the O(1) invariants: the lists partition the slot table and the
    /// tag index covers exactly the resident slots.
    ///
    /// # Panics
    /// Panics on any mismatch. Called after every mutation.
    pub fn check_invariants(&self) {
        let occ = self.occupancy();
        assert_eq!(
            occ.total(),
            self.slots.len(),
            "mismatch in buffer slots: total={} free={} dirty={} clean={} hidden={}",
            self.slots.len(),
            occ.free,
            occ.dirty,
            occ.clean,
            occ.hidden
        );
        assert_eq!(
            occ.indexed,
            occ.resident(),
            "tag index holds {} tags for {} resident slots",
            occ.indexed,
            occ.resident()
        );
    }

    /// Walk every list and check each member's state and index entry.
    ///
    /// O(capacity); meant for tests.
    ///
    /// # Panics
    /// Panics on the first slot whose state, list or index entry disagree.
    pub fn audit(&self) {
        self.check_invariants();
        for state in [
            SlotState::Free,
            SlotState::Dirty,
            SlotState::Clean,
            SlotState::Hidden,
        ] {
            let list = self.list(state);
            let mut seen = 0;
            for slot in list.iter(self.slots.nodes()) {
                let entry = self.slots.entry(slot);
                assert_eq!(entry.state, state, "{} linked in the {} list", slot, state);
                match entry.tag {
                    Some(tag) => {
                        assert!(state.is_resident(), "free {} holds {}", slot, tag);
                        assert_eq!(self.tag_index.get(tag), Some(slot), "{} not indexed", tag);
                    }
                    None => assert!(!state.is_resident(), "{} {} has no tag", state, slot),
                }
                seen += 1;
            }
            assert_eq!(seen, list.len(), "{} list length drifted", state);
        }
    }

    // ========================================================================
    // Internal: State transitions
    // ========================================================================

    fn list(&self, state: SlotState) -> &IndexedList {
        match state {
            SlotState::Free => &self.free,
            SlotState::Dirty => &self.dirty,
            SlotState::Clean => &self.clean,
            SlotState::Hidden => &self.hidden,
        }
    }

    /// Write to a resident slot. Returns the state before the write.
    fn touch(&mut self, slot: SlotId) -> SlotState {
        let prior = self.slots.state(slot);
        match prior {
            SlotState::Dirty => {
                self.dirty.remove(self.slots.nodes_mut(), slot);
                self.dirty.push_back(self.slots.nodes_mut(), slot);
            }
            SlotState::Clean => {
                self.clean.remove(self.slots.nodes_mut(), slot);
                self.hidden.push_back(self.slots.nodes_mut(), slot);
                self.slots.set_state(slot, SlotState::Hidden);
            }
            SlotState::Hidden => {}
            SlotState::Free => panic!("hit on free {}", slot),
        }

        self.counters.hits += 1;
        for s in &mut self.stats {
            s.on_hit();
        }
        self.check_invariants();
        prior
    }

    /// Move the front free slot to dirty, holding `tag`.
    fn admit(&mut self, tag: Tag) -> SlotId {
        let slot = self
            .free
            .pop_front(self.slots.nodes_mut())
            .unwrap_or_else(|| panic!("no free slot to admit {}", tag));

        self.slots.occupy(slot, tag);
        self.dirty.push_back(self.slots.nodes_mut(), slot);
        self.tag_index.insert(tag, slot);

        self.counters.misses += 1;
        for s in &mut self.stats {
            s.on_copy(1);
        }
        self.check_invariants();
        slot
    }

    /// Evict the oldest clean slot back to the free list.
    fn reclaim(&mut self) {
        let slot = self
            .clean
            .pop_front(self.slots.nodes_mut())
            .unwrap_or_else(|| panic!("no clean slot to reclaim"));
        assert_eq!(self.slots.state(slot), SlotState::Clean);

        let tag = self.slots.release(slot);
        self.free.push_back(self.slots.nodes_mut(), slot);
        let indexed = self.tag_index.remove(tag);
        assert_eq!(indexed, slot, "{} indexed at {}, evicted from {}", tag, indexed, slot);

        // Evicting the old block and copying in the new one
        self.counters.reclamations += 1;
        for s in &mut self.stats {
            s.on_copy(2);
        }
        self.check_invariants();
    }

    /// Checkpoint every dirty slot and discard every hidden one.
    fn new_epoch(&mut self, logical_time: u64) {
        let to_checkpoint = self.slots.len() - self.clean.len();
        let discarded = self.hidden.len();

        let clean = &mut self.clean;
        self.dirty
            .for_each(self.slots.nodes_mut(), |dirty, nodes, slot| {
                assert_eq!(nodes[slot.0].value.state, SlotState::Dirty);
                dirty.remove(nodes, slot);
                nodes[slot.0].value.state = SlotState::Clean;
                clean.push_back(nodes, slot);
            });

        while let Some(slot) = self.hidden.pop_front(self.slots.nodes_mut()) {
            assert_eq!(self.slots.state(slot), SlotState::Hidden);
            let tag = self.slots.release(slot);
            self.free.push_back(self.slots.nodes_mut(), slot);
            self.tag_index.remove(tag);
        }

        self.counters.epochs += 1;
        for s in &mut self.stats {
            s.on_epoch(to_checkpoint as u64);
        }

        debug!(
            target: "epochsim::buffer",
            epoch = self.counters.epochs,
            block_bits = self.block_bits,
            to_checkpoint,
            discarded,
            logical_time,
            interval = logical_time.saturating_sub(self.last_epoch_time),
            "epoch"
        );
        self.last_epoch_time = logical_time;

        assert!(self.dirty.is_empty(), "dirty slots survived an epoch");
        self.check_invariants();
    }
}
