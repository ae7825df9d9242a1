//! Property tests for the buffer simulator's invariants.

use epochsim::buffer::SlotState;
use epochsim::{Access, BufferSimulator, SimulatorConfig};
use proptest::prelude::*;

/// Blocks drawn from a small universe so hits, reclaims and epochs all occur.
fn accesses() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..48, 1..400)
}

fn config() -> impl Strategy<Value = SimulatorConfig> {
    (1usize..24, 0u32..14, any::<bool>())
        .prop_map(|(capacity, bits, dram)| SimulatorConfig::new(capacity, bits, dram))
}

proptest! {
    #[test]
    fn lists_partition_slots(config in config(), blocks in accesses()) {
        let mut sim = BufferSimulator::new(config).unwrap();
        for (t, block) in blocks.iter().enumerate() {
            sim.put(block << config.block_bits, t as u64);

            let occ = sim.occupancy();
            prop_assert_eq!(occ.total(), config.capacity);
            prop_assert_eq!(occ.indexed, occ.resident());
        }
        sim.audit();
    }

    #[test]
    fn epoch_only_when_no_free_or_clean(config in config(), blocks in accesses()) {
        let mut sim = BufferSimulator::new(config).unwrap();
        for (t, block) in blocks.iter().enumerate() {
            let address = block << config.block_bits;
            let before = sim.occupancy();
            let resident = sim.state_of(address).is_some();
            let epochs = sim.counters().epochs;

            let access = sim.put(address, t as u64);

            let must_epoch = !resident && before.free == 0 && before.clean == 0;
            prop_assert_eq!(access.triggered_epoch(), must_epoch);
            prop_assert_eq!(sim.counters().epochs, epochs + must_epoch as u64);
            if must_epoch {
                // The admitted block is the only dirty one
                prop_assert_eq!(sim.occupancy().dirty, 1);
            }
        }
    }

    #[test]
    fn clean_hit_stays_indexed_until_epoch(config in config(), blocks in accesses()) {
        let mut sim = BufferSimulator::new(config).unwrap();
        for (t, block) in blocks.iter().enumerate() {
            let address = block << config.block_bits;
            let access = sim.put(address, t as u64);

            if access == (Access::Hit { prior: SlotState::Clean }) {
                prop_assert_eq!(sim.state_of(address), Some(SlotState::Hidden));
            }
            if let Access::Hit { prior } = access {
                prop_assert_ne!(prior, SlotState::Free);
            }
        }
    }

    #[test]
    fn replay_is_deterministic(config in config(), blocks in accesses()) {
        let run = |blocks: &[u64]| {
            let mut sim = BufferSimulator::new(config).unwrap();
            for (t, block) in blocks.iter().enumerate() {
                sim.put(block << config.block_bits, t as u64);
            }
            (sim.basic_stats().snapshot(), sim.counters(), sim.tags_in(SlotState::Dirty))
        };

        prop_assert_eq!(run(&blocks), run(&blocks));
    }

    #[test]
    fn every_put_is_a_hit_or_a_copy(config in config(), blocks in accesses()) {
        let mut sim = BufferSimulator::new(config).unwrap();
        for (t, block) in blocks.iter().enumerate() {
            sim.put(block << config.block_bits, t as u64);
        }

        let c = sim.counters();
        prop_assert_eq!(c.hits + c.misses, blocks.len() as u64);
        prop_assert!(c.reclamations <= c.misses);
        prop_assert_eq!(sim.basic_stats().epoch_count(), c.epochs);
    }
}
