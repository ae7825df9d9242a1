//! Configuration sweeps: one trace, many buffer configurations.
//!
//! A [`SweepPlan`] lists the configurations to compare. It runs either in
//! one streaming pass that feeds every simulator in turn, or with one
//! scoped thread per configuration over a trace held in memory. Simulators
//! share nothing, so both modes report identical rows.

use std::fmt;
use std::thread;

use parking_lot::Mutex;
use tracing::info;

use crate::buffer::{AccessCounters, BufferSimulator, StatsSnapshot};
use crate::common::config::{REFERENCE_DRAM_BLOCK_BITS, REFERENCE_NVM_BLOCK_BITS};
use crate::common::SimulatorConfig;
use crate::error::Result;
use crate::trace::{InstructionWindow, ReplaySummary, Replayer, TraceRecord};

/// Final numbers for one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRow {
    pub config: SimulatorConfig,
    pub snapshot: StatsSnapshot,
    pub counters: AccessCounters,
}

impl ReportRow {
    fn from_simulator(config: SimulatorConfig, sim: &BufferSimulator) -> Self {
        Self {
            config,
            snapshot: sim.basic_stats().snapshot(),
            counters: sim.counters(),
        }
    }
}

/// Tab-separated `block_bits epoch_count nvm_bytes dram_bytes`.
impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.config.block_bits, self.snapshot)
    }
}

/// Rows in plan order, plus what the replay consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome {
    pub rows: Vec<ReportRow>,
    pub summary: ReplaySummary,
}

/// The configurations to simulate against one trace.
///
/// # Example
/// ```
/// use epochsim::sweep::SweepPlan;
/// use epochsim::trace::{InstructionWindow, TraceRecord};
///
/// let plan = SweepPlan::reference(16);
/// assert_eq!(plan.configs().len(), 6);
///
/// let records: Vec<_> = (0..100).map(|i| TraceRecord::write(i * 4096, 1)).collect();
/// let outcome = plan.run_parallel(&records, InstructionWindow::unbounded()).unwrap();
/// assert_eq!(outcome.rows.len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SweepPlan {
    configs: Vec<SimulatorConfig>,
}

impl SweepPlan {
    /// Plan over explicit configurations.
    pub fn new(configs: Vec<SimulatorConfig>) -> Self {
        Self { configs }
    }

    /// Small blocks straight into NVM, large blocks staged through DRAM,
    /// all with `capacity` slots.
    pub fn reference(capacity: usize) -> Self {
        let nvm = REFERENCE_NVM_BLOCK_BITS
            .iter()
            .map(|&bits| SimulatorConfig::new(capacity, bits, false));
        let dram = REFERENCE_DRAM_BLOCK_BITS
            .iter()
            .map(|&bits| SimulatorConfig::new(capacity, bits, true));
        Self::new(nvm.chain(dram).collect())
    }

    /// Add one configuration.
    pub fn push(&mut self, config: SimulatorConfig) {
        self.configs.push(config);
    }

    /// Configurations in report order.
    pub fn configs(&self) -> &[SimulatorConfig] {
        &self.configs
    }

    /// Build a fresh simulator per configuration.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` for the first configuration that fails validation
    pub fn build(&self) -> Result<Vec<BufferSimulator>> {
        self.configs
            .iter()
            .map(|&config| BufferSimulator::new(config))
            .collect()
    }

    /// Stream `records` once, feeding every simulator in turn.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if a configuration is invalid
    /// - Any error yielded by `records`
    pub fn run_sequential<I>(&self, records: I, window: InstructionWindow) -> Result<SweepOutcome>
    where
        I: IntoIterator<Item = Result<TraceRecord>>,
    {
        let mut sims = self.build()?;
        let summary = Replayer::new(window).replay(records, &mut sims)?;
        Ok(self.outcome(&sims, summary))
    }

    /// Replay `records` on one thread per configuration.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if a configuration is invalid; nothing is
    ///   spawned in that case
    pub fn run_parallel(&self, records: &[TraceRecord], window: InstructionWindow) -> Result<SweepOutcome> {
        let sims = self.build()?;
        if sims.is_empty() {
            let summary = Replayer::new(window).replay_slice(records, &mut []);
            return Ok(self.outcome(&[], summary));
        }

        let results: Mutex<Vec<(usize, ReportRow, ReplaySummary)>> =
            Mutex::new(Vec::with_capacity(sims.len()));

        thread::scope(|scope| {
            for (i, (mut sim, &config)) in sims.into_iter().zip(&self.configs).enumerate() {
                let results = &results;
                scope.spawn(move || {
                    let summary = Replayer::new(window)
                        .replay_slice(records, std::slice::from_mut(&mut sim));
                    let row = ReportRow::from_simulator(config, &sim);
                    results.lock().push((i, row, summary));
                });
            }
        });

        let mut results = results.into_inner();
        results.sort_by_key(|(i, _, _)| *i);
        let summary = results[0].2;
        let rows: Vec<ReportRow> = results.into_iter().map(|(_, row, _)| row).collect();

        info!(
            target: "epochsim::sweep",
            configs = rows.len(),
            writes_in_window = summary.writes_in_window,
            "parallel sweep finished"
        );
        Ok(SweepOutcome { rows, summary })
    }

    fn outcome(&self, sims: &[BufferSimulator], summary: ReplaySummary) -> SweepOutcome {
        let rows: Vec<ReportRow> = self
            .configs
            .iter()
            .zip(sims)
            .map(|(&config, sim)| ReportRow::from_simulator(config, sim))
            .collect();
        info!(
            target: "epochsim::sweep",
            configs = rows.len(),
            writes_in_window = summary.writes_in_window,
            "sweep finished"
        );
        SweepOutcome { rows, summary }
    }
}
