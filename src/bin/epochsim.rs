//! `epochsim` command line driver.
//!
//! Replays the writes of a text trace inside an instruction window against a
//! set of buffer configurations and prints one tab-separated row per
//! configuration: `block_bits epoch_count nvm_bytes dram_bytes`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use epochsim::trace::{InstructionWindow, TraceReader};
use epochsim::{SimulatorConfig, SweepPlan};

/// Estimate NVM/DRAM write traffic of epoch-checkpointed buffers
#[derive(Debug, Parser)]
#[command(name = "epochsim", version)]
struct Args {
    /// Text trace, one `is_read address ins_delta` record per line
    trace: PathBuf,

    /// Number of buffer slots
    buf_len: usize,

    /// First simulated instruction, in millions
    ins_begin: u64,

    /// Number of simulated instructions, in millions
    ins_num: u64,

    /// Block-size exponents simulated without a DRAM stage
    #[arg(long, value_delimiter = ',')]
    nvm_bits: Vec<u32>,

    /// Block-size exponents simulated with a DRAM stage
    #[arg(long, value_delimiter = ',')]
    dram_bits: Vec<u32>,

    /// Load the trace into memory and run each configuration on its own thread
    #[arg(long)]
    parallel: bool,
}

impl Args {
    fn plan(&self) -> SweepPlan {
        if self.nvm_bits.is_empty() && self.dram_bits.is_empty() {
            return SweepPlan::reference(self.buf_len);
        }
        let mut plan = SweepPlan::default();
        for &bits in &self.nvm_bits {
            plan.push(SimulatorConfig::new(self.buf_len, bits, false));
        }
        for &bits in &self.dram_bits {
            plan.push(SimulatorConfig::new(self.buf_len, bits, true));
        }
        plan
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(?args, "starting");

    let plan = args.plan();
    let window = InstructionWindow::from_millions(args.ins_begin, args.ins_num);
    let mut reader = TraceReader::open(&args.trace)
        .with_context(|| format!("Failed to open {}", args.trace.display()))?;

    let outcome = if args.parallel {
        let records = reader
            .by_ref()
            .collect::<epochsim::Result<Vec<_>>>()
            .context("Unable to parse trace")?;
        plan.run_parallel(&records, window)
            .context("Unable to run simulators")?
    } else {
        plan.run_sequential(reader.by_ref(), window)
            .context("Unable to run simulators")?
    };

    info!(
        records = reader.records(),
        checksum = %format!("{:08x}", reader.checksum()),
        writes_in_window = outcome.summary.writes_in_window,
        "trace consumed"
    );

    for row in &outcome.rows {
        println!("{}", row);
    }

    Ok(())
}
