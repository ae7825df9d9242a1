//! Replay a trace window into one or more buffer simulators.

use tracing::info;

use crate::buffer::BufferSimulator;
use crate::common::config::INSTRUCTIONS_PER_UNIT;
use crate::error::Result;
use crate::trace::TraceRecord;

/// The half-open instruction range `[begin, begin + len)` that is simulated.
///
/// A window whose end lies past `u64::MAX` has no upper bound.
///
/// # Example
/// ```
/// use epochsim::trace::InstructionWindow;
///
/// let window = InstructionWindow::new(100, 50);
/// assert!(!window.contains(99));
/// assert!(window.contains(100));
/// assert!(window.contains(149));
/// assert!(!window.contains(150));
/// assert_eq!(window.elapsed(120), 20);
///
/// assert!(InstructionWindow::unbounded().contains(u64::MAX));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionWindow {
    begin: u64,
    /// Exclusive end; `None` when unbounded.
    end: Option<u64>,
}

impl InstructionWindow {
    /// Window of `len` instructions starting at instruction `begin`.
    pub fn new(begin: u64, len: u64) -> Self {
        Self {
            begin,
            end: begin.checked_add(len),
        }
    }

    /// Window given in millions of instructions, as on the command line.
    pub fn from_millions(begin: u64, len: u64) -> Self {
        match (
            begin.checked_mul(INSTRUCTIONS_PER_UNIT),
            len.checked_mul(INSTRUCTIONS_PER_UNIT),
        ) {
            (Some(begin), Some(len)) => Self::new(begin, len),
            (Some(begin), None) => Self { begin, end: None },
            // Begins past u64::MAX: no count qualifies
            (None, _) => Self::new(u64::MAX, 0),
        }
    }

    /// The whole trace, every instruction count included.
    pub fn unbounded() -> Self {
        Self {
            begin: 0,
            end: None,
        }
    }

    /// First instruction inside the window.
    pub fn begin(&self) -> u64 {
        self.begin
    }

    /// Window length in instructions, `None` if unbounded.
    pub fn len(&self) -> Option<u64> {
        self.end.map(|end| end - self.begin)
    }

    /// True if the window holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.end == Some(self.begin)
    }

    /// True if cumulative instruction count `t` falls inside the window.
    #[inline]
    pub fn contains(&self, t: u64) -> bool {
        t >= self.begin && self.end.map_or(true, |end| t < end)
    }

    /// True once `t` has moved beyond the end of the window.
    #[inline]
    pub fn is_past(&self, t: u64) -> bool {
        self.end.is_some_and(|end| t >= end)
    }

    /// Logical time of `t` relative to the window start.
    #[inline]
    pub fn elapsed(&self, t: u64) -> u64 {
        t.saturating_sub(self.begin)
    }
}

/// Counts gathered while replaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    /// Records consumed, reads included.
    pub records: u64,

    /// Read records consumed.
    pub reads: u64,

    /// Write records consumed.
    pub writes: u64,

    /// Writes that fell inside the window and reached the simulators.
    pub writes_in_window: u64,

    /// Cumulative instruction count at the last consumed record.
    pub instructions: u64,
}

/// Feeds trace records through an [`InstructionWindow`] into simulators.
///
/// Reads only advance the instruction counter. Every write inside the
/// window is `put` into every simulator, in slice order, with the
/// instructions elapsed since the window start as its logical time.
/// Instruction counts only grow, so replay stops at the first record past
/// the window.
///
/// # Example
/// ```
/// use epochsim::trace::{InstructionWindow, Replayer, TraceRecord};
/// use epochsim::{BufferSimulator, SimulatorConfig};
///
/// let mut sims = vec![BufferSimulator::new(SimulatorConfig::new(4, 6, false)).unwrap()];
/// let records = [
///     TraceRecord::write(0, 5),  // t=5, before the window
///     TraceRecord::read(64, 5),  // t=10
///     TraceRecord::write(64, 1), // t=11, inside
/// ];
///
/// let summary = Replayer::new(InstructionWindow::new(10, 100))
///     .replay_slice(&records, &mut sims);
///
/// assert_eq!(summary.writes_in_window, 1);
/// assert_eq!(sims[0].last_time(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Replayer {
    window: InstructionWindow,
    summary: ReplaySummary,
}

impl Replayer {
    /// Create a replayer positioned at instruction 0.
    pub fn new(window: InstructionWindow) -> Self {
        Self {
            window,
            summary: ReplaySummary::default(),
        }
    }

    /// Counts so far.
    pub fn summary(&self) -> ReplaySummary {
        self.summary
    }

    /// Consume one record. Returns `false` once the window has been passed
    /// and no later record can matter.
    pub fn feed(&mut self, record: &TraceRecord, sims: &mut [BufferSimulator]) -> bool {
        let s = &mut self.summary;
        s.records += 1;
        s.instructions = s.instructions.saturating_add(record.ins_delta);
        let t = s.instructions;

        if !record.is_write() {
            s.reads += 1;
            return !self.window.is_past(t);
        }
        s.writes += 1;

        if self.window.contains(t) {
            s.writes_in_window += 1;
            let elapsed = self.window.elapsed(t);
            for sim in sims.iter_mut() {
                sim.put(record.address, elapsed);
            }
            true
        } else {
            !self.window.is_past(t)
        }
    }

    /// Replay a fallible record stream, such as a [`TraceReader`].
    ///
    /// # Errors
    /// Returns the first error the stream yields; simulators keep the state
    /// reached before it.
    ///
    /// [`TraceReader`]: crate::trace::TraceReader
    pub fn replay<I>(mut self, records: I, sims: &mut [BufferSimulator]) -> Result<ReplaySummary>
    where
        I: IntoIterator<Item = Result<TraceRecord>>,
    {
        for record in records {
            if !self.feed(&record?, sims) {
                break;
            }
        }
        self.finish(sims.len());
        Ok(self.summary)
    }

    /// Replay records already in memory.
    pub fn replay_slice(mut self, records: &[TraceRecord], sims: &mut [BufferSimulator]) -> ReplaySummary {
        for record in records {
            if !self.feed(record, sims) {
                break;
            }
        }
        self.finish(sims.len());
        self.summary
    }

    fn finish(&self, simulators: usize) {
        let s = &self.summary;
        info!(
            target: "epochsim::trace",
            records = s.records,
            reads = s.reads,
            writes = s.writes,
            writes_in_window = s.writes_in_window,
            instructions = s.instructions,
            simulators,
            "replay finished"
        );
    }
}
