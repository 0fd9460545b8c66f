use std::io::Write;
use std::time::Instant;

use pagebench_common::config::{BenchConfig, DEFAULT_ROUNDS};
use pagebench_common::Result;
use pagebench_fetch::{runners_from_config, BatchRunner};
use tracing::{info, info_span};

use crate::report;
use crate::tally::Tally;

/// Runs every strategy once per round over the same URLs and times each batch.
pub struct Benchmark {
    runners: Vec<Box<dyn BatchRunner>>,
    urls: Vec<String>,
    rounds: usize,
}

impl Benchmark {
    pub fn new(runners: Vec<Box<dyn BatchRunner>>, urls: Vec<String>) -> Self {
        Self { runners, urls, rounds: DEFAULT_ROUNDS }
    }

    pub fn from_config(cfg: &BenchConfig) -> Self {
        Self::new(runners_from_config(cfg), cfg.urls.clone()).rounds(cfg.rounds)
    }

    pub fn rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Prints one timing line per batch, then the per-strategy totals.
    ///
    /// The first failing batch aborts the whole run.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<Tally> {
        let mut tally = Tally::default();
        for round in 1..=self.rounds {
            let span = info_span!("round", round);
            let _enter = span.enter();
            for runner in &self.runners {
                let start = Instant::now();
                let result = runner.run(&self.urls);
                let elapsed = start.elapsed();
                pagebench_obs::record_batch(runner.name(), elapsed, result.is_ok());
                let values = result?;
                info!(
                    target: "driver",
                    strategy = runner.name(),
                    values = values.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "batch done"
                );
                tally.record(runner.name(), elapsed);
                report::write_round(out, round, runner.name(), elapsed)?;
            }
        }
        report::write_totals(out, &tally)?;
        Ok(tally)
    }
}
