//! Times repeated batches of one strategy against a single page.
//!
//! `N` copies of `URL` are fetched per batch, `STRATEGY` picks the runner.

use std::time::Instant;

use pagebench_common::config::BenchConfig;
use pagebench_common::StrategyKind;
use pagebench_fetch::select_runner;

fn main() -> anyhow::Result<()> {
    let n: usize = std::env::var("N").ok().and_then(|v| v.parse().ok()).unwrap_or(16);
    let url = std::env::var("URL").unwrap_or_else(|_| "http://127.0.0.1:8080/".into());
    let strategy: StrategyKind = std::env::var("STRATEGY").unwrap_or_else(|_| "native".into()).parse()?;

    let cfg = BenchConfig::default();
    let runner = select_runner(strategy, &cfg);
    let urls = vec![url; n];
    let start = Instant::now();
    let values = runner.run(&urls)?;
    println!("{} fetched {} pages in {:.2}s", runner.name(), values.len(), start.elapsed().as_secs_f32());
    Ok(())
}
