use std::io::{self, Write};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pagebench_common::config::BenchConfig;
use pagebench_common::StrategyKind;
use pagebench_core::report::write_json;
use pagebench_core::Benchmark;
use pagebench_fetch::select_runner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pagebench", version, about = "Times page fetches under blocking, threaded and native async strategies")]
struct Cli {
    /// Defaults to `run`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every strategy once per round and print timings
    Run(RunArgs),
    /// Run one batch with one strategy and print the extracted values
    Fetch(FetchArgs),
    /// List the configured URLs
    Urls,
    Version,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    #[arg(short, long)]
    rounds: Option<usize>,
    /// Page to fetch; repeat to replace the configured list
    #[arg(short = 'u', long = "url")]
    urls: Vec<String>,
    /// threaded, blocking or native; repeat to pick several, in order
    #[arg(short = 's', long = "strategy")]
    strategies: Vec<StrategyKind>,
    /// Also print one JSON summary line per strategy
    #[arg(long)]
    json: bool,
    /// Write Prometheus metrics to stderr when done
    #[arg(long)]
    metrics: bool,
}

#[derive(Args, Debug)]
struct FetchArgs {
    #[arg(short, long)]
    strategy: StrategyKind,
    #[arg(short = 'u', long = "url")]
    urls: Vec<String>,
}

impl RunArgs {
    fn apply(&self, mut cfg: BenchConfig) -> BenchConfig {
        if let Some(rounds) = self.rounds { cfg.rounds = rounds; }
        if !self.urls.is_empty() { cfg.urls = self.urls.clone(); }
        if !self.strategies.is_empty() { cfg.strategies = self.strategies.clone(); }
        cfg
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    pagebench_obs::init();

    let cli = Cli::parse();
    let cfg = BenchConfig::load().context("loading configuration")?;
    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => run(cfg, args),
        Commands::Fetch(args) => fetch(cfg, args),
        Commands::Urls => {
            for url in &cfg.urls {
                println!("{url}");
            }
            Ok(())
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run(cfg: BenchConfig, args: RunArgs) -> anyhow::Result<()> {
    let cfg = args.apply(cfg);
    tracing::info!(target: "cli", urls = cfg.urls.len(), rounds = cfg.rounds, "starting benchmark");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let tally = Benchmark::from_config(&cfg).run(&mut out).context("benchmark aborted")?;
    if args.json {
        write_json(&mut out, &tally)?;
    }
    out.flush()?;

    if args.metrics {
        for entry in tally.iter() {
            tracing::info!(target: "cli", strategy = %entry.name, fetches = pagebench_obs::fetch_count(&entry.name), "fetch count");
        }
        let text = pagebench_obs::render().map_err(|e| anyhow::anyhow!("rendering metrics: {e}"))?;
        eprint!("{text}");
    }
    Ok(())
}

fn fetch(cfg: BenchConfig, args: FetchArgs) -> anyhow::Result<()> {
    let urls = if args.urls.is_empty() { cfg.urls.clone() } else { args.urls };
    let runner = select_runner(args.strategy, &cfg);
    let values = runner
        .run(&urls)
        .with_context(|| format!("{} batch failed", runner.name()))?;
    for (url, value) in urls.iter().zip(&values) {
        println!("{url} {value:?}");
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );

    // stdout carries the report, so logs go to stderr.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
