use std::time::Duration;

use pagebench_core::Benchmark;
use pagebench_fetch::mock::MockRunner;
use pagebench_fetch::BatchRunner;

const URLS: [&str; 3] = ["mock://x", "mock://y", "mock://z"];

fn mock(name: &str) -> Box<dyn BatchRunner> {
    Box::new(
        MockRunner::new(name)
            .page(URLS[0], "x".repeat(300))
            .page(URLS[1], "y".repeat(300))
            .page(URLS[2], "z".repeat(300))
            .delay(Duration::from_millis(15)),
    )
}

fn urls() -> Vec<String> {
    URLS.iter().map(|u| u.to_string()).collect()
}

#[test]
fn mock_runner_returns_values_in_order() {
    let values = mock("m").run(&urls()).unwrap();
    assert_eq!(values, vec!["x".repeat(50), "y".repeat(50), "z".repeat(50)]);
}

#[test]
fn prints_fifteen_timings_then_three_totals() {
    let bench = Benchmark::new(vec![mock("threaded"), mock("blocking"), mock("native")], urls());
    let mut out = Vec::new();
    let tally = bench.run(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 15 + 1 + 3);
    let names = ["threaded", "blocking", "native"];
    for (i, line) in lines[..15].iter().enumerate() {
        let round = i / 3 + 1;
        let name = names[i % 3];
        let prefix = format!("{round} {name} = ");
        assert!(line.starts_with(&prefix), "{line:?}");
        let secs = &line[prefix.len()..];
        assert_eq!(secs.split('.').nth(1).map(str::len), Some(2), "{line:?}");
        assert!(secs.parse::<f64>().is_ok());
    }
    assert_eq!(lines[15], "");
    for (line, name) in lines[16..].iter().zip(names) {
        let (printed_name, total) = line.split_once(' ').unwrap();
        assert_eq!(printed_name, name);
        let total: f64 = total.trim().parse().unwrap();
        let exact = tally.total(name).unwrap().as_secs_f64();
        assert!((total - exact).abs() <= 0.005 + 1e-9, "{total} vs {exact}");
    }
}

#[test]
fn totals_are_sums_of_samples() {
    let bench = Benchmark::new(vec![mock("a"), mock("b")], urls()).rounds(3);
    let tally = bench.run(&mut std::io::sink()).unwrap();

    assert_eq!(tally.len(), 2);
    for entry in tally.iter() {
        assert_eq!(entry.samples.len(), 3);
        let sum: Duration = entry.samples.iter().sum();
        assert_eq!(tally.total(&entry.name), Some(sum));
        assert!(sum >= Duration::from_millis(45));
    }
    let summary = &tally.summaries()[0];
    assert_eq!(summary.rounds, 3);
    assert!(summary.min_secs <= summary.mean_secs && summary.mean_secs <= summary.max_secs);
}

#[test]
fn failing_batch_aborts_the_run() {
    let broken: Box<dyn BatchRunner> = Box::new(MockRunner::new("broken").page(URLS[0], "x".repeat(300)));
    let bench = Benchmark::new(vec![mock("ok"), broken], urls());
    let mut out = Vec::new();
    assert!(bench.run(&mut out).is_err());

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().collect::<Vec<_>>().len(), 1);
    assert!(text.starts_with("1 ok = "));
}

#[test]
fn zero_rounds_prints_only_separator() {
    let bench = Benchmark::new(vec![mock("a")], urls()).rounds(0);
    let mut out = Vec::new();
    let tally = bench.run(&mut out).unwrap();
    assert!(tally.is_empty());
    assert_eq!(out, b"\n");
}

#[test]
fn default_round_count_comes_from_config() {
    let bench = Benchmark::new(vec![mock("a")], urls());
    let tally = bench.run(&mut std::io::sink()).unwrap();
    assert_eq!(tally.samples("a").unwrap().len(), pagebench_common::config::DEFAULT_ROUNDS);
    assert_eq!(pagebench_common::config::BenchConfig::default().rounds, pagebench_common::config::DEFAULT_ROUNDS);
}
