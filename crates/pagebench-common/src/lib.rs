use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type Result<T> = core::result::Result<T, BenchError>;

#[derive(thiserror::Error, Debug)]
pub enum BenchError {
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("body of {url} is not valid UTF-8")]
    Decode {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("fetch task did not complete")]
    Task(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("invalid config file")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown strategy `{0}` (expected threaded, blocking or native)")]
    UnknownStrategy(String),
}

impl BenchError {
    pub fn http(url: &str, source: reqwest::Error) -> Self {
        Self::Http { url: url.to_string(), source }
    }
}

/// One of the three ways a batch of pages can be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Blocking requests handed to a worker pool and awaited cooperatively.
    Threaded,
    /// One blocking request after another on the calling thread.
    Blocking,
    /// Async client with cooperative socket I/O, no worker threads.
    Native,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [StrategyKind::Threaded, StrategyKind::Blocking, StrategyKind::Native];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Threaded => "threaded",
            StrategyKind::Blocking => "blocking",
            StrategyKind::Native => "native",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BenchError::UnknownStrategy(s.to_string()))
    }
}

/// Character range `[start, end)` taken out of every page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Default for Window {
    fn default() -> Self {
        Self { start: 100, end: 150 }
    }
}

pub mod config {
    use super::{BenchError, Result, StrategyKind, Window};
    use serde::Deserialize;
    use std::env;
    use std::time::Duration;

    pub const DEFAULT_USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 6.1; Win64; x64; rv:32.0) Gecko/20100101 Firefox/32.0";

    pub const DEFAULT_ROUNDS: usize = 5;

    pub const DEFAULT_URLS: [&str; 6] = [
        "https://www.google.com/search?q=red",
        "https://www.reddit.com",
        "https://www.google.com/search?q=green",
        "https://www.youtube.com",
        "https://www.twitter.com",
        "https://www.facebook.com",
    ];

    #[derive(Debug, Clone, Deserialize)]
    #[serde(default)]
    pub struct BenchConfig {
        pub urls: Vec<String>,
        pub rounds: usize,
        pub user_agent: String,
        pub window_start: usize,
        pub window_end: usize,
        pub strategies: Vec<StrategyKind>,
        /// Strategies that skip TLS certificate verification.
        pub insecure_strategies: Vec<StrategyKind>,
        pub request_timeout_ms: Option<u64>,
        pub blocking_threads: Option<usize>,
        /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
        pub use_env_proxy: bool,
    }

    impl Default for BenchConfig {
        fn default() -> Self {
            Self {
                urls: DEFAULT_URLS.iter().map(|u| u.to_string()).collect(),
                rounds: DEFAULT_ROUNDS,
                user_agent: DEFAULT_USER_AGENT.to_string(),
                window_start: 100,
                window_end: 150,
                strategies: StrategyKind::ALL.to_vec(),
                insecure_strategies: vec![StrategyKind::Native],
                request_timeout_ms: None,
                blocking_threads: None,
                use_env_proxy: true,
            }
        }
    }

    impl BenchConfig {
        pub fn load() -> Result<Self> {
            Self::load_from(|key| env::var(key).ok())
        }

        /// Resolves the config through `lookup` instead of the process environment.
        pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
            if let Some(path) = lookup("PAGEBENCH_CONFIG") {
                let text = std::fs::read_to_string(path)?;
                return Self::from_yaml(&text);
            }
            let mut cfg = Self::default();
            if let Some(urls) = lookup("PAGEBENCH_URLS") {
                cfg.urls = urls.split(',').map(str::trim).filter(|u| !u.is_empty()).map(String::from).collect();
            }
            if let Some(v) = lookup("PAGEBENCH_ROUNDS") { cfg.rounds = parse_var("PAGEBENCH_ROUNDS", &v)?; }
            if let Some(v) = lookup("PAGEBENCH_USER_AGENT") { cfg.user_agent = v; }
            if let Some(v) = lookup("PAGEBENCH_TIMEOUT_MS") { cfg.request_timeout_ms = Some(parse_var("PAGEBENCH_TIMEOUT_MS", &v)?); }
            if let Some(v) = lookup("PAGEBENCH_BLOCKING_THREADS") { cfg.blocking_threads = Some(parse_var("PAGEBENCH_BLOCKING_THREADS", &v)?); }
            cfg.validate()?;
            Ok(cfg)
        }

        pub fn from_yaml(text: &str) -> Result<Self> {
            let cfg = serde_yaml::from_str::<BenchConfig>(text)?;
            cfg.validate()?;
            Ok(cfg)
        }

        pub fn validate(&self) -> Result<()> {
            if self.blocking_threads == Some(0) {
                return Err(BenchError::Config("blocking_threads must be at least 1".into()));
            }
            Ok(())
        }

        pub fn window(&self) -> Window {
            Window { start: self.window_start, end: self.window_end }
        }

        pub fn request_timeout(&self) -> Option<Duration> {
            self.request_timeout_ms.map(Duration::from_millis)
        }

        pub fn is_insecure(&self, kind: StrategyKind) -> bool {
            self.insecure_strategies.contains(&kind)
        }
    }

    fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
        value
            .trim()
            .parse()
            .map_err(|_| BenchError::Config(format!("{key}={value:?} is not a valid number")))
    }
}
