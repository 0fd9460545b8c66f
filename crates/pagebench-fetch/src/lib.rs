//! Page fetchers and batch runners, one per fetch strategy.

use std::time::Duration;

use pagebench_common::config::{BenchConfig, DEFAULT_USER_AGENT};
use pagebench_common::{Result, StrategyKind, Window};

pub mod blocking;
pub mod extract;
pub mod native;
pub mod threaded;

pub use extract::{extract, extract_value};

/// Per-request settings shared by every fetch a runner makes.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub accept_invalid_certs: bool,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
    pub window: Window,
    /// Route through `HTTP_PROXY`/`HTTPS_PROXY` when they are set.
    pub use_env_proxy: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
            timeout: None,
            window: Window::default(),
            use_env_proxy: true,
        }
    }
}

impl FetchOptions {
    pub fn for_strategy(cfg: &BenchConfig, kind: StrategyKind) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            accept_invalid_certs: cfg.is_insecure(kind),
            timeout: cfg.request_timeout(),
            window: cfg.window(),
            use_env_proxy: cfg.use_env_proxy,
        }
    }
}

/// Fetches a value for every URL and returns them in input order.
///
/// A single failed fetch fails the whole batch.
pub trait BatchRunner: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self, urls: &[String]) -> Result<Vec<String>>;
}

pub fn select_runner(kind: StrategyKind, cfg: &BenchConfig) -> Box<dyn BatchRunner> {
    let opts = FetchOptions::for_strategy(cfg, kind);
    match kind {
        StrategyKind::Blocking => Box::new(blocking::BlockingRunner::new(opts)),
        StrategyKind::Threaded => {
            let pool = cfg.blocking_threads.unwrap_or_else(threaded::default_pool_size);
            Box::new(threaded::ThreadedRunner::new(opts).with_pool_size(pool))
        }
        StrategyKind::Native => Box::new(native::NativeRunner::new(opts)),
    }
}

/// Runners for `cfg.strategies`, in configured order.
pub fn runners_from_config(cfg: &BenchConfig) -> Vec<Box<dyn BatchRunner>> {
    cfg.strategies.iter().map(|kind| select_runner(*kind, cfg)).collect()
}

#[cfg(feature = "mock")]
pub mod mock {
    use super::*;
    use pagebench_common::BenchError;
    use std::collections::HashMap;

    /// Serves canned bodies instead of touching the network.
    #[derive(Default)]
    pub struct MockRunner {
        name: String,
        pages: HashMap<String, String>,
        delay: Duration,
        window: Window,
    }

    impl MockRunner {
        pub fn new(name: impl Into<String>) -> Self {
            Self { name: name.into(), ..Self::default() }
        }

        pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
            self.pages.insert(url.into(), body.into());
            self
        }

        /// Sleeps this long per batch so timings are non-zero.
        pub fn delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    impl BatchRunner for MockRunner {
        fn name(&self) -> &str { &self.name }

        fn run(&self, urls: &[String]) -> Result<Vec<String>> {
            std::thread::sleep(self.delay);
            urls.iter()
                .map(|url| {
                    let body = self
                        .pages
                        .get(url)
                        .ok_or_else(|| BenchError::Config(format!("no mock page for {url}")))?;
                    Ok(extract(body, self.window))
                })
                .collect()
        }
    }
}
