//! Blocking fetches delegated to a worker pool and awaited from a single
//! cooperative scheduler thread.

use std::sync::Arc;

use pagebench_common::{Result, StrategyKind};
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

use crate::{blocking, BatchRunner, FetchOptions};

/// `min(32, cpus + 4)`, the usual size of a default I/O worker pool.
pub fn default_pool_size() -> usize {
    let cpus = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    (cpus + 4).min(32)
}

pub struct ThreadedRunner {
    opts: Arc<FetchOptions>,
    pool_size: usize,
}

impl ThreadedRunner {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts: Arc::new(opts), pool_size: default_pool_size() }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    fn runtime(&self) -> Result<Runtime> {
        let rt = Builder::new_current_thread()
            .enable_all()
            .max_blocking_threads(self.pool_size)
            .thread_name("pagebench-worker")
            .build()?;
        Ok(rt)
    }
}

/// Hands every fetch to the blocking pool before awaiting any of them.
pub async fn get_values(urls: &[String], opts: Arc<FetchOptions>) -> Result<Vec<String>> {
    let handles: Vec<JoinHandle<Result<String>>> = urls
        .iter()
        .cloned()
        .map(|url| {
            let opts = opts.clone();
            tokio::task::spawn_blocking(move || {
                let value = blocking::get_one_value(&url, &opts)?;
                pagebench_obs::record_fetch(StrategyKind::Threaded.name());
                Ok(value)
            })
        })
        .collect();
    let mut values = Vec::with_capacity(handles.len());
    for handle in handles {
        values.push(handle.await??);
    }
    Ok(values)
}

impl BatchRunner for ThreadedRunner {
    fn name(&self) -> &str { StrategyKind::Threaded.name() }

    fn run(&self, urls: &[String]) -> Result<Vec<String>> {
        self.runtime()?.block_on(get_values(urls, self.opts.clone()))
    }
}
