//! Serial fetching on the calling thread.

use pagebench_common::{BenchError, Result, StrategyKind};
use tracing::debug;

use crate::{extract, BatchRunner, FetchOptions};

/// Blocks the current thread for the whole round trip.
///
/// The body is decoded with the charset from the response headers, falling
/// back to lossy UTF-8.
pub fn get_page(url: &str, opts: &FetchOptions) -> Result<String> {
    let mut builder = reqwest::blocking::Client::builder()
        .user_agent(opts.user_agent.as_str())
        .danger_accept_invalid_certs(opts.accept_invalid_certs)
        .timeout(opts.timeout);
    if !opts.use_env_proxy {
        builder = builder.no_proxy();
    }
    let client = builder.build().map_err(|e| BenchError::http(url, e))?;
    let response = client.get(url).send().map_err(|e| BenchError::http(url, e))?;
    let status = response.status();
    let page = response.text().map_err(|e| BenchError::http(url, e))?;
    debug!(target: "fetch", url, %status, bytes = page.len(), "blocking fetch done");
    Ok(page)
}

pub fn get_one_value(url: &str, opts: &FetchOptions) -> Result<String> {
    let page = get_page(url, opts)?;
    Ok(extract(&page, opts.window))
}

pub struct BlockingRunner {
    opts: FetchOptions,
}

impl BlockingRunner {
    pub fn new(opts: FetchOptions) -> Self { Self { opts } }
}

impl BatchRunner for BlockingRunner {
    fn name(&self) -> &str { StrategyKind::Blocking.name() }

    fn run(&self, urls: &[String]) -> Result<Vec<String>> {
        let mut values = Vec::with_capacity(urls.len());
        for url in urls {
            values.push(get_one_value(url, &self.opts)?);
            pagebench_obs::record_fetch(self.name());
        }
        Ok(values)
    }
}
