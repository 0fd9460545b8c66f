//! Async client on a single cooperative scheduler thread.

use std::sync::Arc;

use pagebench_common::{BenchError, Result, StrategyKind};
use tokio::runtime::Builder;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{extract, BatchRunner, FetchOptions};

/// Opens a client for this one request and drops it on return.
///
/// Sends the same browser `User-Agent` as the blocking fetcher so the
/// strategies make identical requests. The body must be valid UTF-8.
pub async fn get_page(url: &str, opts: &FetchOptions) -> Result<String> {
    let mut builder = reqwest::Client::builder()
        .user_agent(opts.user_agent.as_str())
        .danger_accept_invalid_certs(opts.accept_invalid_certs);
    if let Some(timeout) = opts.timeout {
        builder = builder.timeout(timeout);
    }
    if !opts.use_env_proxy {
        builder = builder.no_proxy();
    }
    let session = builder.build().map_err(|e| BenchError::http(url, e))?;
    let response = session.get(url).send().await.map_err(|e| BenchError::http(url, e))?;
    let status = response.status();
    let bytes = response.bytes().await.map_err(|e| BenchError::http(url, e))?;
    debug!(target: "fetch", url, %status, bytes = bytes.len(), "native fetch done");
    String::from_utf8(bytes.to_vec()).map_err(|source| BenchError::Decode { url: url.to_string(), source })
}

pub async fn get_one_value(url: &str, opts: &FetchOptions) -> Result<String> {
    let page = get_page(url, opts).await?;
    Ok(extract(&page, opts.window))
}

/// Spawns every fetch before awaiting any, then collects in input order.
pub async fn get_values(urls: &[String], opts: Arc<FetchOptions>) -> Result<Vec<String>> {
    let handles: Vec<JoinHandle<Result<String>>> = urls
        .iter()
        .cloned()
        .map(|url| {
            let opts = opts.clone();
            tokio::spawn(async move {
                let value = get_one_value(&url, &opts).await?;
                pagebench_obs::record_fetch(StrategyKind::Native.name());
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

pub struct NativeRunner {
    opts: Arc<FetchOptions>,
}

impl NativeRunner {
    pub fn new(opts: FetchOptions) -> Self { Self { opts: Arc::new(opts) } }
}

impl BatchRunner for NativeRunner {
    fn name(&self) -> &str { StrategyKind::Native.name() }

    fn run(&self, urls: &[String]) -> Result<Vec<String>> {
        let rt = Builder::new_current_thread().enable_all().build()?;
        rt.block_on(get_values(urls, self.opts.clone()))
    }
}
