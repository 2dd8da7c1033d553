//! HTTP client construction

use std::time::Duration;

use reqwest::{Client, Proxy};

use crate::error::EngineError;

/// SOCKS5 endpoint used when proxying (Tor's default)
///
/// The `socks5h` scheme resolves hostnames through the proxy, so DNS lookups
/// never leak to the local resolver.
pub const SOCKS5_ENDPOINT: &str = "socks5h://127.0.0.1:9050";

const DIRECT_TIMEOUT: Duration = Duration::from_secs(20);
const PROXY_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared HTTP client for a run
///
/// Direct clients get a 20 second per-request timeout; proxied clients dial
/// through [`SOCKS5_ENDPOINT`] with a 30 second timeout. The returned client
/// is safe for concurrent use by all workers of a batch.
pub fn build_client(use_proxy: bool) -> Result<Client, EngineError> {
    if !use_proxy {
        return Ok(Client::builder().timeout(DIRECT_TIMEOUT).build()?);
    }

    let proxy =
        Proxy::all(SOCKS5_ENDPOINT).map_err(|e| EngineError::ProxyUnavailable(e.to_string()))?;

    Client::builder()
        .proxy(proxy)
        .timeout(PROXY_TIMEOUT)
        .build()
        .map_err(|e| EngineError::ProxyUnavailable(e.to_string()))
}
