//! Single-request execution

use std::collections::HashMap;

use reqwest::{Client, Method};

/// Upper bound on the retained response body
pub const MAX_SNIPPET: usize = 512;

/// Compact record of one completed HTTP exchange
#[derive(Debug, Clone)]
pub struct SnippetResponse {
    /// Status line text, e.g. `200 OK`
    pub status_text: String,
    /// Numeric status code
    pub status_code: u16,
    /// First [`MAX_SNIPPET`] bytes of the body, whitespace-trimmed
    pub snippet: String,
}

/// Issue one request and return its snippet record
///
/// Any HTTP status is a success here; only transport-level failures
/// (connect, TLS, timeout) surface as errors. The body is read up to
/// [`MAX_SNIPPET`] bytes and the remainder is drained so the connection can
/// be reused.
pub async fn execute(
    client: &Client,
    method: Method,
    url: &str,
    body: Vec<u8>,
    headers: &HashMap<String, String>,
) -> Result<SnippetResponse, reqwest::Error> {
    let mut builder = client.request(method, url);
    for (name, value) in headers {
        builder = builder.header(name, value);
    }

    let mut response = builder.body(body).send().await?;
    let status = response.status();

    let mut snippet = Vec::with_capacity(MAX_SNIPPET);
    // Body read errors after the status line are ignored, like a snippet
    // truncated by the peer; whatever arrived so far is kept.
    while let Ok(Some(chunk)) = response.chunk().await {
        if snippet.len() < MAX_SNIPPET {
            let room = MAX_SNIPPET - snippet.len();
            snippet.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }
        // Remaining chunks are discarded to drain the connection.
    }

    Ok(SnippetResponse {
        status_text: status.to_string(),
        status_code: status.as_u16(),
        snippet: String::from_utf8_lossy(&snippet).trim().to_string(),
    })
}
