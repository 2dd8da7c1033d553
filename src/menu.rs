//! Interactive main menu

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use volley_core::{Engine, EngineError, EngineParams, PayloadFormat, RunStats, WordlistSource};

use crate::input;
use crate::install;
use crate::printer;

/// Show the menu once; returns `true` when the user chose to exit.
pub async fn show_main_menu() -> bool {
    printer::menu_title("=== VOLLEY ===");
    printer::menu_option("1", "Send Registration Request (file-based payloads)");
    printer::menu_option("2", "Send Authentication Request (file-based payloads)");
    printer::menu_option("3", "Install Tor & proxychains (requires sudo, apt-based systems)");
    printer::menu_option("4", "Exit");

    match input::read_line("Select an option:").as_str() {
        "1" => handle_bulk_request("registration").await,
        "2" => handle_bulk_request("authentication").await,
        "3" => run_installer(),
        "4" | "exit" => return true,
        _ => printer::error("Invalid option, try again."),
    }
    false
}

async fn handle_bulk_request(kind: &str) {
    printer::info(&format!("Preparing to send {kind} requests..."));

    let url = input::read_line("Enter target URL:");
    if url.is_empty() || url == "exit" {
        printer::info("Cancelled.");
        return;
    }

    let template = input::read_line(
        "Enter payload template (e.g. Email:/path/emails.txt, Password:/path/passwords.txt):",
    );
    if template.is_empty() || template == "exit" {
        printer::info("Cancelled.");
        return;
    }

    let field_files = match parse_payload_template(&template) {
        Ok(fields) => fields,
        Err(e) => {
            printer::error(&format!("Invalid payload template: {e}"));
            return;
        }
    };

    let (wordlists, min_len) = match input::read_wordlists(&field_files) {
        Ok(loaded) => loaded,
        Err(e) => {
            printer::error(&format!("Error reading wordlists: {e}"));
            return;
        }
    };
    if min_len == 0 {
        printer::error("No entries found in wordlists.");
        return;
    }

    let count = input::read_usize_with_default(
        "Number of requests to send (based on wordlist)",
        min_len,
    );
    let count = if count == 0 { min_len } else { count };

    let workers = input::read_usize_with_default("Concurrency (worker count)", 10);
    let chunk_size = input::read_usize_with_default("Chunk size (requests per batch)", 1000);
    let rate_limit =
        input::read_usize_with_default("Rate limit (requests per second, 0 = unlimited)", 0);

    let format = match input::read_line("Payload format (json/form/multipart/binary/graphql):")
        .parse::<PayloadFormat>()
    {
        Ok(format) => format,
        Err(_) => {
            printer::info("Unrecognised format, using json.");
            PayloadFormat::Json
        }
    };

    let use_proxy = {
        let answer = input::read_line("Use Tor (SOCKS5 at 127.0.0.1:9050)? (y/N)");
        answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
    };

    printer::info("Default header: Content-Type: application/json");
    let headers = input::read_headers();

    let log_path = input::read_line("Per-request CSV log path (empty = no log):");

    let mut params = EngineParams::new("POST", url, count)
        .with_headers(headers)
        .with_format(format)
        .with_proxy(use_proxy)
        .with_workers(workers)
        .with_chunk_size(chunk_size)
        .with_rate_limit(rate_limit as u32);
    if !log_path.is_empty() && log_path != "exit" {
        params = params.with_log_path(log_path);
    }

    printer::action("Starting to send requests...");

    let engine = Engine::new(params, Arc::new(WordlistSource::new(wordlists)));
    match engine.run().await {
        Ok(stats) => {
            print_summary(&stats);
            printer::success("Finished sending requests");
        }
        Err(EngineError::Cancelled { stats }) => {
            printer::error("Run cancelled before completion");
            print_summary(&stats);
        }
        Err(e) => printer::error(&format!("Error sending requests: {e}")),
    }
}

fn print_summary(stats: &RunStats) {
    let total = stats.total();

    let mut statuses: Vec<_> = stats.total_per_status.iter().collect();
    statuses.sort_by_key(|(status, _)| **status);

    for (status, count) in statuses {
        let message = stats
            .example_message
            .get(status)
            .map(String::as_str)
            .unwrap_or("");
        let verdict = if (200..300).contains(status) {
            "success"
        } else {
            "failed"
        };
        printer::info(&format!(
            "{count} out of {total} {verdict} status:{status} message: {message}"
        ));
    }

    printer::info(&format!(
        "Summary: total={total} success={} failed={}",
        stats.success_total(),
        stats.failure_total()
    ));
}

/// Parse `Field:/path/list.txt, Other:"literal"` into field → value pairs.
fn parse_payload_template(template: &str) -> Result<HashMap<String, String>> {
    let mut out = HashMap::new();
    for part in template.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((key, value)) = part.split_once(':') else {
            bail!("invalid token: {part}");
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            bail!("empty key or path in: {part}");
        }
        out.insert(key.to_string(), value.to_string());
    }
    Ok(out)
}

fn run_installer() {
    printer::info("This will attempt to install tor and proxychains (Debian/Ubuntu apt).");
    let agree = input::read_line("Proceed with installation? (requires sudo) (y/N):");
    if !(agree.eq_ignore_ascii_case("y") || agree.eq_ignore_ascii_case("yes")) {
        printer::info("Cancelled installation.");
        return;
    }
    match install::install_tor_proxychains() {
        Ok(()) => printer::success(
            "Installation attempted. Please check logs / system prompts for sudo.",
        ),
        Err(e) => printer::error(&format!("Installation failed: {e}")),
    }
}
