//! Request body encoding
//!
//! Renders a field → value map into body bytes plus the matching
//! `Content-Type`. Field iteration order is unspecified; `form` and
//! `multipart` parsers are order-insensitive, and `json` key order carries no
//! meaning.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

/// Supported payload encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// JSON object of all fields
    Json,
    /// `application/x-www-form-urlencoded` key/value pairs
    Form,
    /// `multipart/form-data` with one part per field
    Multipart,
    /// Raw bytes of a single field's value
    Binary,
    /// `{"query": fields["query"]}` envelope
    Graphql,
}

impl FromStr for PayloadFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(PayloadFormat::Json),
            "form" => Ok(PayloadFormat::Form),
            "multipart" => Ok(PayloadFormat::Multipart),
            "binary" => Ok(PayloadFormat::Binary),
            "graphql" => Ok(PayloadFormat::Graphql),
            other => Err(EncodeError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadFormat::Json => "json",
            PayloadFormat::Form => "form",
            PayloadFormat::Multipart => "multipart",
            PayloadFormat::Binary => "binary",
            PayloadFormat::Graphql => "graphql",
        };
        f.write_str(name)
    }
}

/// Encode `fields` as `format`, returning the body and its `Content-Type`
pub fn encode(
    format: PayloadFormat,
    fields: &HashMap<String, String>,
) -> Result<(Vec<u8>, String), EncodeError> {
    match format {
        PayloadFormat::Json => {
            let body = serde_json::to_vec(fields).map_err(EncodeError::Json)?;
            Ok((body, "application/json".to_string()))
        }
        PayloadFormat::Form => {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in fields {
                serializer.append_pair(key, value);
            }
            Ok((
                serializer.finish().into_bytes(),
                "application/x-www-form-urlencoded".to_string(),
            ))
        }
        PayloadFormat::Multipart => {
            let boundary = generate_boundary();
            let mut body = Vec::new();
            for (name, value) in fields {
                body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        escape_part_name(name)
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
                body.extend_from_slice(b"\r\n");
            }
            body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
            Ok((body, format!("multipart/form-data; boundary={boundary}")))
        }
        PayloadFormat::Binary => {
            if fields.len() != 1 {
                return Err(EncodeError::BinaryFieldCount(fields.len()));
            }
            let value = fields.values().next().cloned().unwrap_or_default();
            Ok((value.into_bytes(), "application/octet-stream".to_string()))
        }
        PayloadFormat::Graphql => {
            let query = fields.get("query").cloned().unwrap_or_default();
            let body = serde_json::to_vec(&serde_json::json!({ "query": query }))
                .map_err(EncodeError::Graphql)?;
            Ok((body, "application/json".to_string()))
        }
    }
}

fn generate_boundary() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(30)
        .map(char::from)
        .collect();
    format!("volley{suffix}")
}

// Quotes and backslashes would terminate the name parameter early.
fn escape_part_name(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
