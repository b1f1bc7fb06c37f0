#![cfg_attr(
    not(any(
        feature = "provider-deepseek",
        feature = "provider-gemini",
        feature = "provider-huggingface"
    )),
    allow(dead_code)
)]

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{HttpResponse, ProviderError, ProviderKind};

#[cfg(feature = "provider-deepseek")]
pub mod deepseek;

#[cfg(feature = "provider-gemini")]
pub mod gemini;

#[cfg(feature = "provider-huggingface")]
pub mod huggingface;

const MAX_ERROR_BODY: usize = 512;

/// Error payload shapes: `{"error":{"message":..}}` and `{"error":".."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorField {
    Detailed { message: String },
    Plain(String),
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorField,
}

pub(crate) fn extract_error_message(body: &[u8]) -> Option<String> {
    let parsed = serde_json::from_slice::<ApiErrorEnvelope>(body).ok()?;
    let message = match parsed.error {
        ApiErrorField::Detailed { message } => message,
        ApiErrorField::Plain(message) => message,
    };

    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

pub(crate) fn error_from_response(
    provider: ProviderKind,
    response: &HttpResponse,
) -> ProviderError {
    let message = extract_error_message(&response.body)
        .unwrap_or_else(|| format!("{provider} request failed with status {}", response.status));
    ProviderError::for_status(response.status, message)
}

pub(crate) fn parse_json<T>(
    provider: ProviderKind,
    response: &HttpResponse,
) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(&response.body).map_err(|err| {
        ProviderError::malformed_response(format!(
            "{provider} returned an unreadable body ({err}): {}",
            truncate(&response.text(), MAX_ERROR_BODY)
        ))
    })
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn truncate(input: &str, max: usize) -> String {
    if input.len() <= max {
        return input.to_string();
    }
    let mut end = max;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    let mut output = input[..end].to_string();
    output.push_str("...");
    output
}
