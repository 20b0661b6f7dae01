//! HTTP plumbing shared by the provider clients.

use pipewright_core::error::ProviderError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

/// Request timeout for completion and embedding calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the HTTP client used by every provider.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to a default HTTP client");
            reqwest::Client::new()
        })
}

/// Send a prepared request and decode a successful JSON body.
///
/// Non-success statuses become the matching [`ProviderError`].
pub async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let status = response.status().as_u16();

    if status == 429 {
        let retry_after_secs = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        return Err(ProviderError::RateLimited { retry_after_secs });
    }

    if status == 401 || status == 403 {
        return Err(ProviderError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ));
    }

    if !(200..300).contains(&status) {
        let error_body = response.text().await.unwrap_or_default();
        warn!(provider, status, body = %error_body, "Provider returned error");
        return Err(ProviderError::ApiError {
            status_code: status,
            message: error_body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}
