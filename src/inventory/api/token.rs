use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::inventory::api::ApiClient;
use crate::inventory::error::{Result, SyncError};
use crate::inventory::model::AccessToken;

#[derive(Serialize)]
struct TokenRequest<'a> {
    token: &'a str,
}

/// Exchanges the static credential for a short-lived access token.
///
/// Only `200 OK` counts as success; the response body is the token, taken
/// verbatim. No retry is attempted.
#[instrument(level = "info", skip_all, fields(base_url = %client.base_url()))]
pub async fn acquire_token(client: &ApiClient, credential: &str) -> Result<AccessToken> {
    let response = client
        .client
        .post(client.endpoint("/token"))
        .header(CONTENT_TYPE, "application/json")
        .json(&TokenRequest { token: credential })
        .send()
        .await
        .map_err(SyncError::AuthTransport)?;

    let status = response.status();
    if status != StatusCode::OK {
        warn!(status = status.as_u16(), "token exchange rejected");
        return Err(SyncError::AuthRejected {
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(SyncError::AuthTransport)?;
    debug!(token_len = body.len(), "access token received");
    Ok(AccessToken::new(body))
}
