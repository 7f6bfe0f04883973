use reqwest::header::AUTHORIZATION;
use tracing::{info, instrument, warn};

use crate::inventory::api::ApiClient;
use crate::inventory::error::{Result, SyncError};
use crate::inventory::model::{AccessToken, OfferPayload, SubmissionReport};

const BODY_PREVIEW_CHARS: usize = 512;

/// Posts the offers to the import endpoint.
///
/// Whatever status comes back is reported to the caller; only a request that
/// never got a response is an error.
#[instrument(level = "info", skip_all, fields(offer_count = payload.len()))]
pub async fn submit_offers(
    client: &ApiClient,
    payload: &OfferPayload,
    token: &AccessToken,
) -> Result<SubmissionReport> {
    let response = client
        .client
        .post(client.endpoint("/offers/import"))
        .header(AUTHORIZATION, format!("Bearer {}", token.as_str()))
        .json(payload)
        .send()
        .await
        .map_err(SyncError::Submit)?;

    let report = SubmissionReport {
        status: response.status().as_u16(),
    };
    if report.is_success() {
        info!(status = report.status, "offers accepted");
    } else {
        let body = response.text().await.unwrap_or_default();
        let body = preview(&body, BODY_PREVIEW_CHARS);
        warn!(status = report.status, %body, "offer import answered with a non-success status");
    }
    Ok(report)
}

/// First `limit` characters of `body`, with `...` appended when cut.
fn preview(body: &str, limit: usize) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_logged_whole() {
        assert_eq!(preview("bad request", BODY_PREVIEW_CHARS), "bad request");
    }

    #[test]
    fn long_bodies_are_cut_on_char_boundaries() {
        let page = format!("<html>{}</html>", "ü".repeat(2000));

        let logged = preview(&page, BODY_PREVIEW_CHARS);

        assert_eq!(logged.chars().count(), BODY_PREVIEW_CHARS + 3);
        assert!(logged.starts_with("<html>"));
        assert!(logged.ends_with("..."));
    }
}
