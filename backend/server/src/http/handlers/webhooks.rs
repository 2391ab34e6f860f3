//! Inbound provider webhooks: authenticate where the provider supports
//! it, decode into the canonical event and hand that back to the
//! payment module in the response body.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use bytes::Bytes;
use connector_integration::types::ConnectorData;
use domain_types::{
    connector_types::{RequestDetails, WebhookDetailsResponse},
    errors::ConnectorError,
};
use super::payments::connector_auth;
use crate::http::{error::ApiError, state::AppState};

fn request_details(headers: &HeaderMap, body: Bytes) -> RequestDetails {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.to_string(), value.to_string()))
        })
        .collect::<HashMap<_, _>>();
    RequestDetails { headers, body }
}

fn verification_failure(report: error_stack::Report<ConnectorError>) -> ApiError {
    tracing::warn!(?report, "webhook verification failed");
    match report.current_context() {
        ConnectorError::WebhookSourceVerificationFailed
        | ConnectorError::WebhookSignatureNotFound => {
            ApiError::unauthorized("webhook signature verification failed")
        }
        _ => ApiError::bad_request("unable to decode the webhook payload"),
    }
}

pub async fn incoming(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookDetailsResponse>, ApiError> {
    let connector_data = ConnectorData::get_connector_by_name(&provider)
        .map_err(|_| ApiError::not_found(format!("unknown provider: {provider}")))?;
    let params = match connector_data.connector_name {
        connector_integration::ConnectorEnum::Ottu => &state.config.connectors.ottu,
        connector_integration::ConnectorEnum::Upayments => &state.config.connectors.upayments,
    };
    let request = request_details(&headers, body);

    // `Ok(false)` means the provider gives us nothing to verify; the
    // event is still decoded but flagged unauthenticated in the logs.
    let source_verified = connector_data
        .connector
        .verify_webhook_source(&request, &connector_auth(params))
        .map_err(verification_failure)?;

    let details = connector_data
        .connector
        .process_payment_webhook(&request)
        .map_err(|report| {
            tracing::warn!(?report, "failed to decode webhook payload");
            ApiError::bad_request("unable to decode the webhook payload")
        })?;

    tracing::info!(
        provider = %provider,
        merchant_reference = %details.merchant_reference,
        event = %details.event_type,
        source_verified,
        raw_status = ?details.raw_status,
        "webhook normalized"
    );

    Ok(Json(details))
}
