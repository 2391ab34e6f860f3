//! Merchant-initiated payment operations. Each handler assembles the
//! router data for one gateway flow, runs it through the connector
//! executor and maps the outcome onto the HTTP surface.

use std::marker::PhantomData;

use axum::{extract::State, Json};
use common_enums::{AttemptStatus, Currency, RefundStatus};
use common_utils::{errors::CustomResult, types::MinorUnit};
use connector_integration::types::{ConnectorData, ConnectorEnum};
use domain_types::{
    cart::CartReadError,
    connector_flow::{Authorize, Capture, DeleteSession, PSync, Refund, Void},
    connector_types::{
        PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponseData, PaymentsSyncData, RefundsData, RefundsResponseData, ResponseId,
        SessionDeleteData,
    },
    errors::ConnectorError,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
    types::{ConnectorParams, Proxy},
};
use external_services::service::execute_connector_processing_step;
use interfaces::{
    connector_integration_v2::{BoxedConnectorIntegrationV2, ConnectorIntegrationAnyV2},
    connector_types::{BoxedConnector, ConnectorServiceTrait},
};
use serde::{Deserialize, Serialize};

use crate::{configs::Config, http::error::ApiError, http::state::AppState};

#[derive(Debug, Deserialize)]
pub struct InitiateRequest {
    pub session_id: String,
    pub cart_id: String,
    pub connector: String,
}

#[derive(Debug, Deserialize)]
pub struct GetRequest {
    pub session_id: String,
    pub connector: String,
    #[serde(default)]
    pub currency: Currency,
}

#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    pub session_id: String,
    pub connector: String,
    pub refund_id: String,
    /// Refund amount in minor units; may be less than the captured
    /// amount for partial refunds.
    pub amount: i64,
    pub currency: Currency,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub session_id: String,
    pub connector: String,
    pub amount: i64,
    pub currency: Currency,
    pub provider_reference: String,
}

#[derive(Debug, Deserialize)]
pub struct VoidRequest {
    pub session_id: String,
    pub connector: String,
    pub provider_reference: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSessionRequest {
    pub connector: String,
    pub provider_session_id: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentOperationResponse {
    pub session_id: String,
    pub status: AttemptStatus,
    pub provider_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefundResponse {
    pub refund_id: String,
    pub connector_refund_id: String,
    pub status: RefundStatus,
}

fn parse_connector(name: &str) -> Result<ConnectorData, ApiError> {
    ConnectorData::get_connector_by_name(name)
        .map_err(|_| ApiError::bad_request(format!("unknown connector: {name}")))
}

fn connector_params(config: &Config, connector: ConnectorEnum) -> &ConnectorParams {
    match connector {
        ConnectorEnum::Ottu => &config.connectors.ottu,
        ConnectorEnum::Upayments => &config.connectors.upayments,
    }
}

pub(crate) fn connector_auth(params: &ConnectorParams) -> ConnectorAuthType {
    ConnectorAuthType::SignatureKey {
        merchant_id: params.merchant_id.clone(),
        secret_key: params.secret_key.clone(),
    }
}

fn flow_data(config: &Config, session_id: &str, currency: Currency) -> PaymentFlowData {
    PaymentFlowData {
        merchant_reference: session_id.to_string(),
        currency,
        status: AttemptStatus::Pending,
        description: None,
        return_url: None,
        customer: None,
        connectors: config.connectors.clone(),
    }
}

fn cart_failure(report: error_stack::Report<CartReadError>) -> ApiError {
    tracing::error!(?report, "failed to read the cart snapshot");
    match report.current_context() {
        CartReadError::NotFound { cart_id } => {
            ApiError::not_found(format!("no cart found for id {cart_id}"))
        }
        CartReadError::CommunicationFailure | CartReadError::MalformedSnapshot => {
            ApiError::bad_gateway("the order module is unavailable")
        }
    }
}

fn connector_failure(report: error_stack::Report<ConnectorError>) -> ApiError {
    tracing::error!(?report, "connector flow failed");
    match report.current_context() {
        ConnectorError::NotImplemented(operation) => {
            ApiError::not_implemented(format!("not supported by this provider: {operation}"))
        }
        ConnectorError::MissingRequiredField { field_name } => {
            ApiError::bad_request(format!("missing required field: {field_name}"))
        }
        _ => ApiError::bad_gateway("failed to reach the payment provider"),
    }
}

/// A 404 from a retrieve-style call means the provider has no record
/// of the payment; that is permanent, not retryable.
fn provider_error(error: ErrorResponse) -> ApiError {
    tracing::error!(
        code = %error.code,
        status_code = error.status_code,
        reason = ?error.reason,
        "provider returned an error response"
    );
    if error.status_code == 404 {
        ApiError::unprocessable("the provider has no record of the payment")
    } else {
        ApiError::bad_gateway("the payment provider returned an error")
    }
}

/// Pulls the provider-native reference out of the retrieve leg's
/// answer. No reference yet means the payment is not refundable, which
/// is the caller's problem to resolve, not a transport failure.
fn refund_reference(
    response: Result<PaymentsResponseData, ErrorResponse>,
) -> Result<String, ApiError> {
    match response {
        Ok(PaymentsResponseData::TransactionResponse {
            connector_response_reference_id,
            ..
        }) => connector_response_reference_id.ok_or_else(|| {
            ApiError::unprocessable("the provider has not assigned a payment reference yet")
        }),
        Err(error) => Err(provider_error(error)),
    }
}

async fn run_flow<F, Req, Resp>(
    proxy: &Proxy,
    connector: &BoxedConnector,
    router_data: RouterDataV2<F, PaymentFlowData, Req, Resp>,
) -> CustomResult<RouterDataV2<F, PaymentFlowData, Req, Resp>, ConnectorError>
where
    dyn ConnectorServiceTrait: ConnectorIntegrationAnyV2<F, PaymentFlowData, Req, Resp>,
{
    let integration: BoxedConnectorIntegrationV2<'_, F, PaymentFlowData, Req, Resp> =
        connector.get_connector_integration_v2();
    execute_connector_processing_step(proxy, integration, router_data).await
}

fn payment_response<F, Req>(
    router_data: RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>,
) -> Result<Json<PaymentOperationResponse>, ApiError> {
    let session_id = router_data.resource_common_data.merchant_reference.clone();
    let status = router_data.resource_common_data.status;
    match router_data.response {
        Ok(PaymentsResponseData::TransactionResponse {
            resource_id,
            redirection_data,
            connector_response_reference_id,
            ..
        }) => {
            let provider_reference = connector_response_reference_id.or(match resource_id {
                ResponseId::ConnectorTransactionId(id) => Some(id),
                ResponseId::NoResponseId => None,
            });
            Ok(Json(PaymentOperationResponse {
                session_id,
                status,
                provider_reference,
                redirect_url: redirection_data.map(|form| form.endpoint),
            }))
        }
        Err(error) => Err(provider_error(error)),
    }
}

pub async fn initiate(
    State(state): State<AppState>,
    Json(payload): Json<InitiateRequest>,
) -> Result<Json<PaymentOperationResponse>, ApiError> {
    let connector_data = parse_connector(&payload.connector)?;
    let params = connector_params(&state.config, connector_data.connector_name);

    let snapshot = state
        .cart_reader
        .get(&payload.cart_id)
        .await
        .map_err(cart_failure)?;

    let mut resource_common_data =
        flow_data(&state.config, &payload.session_id, snapshot.currency);
    resource_common_data.customer = Some(snapshot.customer);
    resource_common_data.return_url = Some(params.return_url.clone());

    let router_data = RouterDataV2 {
        flow: PhantomData::<Authorize>,
        resource_common_data,
        connector_auth_type: connector_auth(params),
        request: PaymentsAuthorizeData {
            minor_amount: snapshot.authoritative_total,
            currency: snapshot.currency,
            order_details: snapshot.items,
            router_return_url: Some(params.return_url.clone()),
        },
        response: Err(ErrorResponse::default()),
    };

    let result = run_flow(&state.config.proxy, &connector_data.connector, router_data)
        .await
        .map_err(connector_failure)?;
    payment_response(result)
}

pub async fn get(
    State(state): State<AppState>,
    Json(payload): Json<GetRequest>,
) -> Result<Json<PaymentOperationResponse>, ApiError> {
    let connector_data = parse_connector(&payload.connector)?;
    let params = connector_params(&state.config, connector_data.connector_name);

    let router_data = RouterDataV2 {
        flow: PhantomData::<PSync>,
        resource_common_data: flow_data(&state.config, &payload.session_id, payload.currency),
        connector_auth_type: connector_auth(params),
        request: PaymentsSyncData {
            connector_transaction_id: ResponseId::NoResponseId,
        },
        response: Err(ErrorResponse::default()),
    };

    let result = run_flow(&state.config.proxy, &connector_data.connector, router_data)
        .await
        .map_err(connector_failure)?;
    payment_response(result)
}

/// Refunds are keyed on the provider-native reference, which only the
/// provider knows: retrieve first, then refund with what it answered.
pub async fn refund(
    State(state): State<AppState>,
    Json(payload): Json<RefundRequest>,
) -> Result<Json<RefundResponse>, ApiError> {
    if payload.amount <= 0 {
        return Err(ApiError::bad_request("refund amount must be positive"));
    }
    let connector_data = parse_connector(&payload.connector)?;
    let params = connector_params(&state.config, connector_data.connector_name);

    let sync_router_data = RouterDataV2 {
        flow: PhantomData::<PSync>,
        resource_common_data: flow_data(&state.config, &payload.session_id, payload.currency),
        connector_auth_type: connector_auth(params),
        request: PaymentsSyncData {
            connector_transaction_id: ResponseId::NoResponseId,
        },
        response: Err(ErrorResponse::default()),
    };
    let sync_result = run_flow(&state.config.proxy, &connector_data.connector, sync_router_data)
        .await
        .map_err(connector_failure)?;

    let reference_number = refund_reference(sync_result.response)?;

    let refund_router_data = RouterDataV2 {
        flow: PhantomData::<Refund>,
        resource_common_data: flow_data(&state.config, &payload.session_id, payload.currency),
        connector_auth_type: connector_auth(params),
        request: RefundsData {
            refund_id: payload.refund_id,
            minor_refund_amount: MinorUnit::new(payload.amount),
            currency: payload.currency,
            connector_transaction_id: reference_number,
            reason: payload.reason,
        },
        response: Err(ErrorResponse::default()),
    };
    let result = run_flow(
        &state.config.proxy,
        &connector_data.connector,
        refund_router_data,
    )
    .await
    .map_err(connector_failure)?;

    match result.response {
        Ok(RefundsResponseData {
            connector_refund_id,
            refund_status,
            ..
        }) => Ok(Json(RefundResponse {
            refund_id: result.request.refund_id,
            connector_refund_id,
            status: refund_status,
        })),
        Err(error) => Err(provider_error(error)),
    }
}

/// Hosted-checkout providers capture on their own page; this flow is
/// bookkeeping only and acknowledges without a provider call.
pub async fn capture(
    State(state): State<AppState>,
    Json(payload): Json<CaptureRequest>,
) -> Result<Json<PaymentOperationResponse>, ApiError> {
    let connector_data = parse_connector(&payload.connector)?;
    let params = connector_params(&state.config, connector_data.connector_name);

    let router_data = RouterDataV2 {
        flow: PhantomData::<Capture>,
        resource_common_data: flow_data(&state.config, &payload.session_id, payload.currency),
        connector_auth_type: connector_auth(params),
        request: PaymentsCaptureData {
            minor_amount_to_capture: MinorUnit::new(payload.amount),
            currency: payload.currency,
            connector_transaction_id: payload.provider_reference.clone(),
        },
        response: Err(ErrorResponse::default()),
    };

    let result = run_flow(&state.config.proxy, &connector_data.connector, router_data)
        .await
        .map_err(connector_failure)?;

    Ok(Json(PaymentOperationResponse {
        session_id: result.resource_common_data.merchant_reference,
        status: result.resource_common_data.status,
        provider_reference: Some(payload.provider_reference),
        redirect_url: None,
    }))
}

pub async fn void(
    State(state): State<AppState>,
    Json(payload): Json<VoidRequest>,
) -> Result<Json<PaymentOperationResponse>, ApiError> {
    let connector_data = parse_connector(&payload.connector)?;
    let params = connector_params(&state.config, connector_data.connector_name);

    let router_data = RouterDataV2 {
        flow: PhantomData::<Void>,
        resource_common_data: flow_data(&state.config, &payload.session_id, Currency::default()),
        connector_auth_type: connector_auth(params),
        request: PaymentVoidData {
            connector_transaction_id: payload.provider_reference.unwrap_or_default(),
            cancellation_reason: payload.reason,
        },
        response: Err(ErrorResponse::default()),
    };

    let result = run_flow(&state.config.proxy, &connector_data.connector, router_data)
        .await
        .map_err(connector_failure)?;
    payment_response(result)
}

pub async fn delete_session(
    State(state): State<AppState>,
    Json(payload): Json<DeleteSessionRequest>,
) -> Result<Json<PaymentOperationResponse>, ApiError> {
    let connector_data = parse_connector(&payload.connector)?;
    let params = connector_params(&state.config, connector_data.connector_name);

    let router_data = RouterDataV2 {
        flow: PhantomData::<DeleteSession>,
        resource_common_data: flow_data(
            &state.config,
            &payload.provider_session_id,
            Currency::default(),
        ),
        connector_auth_type: connector_auth(params),
        request: SessionDeleteData {
            connector_session_id: payload.provider_session_id,
        },
        response: Err(ErrorResponse::default()),
    };

    let result = run_flow(&state.config.proxy, &connector_data.connector, router_data)
        .await
        .map_err(connector_failure)?;
    payment_response(result)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use axum::http::StatusCode;

    use super::*;

    fn sync_answer(reference: Option<&str>) -> Result<PaymentsResponseData, ErrorResponse> {
        Ok(PaymentsResponseData::TransactionResponse {
            resource_id: ResponseId::ConnectorTransactionId("order_42".to_string()),
            redirection_data: None,
            connector_response_reference_id: reference.map(str::to_string),
            status_code: 200,
        })
    }

    #[test]
    fn refund_uses_the_retrieved_reference() {
        let reference = refund_reference(sync_answer(Some("ref_990"))).unwrap();
        assert_eq!(reference, "ref_990");
    }

    #[test]
    fn refund_without_a_provider_reference_is_unprocessable() {
        let err = refund_reference(sync_answer(None)).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unknown_payment_on_retrieve_is_a_permanent_failure() {
        let err = refund_reference(Err(ErrorResponse {
            status_code: 404,
            ..Default::default()
        }))
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.message.contains("no record of the payment"));
    }

    #[test]
    fn provider_server_errors_map_to_bad_gateway() {
        let err = provider_error(ErrorResponse {
            status_code: 500,
            ..Default::default()
        });
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }
}
