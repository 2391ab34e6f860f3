#![allow(clippy::unwrap_used)]

use std::{collections::HashMap, marker::PhantomData};

use bytes::Bytes;
use common_enums::{AttemptStatus, Currency};
use common_utils::{
    crypto::generate_hex_sha256,
    masking::{PeekInterface, Secret},
    types::MinorUnit,
};
use domain_types::{
    cart::{CustomerDetails, LineItem},
    connector_flow::{Authorize, DeleteSession, Void},
    connector_types::{
        EventType, PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData, PaymentsResponseData,
        RequestDetails, SessionDeleteData,
    },
    errors::ConnectorError,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    types::Connectors,
};
use interfaces::{connector_integration_v2::ConnectorIntegrationV2, connector_types::IncomingWebhook};

use super::{
    transformers::{map_attempt_status, UpaymentsChargeRequest, UpaymentsWebhookPayload},
    Upayments,
};

const MERCHANT_ID: &str = "merchant_1";
const SECRET_KEY: &str = "s3cr3t";

fn auth() -> ConnectorAuthType {
    ConnectorAuthType::SignatureKey {
        merchant_id: Secret::new(MERCHANT_ID.to_string()),
        secret_key: Secret::new(SECRET_KEY.to_string()),
    }
}

fn flow_data(merchant_reference: &str) -> PaymentFlowData {
    PaymentFlowData {
        merchant_reference: merchant_reference.to_string(),
        currency: Currency::USD,
        status: AttemptStatus::Pending,
        description: None,
        return_url: Some("https://shop.example.com/return".to_string()),
        customer: Some(CustomerDetails {
            customer_profile_id: "cust_7".to_string(),
            email: None,
            name: None,
            phone: None,
        }),
        connectors: Connectors::default(),
    }
}

fn authorize_router_data(
) -> RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData> {
    RouterDataV2 {
        flow: PhantomData,
        resource_common_data: flow_data("order_42"),
        connector_auth_type: auth(),
        request: PaymentsAuthorizeData {
            minor_amount: MinorUnit::new(10000),
            currency: Currency::USD,
            order_details: vec![
                LineItem {
                    id: "sku_2".to_string(),
                    title: "Item sku_2".to_string(),
                    unit_price: MinorUnit::new(5000),
                    quantity: 1,
                    thumbnail: None,
                },
                LineItem {
                    id: "sku_1".to_string(),
                    title: "Item sku_1".to_string(),
                    unit_price: MinorUnit::new(2500),
                    quantity: 2,
                    thumbnail: None,
                },
            ],
            router_return_url: Some("https://shop.example.com/return".to_string()),
        },
        response: Err(Default::default()),
    }
}

fn webhook_request(payload: &UpaymentsWebhookPayload) -> RequestDetails {
    RequestDetails {
        headers: HashMap::new(),
        body: Bytes::from(serde_json::to_vec(payload).unwrap()),
    }
}

#[test]
fn charge_request_keeps_cart_order_and_signs_over_it() {
    let router_data = authorize_router_data();
    let request = UpaymentsChargeRequest::try_from(&router_data).unwrap();

    // The itemized sum matches the total, so no adjustment item and the
    // cart order is preserved as-is.
    let ids: Vec<&str> = request
        .products
        .iter()
        .map(|product| product.product_id.as_str())
        .collect();
    assert_eq!(ids, vec!["sku_2", "sku_1"]);
    assert_eq!(request.order.id, "order_42");
    assert_eq!(request.order.amount.get_amount_as_string(), "100.00");

    let expected_message = format!(
        "{MERCHANT_ID}order_42cust_7https://shop.example.com/return\
         sku_2150.00sku_1225.00{SECRET_KEY}"
    );
    assert_eq!(
        request.signature.peek(),
        &generate_hex_sha256(expected_message.as_bytes()).unwrap()
    );
}

#[test]
fn cancel_flow_is_not_implemented() {
    let router_data: RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData> =
        RouterDataV2 {
            flow: PhantomData,
            resource_common_data: flow_data("order_42"),
            connector_auth_type: auth(),
            request: PaymentVoidData {
                connector_transaction_id: "track_5".to_string(),
                cancellation_reason: None,
            },
            response: Err(Default::default()),
        };
    let err = Upayments::new().build_request_v2(&router_data).unwrap_err();
    assert!(matches!(
        err.current_context(),
        ConnectorError::NotImplemented(_)
    ));
}

#[test]
fn delete_session_flow_is_not_implemented() {
    let router_data: RouterDataV2<
        DeleteSession,
        PaymentFlowData,
        SessionDeleteData,
        PaymentsResponseData,
    > = RouterDataV2 {
        flow: PhantomData,
        resource_common_data: flow_data("order_42"),
        connector_auth_type: auth(),
        request: SessionDeleteData {
            connector_session_id: "sess_1".to_string(),
        },
        response: Err(Default::default()),
    };
    let err = Upayments::new().build_request_v2(&router_data).unwrap_err();
    assert!(matches!(
        err.current_context(),
        ConnectorError::NotImplemented(_)
    ));
}

#[test]
fn unsigned_webhooks_never_verify() {
    let payload = UpaymentsWebhookPayload {
        order_id: "order_42".to_string(),
        status: "paid".to_string(),
        amount: serde_json::from_str("\"100.00\"").unwrap(),
        currency: Currency::USD,
        track_id: Some("track_5".to_string()),
    };
    let verified = Upayments::new()
        .verify_webhook_source(&webhook_request(&payload), &auth())
        .unwrap();
    assert!(!verified);
}

#[test]
fn paid_webhook_decodes_to_captured() {
    let payload = UpaymentsWebhookPayload {
        order_id: "order_42".to_string(),
        status: "paid".to_string(),
        amount: serde_json::from_str("\"100.00\"").unwrap(),
        currency: Currency::USD,
        track_id: Some("track_5".to_string()),
    };
    let details = Upayments::new()
        .process_payment_webhook(&webhook_request(&payload))
        .unwrap();
    assert_eq!(details.event_type, EventType::Captured);
    assert_eq!(details.merchant_reference, "order_42");
    assert_eq!(details.amount, MinorUnit::new(10000));
    assert_eq!(details.connector_reference.as_deref(), Some("track_5"));
}

#[test]
fn expired_webhook_decodes_to_failed() {
    let payload = UpaymentsWebhookPayload {
        order_id: "order_42".to_string(),
        status: "EXPIRED".to_string(),
        amount: serde_json::from_str("\"100.00\"").unwrap(),
        currency: Currency::USD,
        track_id: None,
    };
    let details = Upayments::new()
        .process_payment_webhook(&webhook_request(&payload))
        .unwrap();
    assert_eq!(details.event_type, EventType::Failed);
    assert_eq!(details.raw_status.as_deref(), Some("EXPIRED"));
}

#[test]
fn undocumented_failed_status_decodes_to_not_supported() {
    let payload = UpaymentsWebhookPayload {
        order_id: "order_42".to_string(),
        status: "failed".to_string(),
        amount: serde_json::from_str("\"100.00\"").unwrap(),
        currency: Currency::USD,
        track_id: None,
    };
    let details = Upayments::new()
        .process_payment_webhook(&webhook_request(&payload))
        .unwrap();
    assert_eq!(details.event_type, EventType::NotSupported);
    assert_eq!(details.raw_status.as_deref(), Some("failed"));
}

#[test]
fn attempt_status_vocabulary_is_paid_and_expired_only() {
    assert_eq!(map_attempt_status("paid"), AttemptStatus::Charged);
    assert_eq!(map_attempt_status("EXPIRED"), AttemptStatus::Expired);
    assert_eq!(map_attempt_status("failed"), AttemptStatus::Pending);
}

#[test]
fn unknown_webhook_status_decodes_to_not_supported() {
    let payload = UpaymentsWebhookPayload {
        order_id: "order_42".to_string(),
        status: "chargeback_opened".to_string(),
        amount: serde_json::from_str("\"100.00\"").unwrap(),
        currency: Currency::USD,
        track_id: None,
    };
    let details = Upayments::new()
        .process_payment_webhook(&webhook_request(&payload))
        .unwrap();
    assert_eq!(details.event_type, EventType::NotSupported);
}
