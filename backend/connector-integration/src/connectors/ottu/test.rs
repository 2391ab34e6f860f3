#![allow(clippy::unwrap_used)]

use std::{collections::HashMap, marker::PhantomData};

use bytes::Bytes;
use common_enums::{AttemptStatus, Currency};
use common_utils::{
    crypto::generate_hex_sha256,
    masking::{Maskable, PeekInterface, Secret},
    types::MinorUnit,
};
use domain_types::{
    cart::{CustomerDetails, LineItem},
    connector_flow::{Authorize, Capture, PSync, Refund},
    connector_types::{
        EventType, PaymentFlowData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponseData, PaymentsSyncData, RefundsData, RefundsResponseData, RequestDetails,
        ResponseId,
    },
    errors::ConnectorError,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    types::Connectors,
};
use interfaces::{connector_integration_v2::ConnectorIntegrationV2, connector_types::IncomingWebhook};

use super::{
    transformers::{OttuPaymentsRequest, OttuRefundRequest, OttuSyncQuery, OttuWebhookPayload},
    Ottu,
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

fn line_item(id: &str, unit_price: i64, quantity: u16) -> LineItem {
    LineItem {
        id: id.to_string(),
        title: format!("Item {id}"),
        unit_price: MinorUnit::new(unit_price),
        quantity,
        thumbnail: None,
    }
}

fn authorize_router_data(
) -> RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData> {
    RouterDataV2 {
        flow: PhantomData,
        resource_common_data: flow_data("order_42"),
        connector_auth_type: auth(),
        request: PaymentsAuthorizeData {
            minor_amount: MinorUnit::new(15000),
            currency: Currency::USD,
            order_details: vec![line_item("sku_2", 5000, 1), line_item("sku_1", 2500, 2)],
            router_return_url: Some("https://shop.example.com/return".to_string()),
        },
        response: Err(Default::default()),
    }
}

fn webhook_payload(status: &str, signed: bool) -> OttuWebhookPayload {
    let mut payload = OttuWebhookPayload {
        merchant_reference: "order_42".to_string(),
        status: status.to_string(),
        amount: serde_json::from_str("\"150.00\"").unwrap(),
        currency: Currency::USD,
        reference_number: Some("ref_990".to_string()),
        signature: None,
    };
    if signed {
        let message = format!(
            "{MERCHANT_ID}{}{}{}{SECRET_KEY}",
            payload.merchant_reference,
            payload.amount.get_amount_as_string(),
            payload.status,
        );
        payload.signature = Some(Secret::new(
            generate_hex_sha256(message.as_bytes()).unwrap(),
        ));
    }
    payload
}

fn webhook_request(payload: &OttuWebhookPayload) -> RequestDetails {
    RequestDetails {
        headers: HashMap::new(),
        body: Bytes::from(serde_json::to_vec(payload).unwrap()),
    }
}

#[test]
fn authorize_request_sorts_items_and_signs_over_them() {
    let router_data = authorize_router_data();
    let request = OttuPaymentsRequest::try_from(&router_data).unwrap();

    // 10000 itemized against a 15000 total: the adjustment item closes
    // the gap, and items are ordered by id ascending.
    let ids: Vec<&str> = request
        .charge_items
        .iter()
        .map(|item| item.product_id.as_str())
        .collect();
    assert_eq!(ids, vec!["amount_difference", "sku_1", "sku_2"]);
    assert_eq!(request.amount.get_amount_as_string(), "150.00");
    assert_eq!(request.merchant_reference, "order_42");

    let expected_message = format!(
        "{MERCHANT_ID}order_42cust_7https://shop.example.com/return\
         amount_difference150.00sku_1225.00sku_2150.00{SECRET_KEY}"
    );
    assert_eq!(
        request.signature.peek(),
        &generate_hex_sha256(expected_message.as_bytes()).unwrap()
    );
}

#[test]
fn authorize_request_carries_json_content_type() {
    let router_data = authorize_router_data();
    let request = Ottu::new()
        .build_request_v2(&router_data)
        .unwrap()
        .expect("authorize builds an outbound request");
    assert_eq!(
        request.headers,
        vec![(
            "Content-Type".to_string(),
            Maskable::new_normal("application/json".to_string()),
        )]
    );
}

#[test]
fn authorize_request_rejects_non_signature_auth() {
    let mut router_data = authorize_router_data();
    router_data.connector_auth_type = ConnectorAuthType::HeaderKey {
        api_key: Secret::new("key".to_string()),
    };
    let err = OttuPaymentsRequest::try_from(&router_data).unwrap_err();
    assert!(matches!(
        err.current_context(),
        ConnectorError::FailedToObtainAuthType
    ));
}

#[test]
fn sync_query_signature_covers_merchant_reference() {
    let router_data: RouterDataV2<PSync, PaymentFlowData, PaymentsSyncData, PaymentsResponseData> =
        RouterDataV2 {
            flow: PhantomData,
            resource_common_data: flow_data("order_42"),
            connector_auth_type: auth(),
            request: PaymentsSyncData {
                connector_transaction_id: ResponseId::NoResponseId,
            },
            response: Err(Default::default()),
        };
    let query = OttuSyncQuery::try_from(&router_data).unwrap();
    assert_eq!(
        query.signature.peek(),
        &generate_hex_sha256(format!("{MERCHANT_ID}order_42{SECRET_KEY}").as_bytes()).unwrap()
    );
}

#[test]
fn refund_request_is_keyed_on_the_provider_reference() {
    let router_data: RouterDataV2<Refund, PaymentFlowData, RefundsData, RefundsResponseData> =
        RouterDataV2 {
            flow: PhantomData,
            resource_common_data: flow_data("order_42"),
            connector_auth_type: auth(),
            request: RefundsData {
                refund_id: "refund_1".to_string(),
                minor_refund_amount: MinorUnit::new(2500),
                currency: Currency::USD,
                connector_transaction_id: "ref_990".to_string(),
                reason: None,
            },
            response: Err(Default::default()),
        };
    let request = OttuRefundRequest::try_from(&router_data).unwrap();
    assert_eq!(request.reference_number, "ref_990");
    assert_eq!(request.refund_amount.get_amount_as_string(), "25.00");
    assert_eq!(
        request.signature.peek(),
        &generate_hex_sha256(format!("{MERCHANT_ID}ref_99025.00{SECRET_KEY}").as_bytes()).unwrap()
    );
}

#[test]
fn capture_needs_no_provider_call() {
    let router_data: RouterDataV2<
        Capture,
        PaymentFlowData,
        PaymentsCaptureData,
        PaymentsResponseData,
    > = RouterDataV2 {
        flow: PhantomData,
        resource_common_data: flow_data("order_42"),
        connector_auth_type: auth(),
        request: PaymentsCaptureData {
            minor_amount_to_capture: MinorUnit::new(15000),
            currency: Currency::USD,
            connector_transaction_id: "sess_1".to_string(),
        },
        response: Err(Default::default()),
    };
    let request = Ottu::new().build_request_v2(&router_data).unwrap();
    assert!(request.is_none());
}

#[test]
fn webhook_with_valid_signature_verifies() {
    let payload = webhook_payload("PAID", true);
    let verified = Ottu::new()
        .verify_webhook_source(&webhook_request(&payload), &auth())
        .unwrap();
    assert!(verified);
}

#[test]
fn webhook_with_tampered_amount_fails_verification() {
    let mut payload = webhook_payload("PAID", true);
    payload.amount = serde_json::from_str("\"151.00\"").unwrap();
    let err = Ottu::new()
        .verify_webhook_source(&webhook_request(&payload), &auth())
        .unwrap_err();
    assert!(matches!(
        err.current_context(),
        ConnectorError::WebhookSourceVerificationFailed
    ));
}

#[test]
fn webhook_without_signature_is_rejected() {
    let payload = webhook_payload("PAID", false);
    let err = Ottu::new()
        .verify_webhook_source(&webhook_request(&payload), &auth())
        .unwrap_err();
    assert!(matches!(
        err.current_context(),
        ConnectorError::WebhookSignatureNotFound
    ));
}

#[test]
fn paid_webhook_decodes_to_captured() {
    let payload = webhook_payload("PAID", true);
    let details = Ottu::new()
        .process_payment_webhook(&webhook_request(&payload))
        .unwrap();
    assert_eq!(details.event_type, EventType::Captured);
    assert_eq!(details.merchant_reference, "order_42");
    assert_eq!(details.amount, MinorUnit::new(15000));
    assert_eq!(details.connector_reference.as_deref(), Some("ref_990"));
    assert_eq!(details.raw_status.as_deref(), Some("PAID"));
}

#[test]
fn unknown_webhook_status_decodes_to_not_supported() {
    let payload = webhook_payload("pending_review", true);
    let details = Ottu::new()
        .process_payment_webhook(&webhook_request(&payload))
        .unwrap();
    assert_eq!(details.event_type, EventType::NotSupported);
    assert_eq!(details.raw_status.as_deref(), Some("pending_review"));
}

#[test]
fn webhook_decode_is_deterministic_across_redelivery() {
    let request = webhook_request(&webhook_payload("FAILED", true));
    let connector = Ottu::new();
    let first = connector.process_payment_webhook(&request).unwrap();
    let second = connector.process_payment_webhook(&request).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.event_type, EventType::Failed);
}

mod signature_properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn distinct_references_produce_distinct_signatures(
            first in "[a-z0-9_]{1,12}",
            second in "[a-z0-9_]{1,12}",
        ) {
            let sign = |reference: &str| {
                generate_hex_sha256(
                    format!("{MERCHANT_ID}{reference}{SECRET_KEY}").as_bytes(),
                )
                .unwrap()
            };
            prop_assert_eq!(first == second, sign(&first) == sign(&second));
        }

        #[test]
        fn a_different_secret_changes_the_signature(
            secret in "[a-z0-9]{4,16}",
        ) {
            prop_assume!(secret != SECRET_KEY);
            let message = |k: &str| format!("{MERCHANT_ID}order_42{k}");
            prop_assert_ne!(
                generate_hex_sha256(message(SECRET_KEY).as_bytes()).unwrap(),
                generate_hex_sha256(message(&secret).as_bytes()).unwrap()
            );
        }
    }
}
