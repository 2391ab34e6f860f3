use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/payments/initiate", post(handlers::payments::initiate))
        .route("/payments/get", post(handlers::payments::get))
        .route("/payments/refund", post(handlers::payments::refund))
        .route("/payments/capture", post(handlers::payments::capture))
        .route("/payments/void", post(handlers::payments::void))
        .route(
            "/payments/delete_session",
            post(handlers::payments::delete_session),
        )
        .route(
            "/hooks/payment/:provider",
            post(handlers::webhooks::incoming),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common_utils::{errors::CustomResult, masking::Secret};
    use domain_types::{
        cart::{CartReadError, CartReader, CartSnapshot},
        types::{ConnectorParams, Connectors, Proxy},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        configs::{Config, OrderModule, Server},
        logger::Log,
    };

    struct NoCarts;

    #[async_trait::async_trait]
    impl CartReader for NoCarts {
        async fn get(&self, cart_id: &str) -> CustomResult<CartSnapshot, CartReadError> {
            Err(CartReadError::NotFound {
                cart_id: cart_id.to_string(),
            }
            .into())
        }
    }

    fn params() -> ConnectorParams {
        ConnectorParams {
            base_url: "https://api.example.com".to_string(),
            merchant_id: Secret::new("merchant_1".to_string()),
            secret_key: Secret::new("s3cr3t".to_string()),
            return_url: "https://shop.example.com/return".to_string(),
        }
    }

    fn test_router() -> Router {
        let config = Config {
            server: Server {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            log: Log::default(),
            proxy: Proxy::default(),
            order_module: OrderModule {
                base_url: "http://orders.internal".to_string(),
            },
            connectors: Connectors {
                ottu: params(),
                upayments: params(),
            },
        };
        create_router(AppState::new(Arc::new(config), Arc::new(NoCarts)))
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn webhook_for_unknown_provider_is_404() {
        let response = test_router()
            .oneshot(
                Request::post("/hooks/payment/stripe")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unsigned_ottu_webhook_is_401() {
        let payload = serde_json::json!({
            "merchant_reference": "order_42",
            "status": "PAID",
            "amount": "150.00",
            "currency": "USD",
            "reference_number": "ref_990",
        });
        let response = test_router()
            .oneshot(
                Request::post("/hooks/payment/ottu")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn upayments_webhook_normalizes_without_signature() {
        let payload = serde_json::json!({
            "order_id": "order_42",
            "status": "paid",
            "amount": "100.00",
            "currency": "USD",
            "track_id": "track_5",
        });
        let response = test_router()
            .oneshot(
                Request::post("/hooks/payment/upayments")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let details: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(details["event_type"], "captured");
        assert_eq!(details["merchant_reference"], "order_42");
        assert_eq!(details["amount"], 10000);
    }

    #[tokio::test]
    async fn initiate_with_unknown_cart_is_404() {
        let payload = serde_json::json!({
            "session_id": "order_42",
            "cart_id": "cart_9",
            "connector": "ottu",
        });
        let response = test_router()
            .oneshot(
                Request::post("/payments/initiate")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn upayments_cancel_is_501() {
        let payload = serde_json::json!({
            "session_id": "order_42",
            "connector": "upayments",
            "provider_reference": "track_5",
        });
        let response = test_router()
            .oneshot(
                Request::post("/payments/void")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn non_positive_refund_is_rejected() {
        let payload = serde_json::json!({
            "session_id": "order_42",
            "connector": "ottu",
            "refund_id": "refund_1",
            "amount": 0,
            "currency": "USD",
        });
        let response = test_router()
            .oneshot(
                Request::post("/payments/refund")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
