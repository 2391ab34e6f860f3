//! Outbound connector calls: a shared reqwest client and the generic
//! processing step that drives one gateway flow end to end.

use std::{str::FromStr, time::Duration};

use common_utils::{
    consts,
    errors::CustomResult,
    request::{Headers, Method, Request, RequestContent},
};
use domain_types::{
    errors::{ApiClientError, ConnectorError},
    router_data_v2::RouterDataV2,
    types::Proxy,
};
use error_stack::{report, ResultExt};
use interfaces::connector_integration_v2::{BoxedConnectorIntegrationV2, Response};
use once_cell::sync::OnceCell;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use tracing::field::Empty;

static NON_PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();
static PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();

fn get_client_builder(proxy_config: &Proxy) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(consts::REQUEST_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)?,
        );
    }
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url).change_context(ApiClientError::InvalidProxyConfiguration)?,
        );
    }

    Ok(client_builder)
}

fn get_base_client(proxy_config: &Proxy) -> CustomResult<Client, ApiClientError> {
    Ok(
        if proxy_config.http_url.is_none() && proxy_config.https_url.is_none() {
            &NON_PROXIED_CLIENT
        } else {
            &PROXIED_CLIENT
        }
        .get_or_try_init(|| {
            get_client_builder(proxy_config)?
                .build()
                .change_context(ApiClientError::ClientConstructionFailed)
        })?
        .clone(),
    )
}

fn construct_header_map(headers: Headers) -> CustomResult<HeaderMap, ApiClientError> {
    headers
        .into_iter()
        .try_fold(HeaderMap::new(), |mut header_map, (name, value)| {
            let header_name = HeaderName::from_str(&name)
                .change_context(ApiClientError::HeaderMapConstructionFailed)?;
            let is_sensitive = value.is_masked();
            let mut header_value = HeaderValue::from_str(&value.into_inner())
                .change_context(ApiClientError::HeaderMapConstructionFailed)?;
            header_value.set_sensitive(is_sensitive);
            header_map.append(header_name, header_value);
            Ok(header_map)
        })
}

async fn handle_response(
    response: reqwest::Response,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let status_code = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .change_context(ApiClientError::ResponseDecodingFailed)?;
    let response = Response {
        response: body,
        status_code,
    };
    Ok(if (200..300).contains(&status_code) {
        Ok(response)
    } else {
        Err(response)
    })
}

/// One outbound call to a gateway. The outer error is transport
/// failure; the inner `Result` separates 2xx responses from gateway
/// errors, both carrying the raw body. Requests are never retried.
pub async fn call_connector_api(
    proxy: &Proxy,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url = reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let client = get_base_client(proxy)?;
    let headers = construct_header_map(request.headers)?;

    let request = {
        let builder = match request.method {
            Method::Get => client.get(url),
            Method::Post => client.post(url),
            Method::Put => client.put(url),
            Method::Delete => client.delete(url),
        };
        let builder = match request.body {
            Some(RequestContent::Json(payload)) => builder.json(&payload),
            Some(RequestContent::FormUrlEncoded(payload)) => builder.form(&payload),
            None => builder,
        };
        builder.headers(headers)
    };

    let response = request.send().await.map_err(|error| {
        let api_error = if error.is_timeout() {
            ApiClientError::RequestTimeoutReceived
        } else {
            ApiClientError::RequestNotSent(error.to_string())
        };
        report!(api_error)
    })?;

    handle_response(response).await
}

/// Drives one connector flow: build the request, send it, fold the
/// answer back into the router data. A connector returning no request
/// means the flow needs no provider call and the input is echoed back
/// unchanged.
#[tracing::instrument(
    name = "execute_connector_processing_step",
    skip_all,
    fields(
        request.url = Empty,
        request.method = Empty,
        response.status_code = Empty,
        latency = Empty,
    )
)]
pub async fn execute_connector_processing_step<F, ResourceCommonData, Req, Resp>(
    proxy: &Proxy,
    connector: BoxedConnectorIntegrationV2<'_, F, ResourceCommonData, Req, Resp>,
    router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
) -> CustomResult<RouterDataV2<F, ResourceCommonData, Req, Resp>, ConnectorError> {
    let start = tokio::time::Instant::now();
    let connector_request = connector.build_request_v2(&router_data)?;

    let Some(request) = connector_request else {
        tracing::debug!("flow needs no connector call, echoing input");
        return Ok(router_data);
    };

    tracing::Span::current().record("request.url", tracing::field::display(&request.url));
    tracing::Span::current().record("request.method", tracing::field::display(request.method));

    let api_result = call_connector_api(proxy, request)
        .await
        .change_context(ConnectorError::ProcessingStepFailed(None))?;

    let result = match api_result {
        Ok(body) => {
            tracing::Span::current()
                .record("response.status_code", tracing::field::display(body.status_code));
            connector.handle_response_v2(&router_data, body)?
        }
        Err(body) => {
            tracing::Span::current()
                .record("response.status_code", tracing::field::display(body.status_code));
            let error_response = connector.get_error_response_v2(body)?;
            tracing::warn!(
                code = %error_response.code,
                status_code = error_response.status_code,
                "connector returned an error response"
            );
            router_data.set_response(Err(error_response))
        }
    };

    let elapsed = start.elapsed().as_secs_f64();
    tracing::Span::current().record("latency", elapsed);
    tracing::info!("outgoing connector request completed");
    Ok(result)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use common_utils::masking::{Mask, Maskable};

    use super::*;

    #[test]
    fn header_map_marks_masked_values_sensitive() {
        let headers: Headers = vec![
            ("Content-Type".to_string(), Maskable::new_normal("application/json".to_string())),
            ("Authorization".to_string(), "key_123".to_string().into_masked()),
        ];
        let header_map = construct_header_map(headers).unwrap();
        assert!(!header_map["content-type"].is_sensitive());
        assert!(header_map["authorization"].is_sensitive());
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let headers: Headers = vec![(
            "bad header\n".to_string(),
            Maskable::new_normal("value".to_string()),
        )];
        let err = construct_header_map(headers).unwrap_err();
        assert!(matches!(
            err.current_context(),
            ApiClientError::HeaderMapConstructionFailed
        ));
    }
}
