//! Per-flow integration contract implemented by every connector.

use common_utils::{
    errors::CustomResult,
    masking::Maskable,
    request::{Method, Request, RequestBuilder, RequestContent},
};
use domain_types::{
    errors::ConnectorError,
    router_data::ErrorResponse,
    router_data_v2::RouterDataV2,
};

/// HTTP response of a gateway as seen by the connectors.
#[derive(Clone, Debug)]
pub struct Response {
    pub response: bytes::Bytes,
    pub status_code: u16,
}

/// One gateway flow for one connector: how to build the outbound
/// request and how to fold the provider's answer back into the
/// [`RouterDataV2`].
///
/// `build_request_v2` returning `Ok(None)` means the flow needs no
/// provider call (hosted-checkout capture bookkeeping); the executor
/// then echoes the input. Connectors without an endpoint for a flow
/// override `build_request_v2` to return
/// [`ConnectorError::NotImplemented`] so unsupported operations never
/// silently succeed.
pub trait ConnectorIntegrationV2<Flow, ResourceCommonData, Req, Resp>: Send + Sync {
    fn get_headers(
        &self,
        _req: &RouterDataV2<Flow, ResourceCommonData, Req, Resp>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(vec![])
    }

    fn get_http_method(&self) -> Method {
        Method::Post
    }

    fn get_url(
        &self,
        _req: &RouterDataV2<Flow, ResourceCommonData, Req, Resp>,
    ) -> CustomResult<String, ConnectorError> {
        Err(ConnectorError::FailedToObtainIntegrationUrl.into())
    }

    fn get_request_body(
        &self,
        _req: &RouterDataV2<Flow, ResourceCommonData, Req, Resp>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        Ok(None)
    }

    fn build_request_v2(
        &self,
        req: &RouterDataV2<Flow, ResourceCommonData, Req, Resp>,
    ) -> CustomResult<Option<Request>, ConnectorError> {
        Ok(Some(
            RequestBuilder::new()
                .method(self.get_http_method())
                .url(&self.get_url(req)?)
                .headers(self.get_headers(req)?)
                .set_optional_body(self.get_request_body(req)?)
                .build(),
        ))
    }

    fn handle_response_v2(
        &self,
        _req: &RouterDataV2<Flow, ResourceCommonData, Req, Resp>,
        _res: Response,
    ) -> CustomResult<RouterDataV2<Flow, ResourceCommonData, Req, Resp>, ConnectorError> {
        Err(ConnectorError::NotImplemented("handle_response_v2".to_string()).into())
    }

    fn get_error_response_v2(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, ConnectorError> {
        Ok(ErrorResponse {
            code: common_utils::consts::NO_ERROR_CODE.to_string(),
            message: common_utils::consts::NO_ERROR_MESSAGE.to_string(),
            reason: String::from_utf8(res.response.to_vec()).ok(),
            status_code: res.status_code,
            connector_transaction_id: None,
        })
    }
}

pub type BoxedConnectorIntegrationV2<'a, Flow, ResourceCommonData, Req, Resp> =
    Box<&'a (dyn ConnectorIntegrationV2<Flow, ResourceCommonData, Req, Resp> + 'a)>;

/// Object-safe accessor used to pick the flow-specific vtable off a
/// boxed connector.
pub trait ConnectorIntegrationAnyV2<Flow, ResourceCommonData, Req, Resp> {
    fn get_connector_integration_v2(
        &self,
    ) -> BoxedConnectorIntegrationV2<'_, Flow, ResourceCommonData, Req, Resp>;
}

impl<S, Flow, ResourceCommonData, Req, Resp>
    ConnectorIntegrationAnyV2<Flow, ResourceCommonData, Req, Resp> for S
where
    S: ConnectorIntegrationV2<Flow, ResourceCommonData, Req, Resp>,
{
    fn get_connector_integration_v2(
        &self,
    ) -> BoxedConnectorIntegrationV2<'_, Flow, ResourceCommonData, Req, Resp> {
        Box::new(self)
    }
}
