use std::marker::PhantomData;

use crate::router_data::{ConnectorAuthType, ErrorResponse};

/// One in-flight gateway operation: common session data, credentials,
/// the flow-specific request, and the slot the response lands in.
#[derive(Debug, Clone)]
pub struct RouterDataV2<Flow, ResourceCommonData, FlowSpecificRequest, FlowSpecificResponse> {
    pub flow: PhantomData<Flow>,
    pub resource_common_data: ResourceCommonData,
    pub connector_auth_type: ConnectorAuthType,
    /// Contains flow-specific data required to construct a request and send it to the connector.
    pub request: FlowSpecificRequest,
    /// Contains flow-specific data that the connector responds with.
    pub response: Result<FlowSpecificResponse, ErrorResponse>,
}

impl<Flow, ResourceCommonData, FlowSpecificRequest, FlowSpecificResponse>
    RouterDataV2<Flow, ResourceCommonData, FlowSpecificRequest, FlowSpecificResponse>
{
    /// Builder method to set the response field
    pub fn set_response(mut self, response: Result<FlowSpecificResponse, ErrorResponse>) -> Self {
        self.response = response;
        self
    }
}
