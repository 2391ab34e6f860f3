use std::str::FromStr;

use domain_types::errors::ConnectorError;
use interfaces::connector_types::BoxedConnector;

use crate::connectors::{Ottu, Upayments};

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectorEnum {
    Ottu,
    Upayments,
}

pub struct ConnectorData {
    pub connector: BoxedConnector,
    pub connector_name: ConnectorEnum,
}

impl ConnectorData {
    pub fn get_connector_by_name(name: &str) -> Result<Self, error_stack::Report<ConnectorError>> {
        let connector_name =
            ConnectorEnum::from_str(name).map_err(|_| ConnectorError::InvalidConnectorName)?;
        Ok(Self::get_connector(connector_name))
    }

    pub fn get_connector(connector_name: ConnectorEnum) -> Self {
        let connector: BoxedConnector = match connector_name {
            ConnectorEnum::Ottu => Box::new(Ottu::new()),
            ConnectorEnum::Upayments => Box::new(Upayments::new()),
        };
        Self {
            connector,
            connector_name,
        }
    }
}

/// Pairs a parsed provider response with the router data it answers,
/// for the `TryFrom` conversions in the connector transformers.
pub struct ResponseRouterData<Response, RouterData> {
    pub response: Response,
    pub router_data: RouterData,
    pub http_code: u16,
}
