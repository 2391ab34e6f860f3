//! Extension traits over foreign types.

use bytes::Bytes;
use error_stack::ResultExt;
use serde::de::DeserializeOwned;

use crate::errors::{CustomResult, ParsingError};

/// Deserialize wire payloads carried as raw bytes, attaching the target
/// type name to the failure report.
pub trait BytesExt {
    fn parse_struct<T: DeserializeOwned>(
        &self,
        type_name: &'static str,
    ) -> CustomResult<T, ParsingError>;
}

impl BytesExt for Bytes {
    fn parse_struct<T: DeserializeOwned>(
        &self,
        type_name: &'static str,
    ) -> CustomResult<T, ParsingError> {
        serde_json::from_slice::<T>(self)
            .change_context(ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| {
                format!("Unable to parse {type_name} from the response bytes")
            })
    }
}

impl BytesExt for [u8] {
    fn parse_struct<T: DeserializeOwned>(
        &self,
        type_name: &'static str,
    ) -> CustomResult<T, ParsingError> {
        serde_json::from_slice::<T>(self)
            .change_context(ParsingError::StructParseFailure(type_name))
            .attach_printable_lazy(|| {
                format!("Unable to parse {type_name} from the request bytes")
            })
    }
}
