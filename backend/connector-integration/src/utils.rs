//! Helpers shared by the gateway connectors.

use common_enums::Currency;
use common_utils::{
    errors::CustomResult,
    types::{AmountConvertor, MinorUnit, StringMajorUnit},
};
use domain_types::{connector_types::ChargeItem, errors::ConnectorError};
use error_stack::ResultExt;

pub fn convert_amount(
    amount_convertor: &dyn AmountConvertor<Output = StringMajorUnit>,
    amount: MinorUnit,
    currency: Currency,
) -> CustomResult<StringMajorUnit, ConnectorError> {
    amount_convertor
        .convert(amount, currency)
        .change_context(ConnectorError::AmountConversionFailed)
}

pub fn convert_back_amount(
    amount_convertor: &dyn AmountConvertor<Output = StringMajorUnit>,
    amount: StringMajorUnit,
    currency: Currency,
) -> CustomResult<MinorUnit, ConnectorError> {
    amount_convertor
        .convert_back(amount, currency)
        .change_context(ConnectorError::AmountConversionFailed)
}

/// Serialize charge items for signing: the concatenation of
/// `item_id + quantity + price` per item, prices in major units with
/// the currency's decimal width. Signatures are computed over this
/// exact sequence, so callers must pass items in the provider's
/// required order.
pub fn serialize_items_for_signature(
    amount_convertor: &dyn AmountConvertor<Output = StringMajorUnit>,
    items: &[ChargeItem],
    currency: Currency,
) -> CustomResult<String, ConnectorError> {
    let mut serialized = String::new();
    for item in items {
        let price = convert_amount(amount_convertor, item.unit_price, currency)?;
        serialized.push_str(&item.id);
        serialized.push_str(&item.quantity.to_string());
        serialized.push_str(price.get_amount_as_string());
    }
    Ok(serialized)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use common_utils::types::StringMajorUnitForConnector;

    use super::*;

    fn item(id: &str, unit_price: i64, quantity: u16) -> ChargeItem {
        ChargeItem {
            id: id.to_string(),
            description: String::new(),
            unit_price: MinorUnit::new(unit_price),
            quantity,
            image_url: None,
        }
    }

    #[test]
    fn items_serialize_in_given_order() {
        let items = vec![item("sku_2", 5000, 1), item("sku_1", 2500, 2)];
        let serialized = serialize_items_for_signature(
            &StringMajorUnitForConnector,
            &items,
            Currency::USD,
        )
        .unwrap();
        assert_eq!(serialized, "sku_2150.00sku_1225.00");
    }
}
