//! Charge-item reconciliation.
//!
//! Providers charge the sum of the item list they are sent, while the
//! order module owns the authoritative total (which already folds in
//! shipping, rounding and cart-level discounts). This module maps cart
//! lines to charge items and, when the two amounts disagree, appends a
//! synthetic adjustment item so that the itemized sum equals the
//! authoritative total exactly.

use common_utils::{consts::AMOUNT_DIFFERENCE_ITEM_ID, errors::CustomResult, types::MinorUnit};
use domain_types::{
    cart::LineItem,
    connector_types::ChargeItem,
    errors::ReconciliationError,
};

/// Build the provider-ready charge-item list for `authoritative_total`.
///
/// Items map 1:1 in input order; no item is ever dropped. The
/// adjustment item is present iff the itemized sum differs from the
/// total, and its price may be negative (discounts exceeding the
/// itemized amount). Post-condition: the line totals sum to
/// `authoritative_total` in the same minor-unit precision.
pub fn reconcile(
    authoritative_total: MinorUnit,
    items: &[LineItem],
) -> CustomResult<Vec<ChargeItem>, ReconciliationError> {
    let mut charge_items: Vec<ChargeItem> = items.iter().map(ChargeItem::from).collect();

    let mut itemized_total = MinorUnit::zero();
    for item in &charge_items {
        itemized_total = itemized_total
            .checked_add(item.line_total()?)
            .ok_or(ReconciliationError::AmountOverflow)?;
    }

    let diff = authoritative_total
        .checked_sub(itemized_total)
        .ok_or(ReconciliationError::AmountOverflow)?;

    if !diff.is_zero() {
        charge_items.push(ChargeItem {
            id: AMOUNT_DIFFERENCE_ITEM_ID.to_string(),
            description: "Order total adjustment".to_string(),
            unit_price: diff,
            quantity: 1,
            image_url: None,
        });
    }

    Ok(charge_items)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use proptest::prelude::*;

    use super::*;

    fn line(id: &str, unit_price: i64, quantity: u16) -> LineItem {
        LineItem {
            id: id.to_string(),
            title: format!("Item {id}"),
            unit_price: MinorUnit::new(unit_price),
            quantity,
            thumbnail: None,
        }
    }

    fn summed(items: &[ChargeItem]) -> MinorUnit {
        items
            .iter()
            .map(|i| i.line_total().unwrap())
            .fold(MinorUnit::zero(), |a, b| a + b)
    }

    #[test]
    fn matching_total_appends_no_adjustment() {
        // 150.00 split across two lines that sum to 150.00.
        let items = vec![line("sku_1", 5000, 2), line("sku_2", 5000, 1)];
        let reconciled = reconcile(MinorUnit::new(15000), &items).unwrap();

        assert_eq!(reconciled.len(), 2);
        assert!(reconciled.iter().all(|i| !i.is_adjustment()));
        assert_eq!(summed(&reconciled), MinorUnit::new(15000));
    }

    #[test]
    fn rounding_difference_appends_negative_adjustment() {
        // Items sum to 150.00 but the order total is 149.97.
        let items = vec![line("sku_1", 5000, 3)];
        let reconciled = reconcile(MinorUnit::new(14997), &items).unwrap();

        assert_eq!(reconciled.len(), 2);
        let adjustment = reconciled.last().unwrap();
        assert!(adjustment.is_adjustment());
        assert_eq!(adjustment.unit_price, MinorUnit::new(-3));
        assert_eq!(adjustment.quantity, 1);
        assert_eq!(summed(&reconciled), MinorUnit::new(14997));
    }

    #[test]
    fn shipping_difference_appends_positive_adjustment() {
        let items = vec![line("sku_1", 2500, 1)];
        let reconciled = reconcile(MinorUnit::new(3000), &items).unwrap();

        assert_eq!(reconciled.last().unwrap().unit_price, MinorUnit::new(500));
        assert_eq!(summed(&reconciled), MinorUnit::new(3000));
    }

    #[test]
    fn empty_cart_is_one_adjustment_item() {
        let reconciled = reconcile(MinorUnit::new(999), &[]).unwrap();
        assert_eq!(reconciled.len(), 1);
        assert!(reconciled[0].is_adjustment());
        assert_eq!(summed(&reconciled), MinorUnit::new(999));
    }

    #[test]
    fn item_order_is_preserved() {
        let items = vec![line("z", 100, 1), line("a", 200, 1), line("m", 300, 1)];
        let reconciled = reconcile(MinorUnit::new(600), &items).unwrap();
        let ids: Vec<&str> = reconciled.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn overflowing_line_total_is_rejected() {
        let items = vec![line("sku_1", i64::MAX, 2)];
        assert!(reconcile(MinorUnit::new(100), &items).is_err());
    }

    proptest! {
        // The central financial invariant: whatever the cart looks
        // like, the reconciled items sum to the authoritative total.
        #[test]
        fn reconciled_sum_equals_authoritative_total(
            total in -1_000_000_000i64..1_000_000_000i64,
            prices in prop::collection::vec((0i64..1_000_000, 1u16..20), 0..8),
        ) {
            let items: Vec<LineItem> = prices
                .iter()
                .enumerate()
                .map(|(idx, (price, qty))| line(&format!("sku_{idx}"), *price, *qty))
                .collect();

            let reconciled = reconcile(MinorUnit::new(total), &items).unwrap();
            prop_assert_eq!(summed(&reconciled), MinorUnit::new(total));
            // No input item is dropped.
            prop_assert!(reconciled.len() >= items.len());
            prop_assert!(reconciled.len() <= items.len() + 1);
        }
    }
}
