//! Amount types shared between the core and the gateway connectors.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
};

use common_enums::Currency;
use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal,
};

use crate::errors::ParsingError;

/// Amount convertor trait for connector
pub trait AmountConvertor: Send {
    /// Output type for the connector
    type Output;
    /// helps in conversion of connector required amount type
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>>;

    /// helps in converting back connector required amount type to core minor unit
    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>>;
}

/// Connector required amount type
#[derive(Default, Debug, serde::Deserialize, serde::Serialize, Clone, Copy, PartialEq)]
pub struct StringMajorUnitForConnector;

impl AmountConvertor for StringMajorUnitForConnector {
    type Output = StringMajorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        amount.to_major_unit_as_string(currency)
    }

    fn convert_back(
        &self,
        amount: StringMajorUnit,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        amount.to_minor_unit_as_i64(currency)
    }
}

/// Connector required amount type
#[derive(Default, Debug, serde::Deserialize, serde::Serialize, Clone, Copy, PartialEq)]
pub struct MinorUnitForConnector;

impl AmountConvertor for MinorUnitForConnector {
    type Output = MinorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        _currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        Ok(amount)
    }
    fn convert_back(
        &self,
        amount: MinorUnit,
        _currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        Ok(amount)
    }
}

/// This Unit struct represents MinorUnit in which core amount works
#[derive(
    Default,
    Debug,
    serde::Deserialize,
    serde::Serialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
pub struct MinorUnit(i64);

impl MinorUnit {
    /// forms a new minor unit from amount
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// forms a new minor default unit i.e zero
    pub fn zero() -> Self {
        Self(0)
    }

    /// gets amount as i64 value
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked multiplication by a quantity, guarding against malformed
    /// cart input overflowing the line total.
    pub fn checked_mul_quantity(self, quantity: u16) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Checked addition for summing line totals.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction for computing the reconciliation difference.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Convert the amount to its major denomination based on Currency and return String
    fn to_major_unit_as_string(
        self,
        currency: Currency,
    ) -> Result<StringMajorUnit, error_stack::Report<ParsingError>> {
        let amount_decimal =
            Decimal::from_i64(self.0).ok_or(ParsingError::I64ToDecimalConversionFailure)?;

        let amount = if currency.is_zero_decimal_currency() {
            amount_decimal
        } else if currency.is_three_decimal_currency() {
            amount_decimal / Decimal::from(1000)
        } else {
            amount_decimal / Decimal::from(100)
        };
        let amount_f64 = amount
            .to_f64()
            .ok_or(ParsingError::FloatToDecimalConversionFailure)?;
        let amount_string = if currency.is_zero_decimal_currency() {
            amount_f64.to_string()
        } else if currency.is_three_decimal_currency() {
            format!("{amount_f64:.3}")
        } else {
            format!("{amount_f64:.2}")
        };
        Ok(StringMajorUnit::new(amount_string))
    }
}

impl Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for MinorUnit {
    type Output = Self;
    fn add(self, a2: Self) -> Self {
        Self(self.0 + a2.0)
    }
}

impl Sub for MinorUnit {
    type Output = Self;
    fn sub(self, a2: Self) -> Self {
        Self(self.0 - a2.0)
    }
}

impl Sum for MinorUnit {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self(0), |a, b| a + b)
    }
}

/// Major-unit amount rendered as a string with the currency's decimal
/// width, the form signatures and request bodies carry amounts in.
#[derive(Default, Debug, serde::Deserialize, serde::Serialize, Clone, PartialEq, Eq)]
pub struct StringMajorUnit(String);

impl StringMajorUnit {
    fn new(value: String) -> Self {
        Self(value)
    }

    /// Converts to minor unit as i64 from StringMajorUnit
    fn to_minor_unit_as_i64(
        &self,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        let amount_decimal = Decimal::from_str(&self.0).map_err(|e| {
            ParsingError::StringToDecimalConversionFailure {
                error: e.to_string(),
            }
        })?;

        let amount = if currency.is_zero_decimal_currency() {
            amount_decimal
        } else if currency.is_three_decimal_currency() {
            amount_decimal * Decimal::from(1000)
        } else {
            amount_decimal * Decimal::from(100)
        };
        let amount_i64 = amount
            .to_i64()
            .ok_or(ParsingError::DecimalToI64ConversionFailure)?;
        Ok(MinorUnit::new(amount_i64))
    }

    /// Get string amount from struct to be removed in future
    pub fn get_amount_as_string(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn two_decimal_currency_formatting() {
        let amount = StringMajorUnitForConnector
            .convert(MinorUnit::new(15000), Currency::USD)
            .unwrap();
        assert_eq!(amount.get_amount_as_string(), "150.00");
    }

    #[test]
    fn three_decimal_currency_formatting() {
        let amount = StringMajorUnitForConnector
            .convert(MinorUnit::new(15000), Currency::KWD)
            .unwrap();
        assert_eq!(amount.get_amount_as_string(), "15.000");
    }

    #[test]
    fn negative_amount_formatting() {
        let amount = StringMajorUnitForConnector
            .convert(MinorUnit::new(-3), Currency::USD)
            .unwrap();
        assert_eq!(amount.get_amount_as_string(), "-0.03");
    }

    #[test]
    fn major_unit_string_converts_back() {
        let amount = StringMajorUnitForConnector
            .convert(MinorUnit::new(14997), Currency::USD)
            .unwrap();
        let back = StringMajorUnitForConnector
            .convert_back(amount, Currency::USD)
            .unwrap();
        assert_eq!(back, MinorUnit::new(14997));
    }

    #[test]
    fn checked_line_total_overflow_is_detected() {
        assert!(MinorUnit::new(i64::MAX).checked_mul_quantity(2).is_none());
        assert_eq!(
            MinorUnit::new(500).checked_mul_quantity(3),
            Some(MinorUnit::new(1500))
        );
    }
}
