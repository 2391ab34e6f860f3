use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes accepted by the supported gateways.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Currency {
    AED,
    BHD,
    EGP,
    EUR,
    GBP,
    INR,
    JOD,
    JPY,
    KRW,
    #[default]
    KWD,
    OMR,
    QAR,
    SAR,
    TND,
    USD,
    VND,
}

impl Currency {
    /// Currencies with no minor unit, e.g. 1 JPY is the smallest amount.
    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(self, Self::JPY | Self::KRW | Self::VND)
    }

    /// Currencies whose minor unit is a thousandth of the major unit.
    pub fn is_three_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::BHD | Self::JOD | Self::KWD | Self::OMR | Self::TND
        )
    }

    pub fn number_of_digits_after_decimal_point(self) -> u8 {
        if self.is_zero_decimal_currency() {
            0
        } else if self.is_three_decimal_currency() {
            3
        } else {
            2
        }
    }
}

/// Status of a single payment attempt as tracked by the core.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttemptStatus {
    #[default]
    Pending,
    AuthenticationPending,
    Authorized,
    Charged,
    Failure,
    Voided,
    Expired,
}

impl AttemptStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Charged | Self::Failure | Self::Voided | Self::Expired
        )
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RefundStatus {
    #[default]
    Pending,
    Success,
    Failure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_decimal_widths() {
        assert_eq!(Currency::USD.number_of_digits_after_decimal_point(), 2);
        assert_eq!(Currency::KWD.number_of_digits_after_decimal_point(), 3);
        assert_eq!(Currency::JPY.number_of_digits_after_decimal_point(), 0);
    }

    #[test]
    fn terminal_statuses() {
        assert!(AttemptStatus::Failure.is_terminal());
        assert!(AttemptStatus::Expired.is_terminal());
        assert!(!AttemptStatus::Authorized.is_terminal());
    }
}
