use crate::error::GiftCardError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted gift card, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GiftCardId(pub u64);

impl fmt::Display for GiftCardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque account identifier handed over by the access boundary.
///
/// The engine never derives one; it only compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A strictly positive monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, GiftCardError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(GiftCardError::Validation(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = GiftCardError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolution state of a gift card.
///
/// The discriminants are the integer codes exchanged at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftCardStatus {
    Accepted = 0,
    Rejected = 1,
    Pending = 2,
}

impl GiftCardStatus {
    pub const ALL: [GiftCardStatus; 3] = [Self::Accepted, Self::Rejected, Self::Pending];

    pub fn code(self) -> i64 {
        self as i64
    }

    /// Only a pending card may still be accepted or rejected.
    pub fn can_update_status(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl TryFrom<i64> for GiftCardStatus {
    type Error = GiftCardError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Accepted),
            1 => Ok(Self::Rejected),
            2 => Ok(Self::Pending),
            other => Err(GiftCardError::InvalidStatus(other)),
        }
    }
}

impl fmt::Display for GiftCardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        };
        f.write_str(name)
    }
}

/// A gift card that has not been persisted yet and therefore has no id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGiftCard {
    pub amount: Amount,
    pub sender: AccountId,
    pub receiver: AccountId,
}

impl NewGiftCard {
    pub fn new(amount: Amount, sender: AccountId, receiver: AccountId) -> Self {
        Self {
            amount,
            sender,
            receiver,
        }
    }
}

/// A persisted credit offered by `sender` to `receiver`.
///
/// After creation only `status` and `updated_at` ever change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftCard {
    pub id: GiftCardId,
    pub amount: Amount,
    pub sender: AccountId,
    pub receiver: AccountId,
    pub status: GiftCardStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GiftCard {
    /// Materializes a freshly stored card in the initial `Pending` state.
    pub fn from_new(id: GiftCardId, card: NewGiftCard, now: DateTime<Utc>) -> Self {
        Self {
            id,
            amount: card.amount,
            sender: card.sender,
            receiver: card.receiver,
            status: GiftCardStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_receiver(&self, account: AccountId) -> bool {
        self.receiver == account
    }

    pub fn can_update_status(&self) -> bool {
        self.status.can_update_status()
    }

    /// Applies a status write; the store calls this without any transition check.
    pub fn set_status(&mut self, status: GiftCardStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(0.01)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(GiftCardError::Validation(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-5.0)),
            Err(GiftCardError::Validation(_))
        ));
    }

    #[test]
    fn test_amount_deserialization_rejects_non_positive() {
        let amount: Amount = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(amount.value(), dec!(12.5));
        assert!(serde_json::from_str::<Amount>("\"0\"").is_err());
    }

    #[test]
    fn test_status_codes() {
        for status in GiftCardStatus::ALL {
            assert_eq!(GiftCardStatus::try_from(status.code()).unwrap(), status);
        }
        assert_eq!(GiftCardStatus::Accepted.code(), 0);
        assert_eq!(GiftCardStatus::Rejected.code(), 1);
        assert_eq!(GiftCardStatus::Pending.code(), 2);
    }

    #[test]
    fn test_status_rejects_unknown_codes() {
        assert!(matches!(
            GiftCardStatus::try_from(99),
            Err(GiftCardError::InvalidStatus(99))
        ));
        assert!(matches!(
            GiftCardStatus::try_from(-1),
            Err(GiftCardError::InvalidStatus(-1))
        ));
    }

    #[test]
    fn test_only_pending_can_update() {
        assert!(GiftCardStatus::Pending.can_update_status());
        assert!(!GiftCardStatus::Accepted.can_update_status());
        assert!(!GiftCardStatus::Rejected.can_update_status());
    }

    #[test]
    fn test_from_new_starts_pending() {
        let now = Utc::now();
        let card = GiftCard::from_new(
            GiftCardId(7),
            NewGiftCard::new(Amount::new(dec!(100)).unwrap(), AccountId(1), AccountId(2)),
            now,
        );

        assert_eq!(card.id, GiftCardId(7));
        assert_eq!(card.status, GiftCardStatus::Pending);
        assert_eq!(card.created_at, now);
        assert_eq!(card.updated_at, now);
        assert!(card.is_receiver(AccountId(2)));
        assert!(!card.is_receiver(AccountId(1)));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&GiftCardStatus::Rejected).unwrap();
        assert_eq!(json, "\"rejected\"");
    }
}
