use crate::domain::gift_card::{AccountId, Amount, GiftCardId};

/// A request issued on behalf of an already authenticated account.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `sender` offers `amount` to `receiver`.
    Send {
        sender: AccountId,
        receiver: AccountId,
        amount: Amount,
    },
    /// `account` accepts or rejects `card`; `status` is the raw boundary code.
    Resolve {
        account: AccountId,
        card: GiftCardId,
        status: i64,
    },
}

impl Command {
    /// The identity the command is issued by.
    pub fn account(&self) -> AccountId {
        match self {
            Command::Send { sender, .. } => *sender,
            Command::Resolve { account, .. } => *account,
        }
    }
}
