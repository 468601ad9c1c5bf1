use super::command::Command;
use crate::domain::gift_card::{AccountId, Amount, GiftCard, GiftCardId, GiftCardStatus, NewGiftCard};
use crate::domain::ports::{GiftCardPage, GiftCardStoreBox, PageRequest, Role};
use crate::error::{GiftCardError, Result};
use tracing::{debug, info, warn};

/// Owns the gift card lifecycle: creation, resolution and role-scoped listing.
///
/// The engine keeps no state besides its store and trusts the `AccountId`
/// it is handed for every call. It is `Send + Sync` and can be shared behind
/// an `Arc`. Each mutation is one read followed by at most one write with no
/// lock held in between, so concurrent resolutions of the same card race and
/// the store's last write wins.
pub struct GiftCardEngine {
    store: GiftCardStoreBox,
}

impl GiftCardEngine {
    /// Creates a new `GiftCardEngine` backed by `store`.
    pub fn new(store: GiftCardStoreBox) -> Self {
        Self { store }
    }

    /// Creates a `Pending` card from `sender` to `receiver`.
    ///
    /// Account existence is not checked here; self-gifting is allowed.
    pub async fn create_gift_card(
        &self,
        amount: Amount,
        sender: AccountId,
        receiver: AccountId,
    ) -> Result<GiftCard> {
        let card = self
            .store
            .create(NewGiftCard::new(amount, sender, receiver))
            .await?;
        info!(card = %card.id, %sender, %receiver, %amount, "gift card created");
        Ok(card)
    }

    pub async fn find_gift_card(&self, id: GiftCardId) -> Result<Option<GiftCard>> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Resolves a card on behalf of `requester`.
    ///
    /// Checks run in order: the card exists, `requester` is its receiver,
    /// `status_code` names a status, and the move leaves `Pending` for
    /// `Accepted` or `Rejected`. Returns the card as it reads after the write.
    pub async fn update_status(
        &self,
        id: GiftCardId,
        status_code: i64,
        requester: AccountId,
    ) -> Result<GiftCard> {
        let card = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(GiftCardError::NotFound(id))?;

        if !card.is_receiver(requester) {
            warn!(card = %id, account = %requester, "status update by non-receiver");
            return Err(GiftCardError::Unauthorized {
                account: requester,
                card: id,
            });
        }

        let target = GiftCardStatus::try_from(status_code)?;
        if !card.can_update_status() || target == GiftCardStatus::Pending {
            warn!(card = %id, from = %card.status, to = %target, "rejected status transition");
            return Err(GiftCardError::InvalidTransition {
                card: id,
                from: card.status,
                to: target,
            });
        }

        self.store.update_status(id, target).await?;
        info!(card = %id, status = %target, "gift card resolved");

        // Re-read so the caller sees the store's timestamp.
        self.store
            .find_by_id(id)
            .await?
            .ok_or(GiftCardError::NotFound(id))
    }

    /// Cards received by `account`, optionally restricted to one status code.
    pub async fn list_received(
        &self,
        account: AccountId,
        status_filter: Option<i64>,
        page: PageRequest,
    ) -> Result<GiftCardPage> {
        self.list(Role::Receiver, account, status_filter, page).await
    }

    /// Cards sent by `account`, optionally restricted to one status code.
    pub async fn list_sent(
        &self,
        account: AccountId,
        status_filter: Option<i64>,
        page: PageRequest,
    ) -> Result<GiftCardPage> {
        self.list(Role::Sender, account, status_filter, page).await
    }

    async fn list(
        &self,
        role: Role,
        account: AccountId,
        status_filter: Option<i64>,
        page: PageRequest,
    ) -> Result<GiftCardPage> {
        let status = status_filter.map(GiftCardStatus::try_from).transpose()?;
        debug!(?role, %account, ?status, ?page, "listing gift cards");
        Ok(self.store.list_by_role(role, account, status, page).await?)
    }

    /// Runs a single batch command and returns the card it affected.
    pub async fn execute(&self, command: Command) -> Result<GiftCard> {
        match command {
            Command::Send {
                sender,
                receiver,
                amount,
            } => self.create_gift_card(amount, sender, receiver).await,
            Command::Resolve {
                account,
                card,
                status,
            } => self.update_status(card, status, account).await,
        }
    }
}
