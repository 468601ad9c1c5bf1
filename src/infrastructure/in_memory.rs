use crate::domain::gift_card::{AccountId, GiftCard, GiftCardId, GiftCardStatus, NewGiftCard};
use crate::domain::ports::{GiftCardPage, GiftCardStore, PageRequest, Role, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for gift cards.
///
/// Cloning shares the underlying map, so a test can seed one handle and give
/// another to the engine. Ids start at 1 and are never reused.
#[derive(Default, Clone)]
pub struct InMemoryGiftCardStore {
    cards: Arc<RwLock<BTreeMap<GiftCardId, GiftCard>>>,
    last_id: Arc<AtomicU64>,
}

impl InMemoryGiftCardStore {
    /// Creates a new, empty in-memory gift card store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GiftCardStore for InMemoryGiftCardStore {
    async fn create(&self, card: NewGiftCard) -> StoreResult<GiftCard> {
        let id = GiftCardId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let card = GiftCard::from_new(id, card, Utc::now());

        let mut cards = self.cards.write().await;
        cards.insert(id, card.clone());
        Ok(card)
    }

    async fn find_by_id(&self, id: GiftCardId) -> StoreResult<Option<GiftCard>> {
        let cards = self.cards.read().await;
        Ok(cards.get(&id).cloned())
    }

    async fn update_status(&self, id: GiftCardId, status: GiftCardStatus) -> StoreResult<()> {
        let mut cards = self.cards.write().await;
        if let Some(card) = cards.get_mut(&id) {
            card.set_status(status, Utc::now());
        }
        Ok(())
    }

    async fn list_by_role(
        &self,
        role: Role,
        account: AccountId,
        status: Option<GiftCardStatus>,
        page: PageRequest,
    ) -> StoreResult<GiftCardPage> {
        let cards = self.cards.read().await;
        let matching: Vec<&GiftCard> = cards
            .values()
            .filter(|card| {
                role.account_of(card) == account && status.is_none_or(|s| card.status == s)
            })
            .collect();

        let total = matching.len() as u64;
        let page_cards = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect();

        Ok(GiftCardPage {
            cards: page_cards,
            total,
        })
    }
}
