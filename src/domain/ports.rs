use super::gift_card::{AccountId, GiftCard, GiftCardId, GiftCardStatus, NewGiftCard};
use crate::error::StoreError;
use async_trait::async_trait;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Page size used by callers that do not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The relationship of an account to a gift card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Sender,
    Receiver,
}

impl Role {
    pub fn account_of(self, card: &GiftCard) -> AccountId {
        match self {
            Role::Sender => card.sender,
            Role::Receiver => card.receiver,
        }
    }
}

/// A 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_size: u32,
    pub page_number: u32,
}

impl PageRequest {
    /// Page numbers that are absent or below 1 select the first page.
    pub fn new(page_size: u32, page_number: Option<i64>) -> Self {
        let page_number = match page_number {
            Some(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
            _ => 1,
        };
        Self {
            page_size,
            page_number,
        }
    }

    pub fn first(page_size: u32) -> Self {
        Self::new(page_size, None)
    }

    pub fn offset(&self) -> usize {
        (self.page_number as usize).saturating_sub(1).saturating_mul(self.page_size as usize)
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of gift cards along with the number of cards matching the query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GiftCardPage {
    pub cards: Vec<GiftCard>,
    pub total: u64,
}

/// Persistence capability consumed by the engine. Owns no business rules.
#[async_trait]
pub trait GiftCardStore: Send + Sync {
    /// Persists a new card as `Pending` and returns it with its assigned id.
    async fn create(&self, card: NewGiftCard) -> StoreResult<GiftCard>;

    async fn find_by_id(&self, id: GiftCardId) -> StoreResult<Option<GiftCard>>;

    /// Unconditionally overwrites the status and bumps `updated_at`.
    async fn update_status(&self, id: GiftCardId, status: GiftCardStatus) -> StoreResult<()>;

    /// Cards where `account` plays `role`, ordered by ascending id.
    ///
    /// A `status` filter restricts both the page and the total.
    async fn list_by_role(
        &self,
        role: Role,
        account: AccountId,
        status: Option<GiftCardStatus>,
        page: PageRequest,
    ) -> StoreResult<GiftCardPage>;
}

pub type GiftCardStoreBox = Box<dyn GiftCardStore>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_defaults_to_first_page() {
        assert_eq!(PageRequest::new(10, None).page_number, 1);
        assert_eq!(PageRequest::new(10, Some(0)).page_number, 1);
        assert_eq!(PageRequest::new(10, Some(-3)).page_number, 1);
        assert_eq!(PageRequest::new(10, Some(4)).page_number, 4);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(PageRequest::new(10, Some(1)).offset(), 0);
        assert_eq!(PageRequest::new(10, Some(3)).offset(), 20);
        assert_eq!(PageRequest::new(25, Some(2)).offset(), 25);
        assert_eq!(PageRequest::default().limit(), DEFAULT_PAGE_SIZE as usize);
    }
}
