use crate::domain::gift_card::{AccountId, GiftCard, GiftCardId, GiftCardStatus, NewGiftCard};
use crate::domain::ports::{GiftCardPage, GiftCardStore, PageRequest, Role, StoreResult};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for gift card rows, keyed by id.
pub const CF_GIFT_CARDS: &str = "gift_cards";
/// Column Family indexing cards by sender (`sender ++ id`).
pub const CF_BY_SENDER: &str = "by_sender";
/// Column Family indexing cards by receiver (`receiver ++ id`).
pub const CF_BY_RECEIVER: &str = "by_receiver";
/// Column Family for store metadata such as the id sequence.
pub const CF_META: &str = "meta";

const LAST_ID_KEY: &[u8] = b"last_id";

/// A persistent store implementation using RocksDB.
///
/// Cards are stored as JSON under their big-endian id, so iteration order is
/// id order. The role indexes hold `account ++ id` keys with empty values and
/// are scanned by prefix when listing.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    id_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that all required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_GIFT_CARDS, CF_BY_SENDER, CF_BY_RECEIVER, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;
        tracing::debug!("opened RocksDB gift card store");

        Ok(Self {
            db: Arc::new(db),
            id_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &'static str) -> StoreResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or(StoreError::MissingColumnFamily(name))
    }

    fn index_cf(&self, role: Role) -> StoreResult<&ColumnFamily> {
        match role {
            Role::Sender => self.cf(CF_BY_SENDER),
            Role::Receiver => self.cf(CF_BY_RECEIVER),
        }
    }

    fn put_card(&self, card: &GiftCard) -> StoreResult<()> {
        let value = serde_json::to_vec(card)?;
        self.db
            .put_cf(self.cf(CF_GIFT_CARDS)?, card.id.0.to_be_bytes(), value)?;
        Ok(())
    }

    fn load_card(&self, id: GiftCardId) -> StoreResult<Option<GiftCard>> {
        match self.db.get_cf(self.cf(CF_GIFT_CARDS)?, id.0.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Reads the id sequence. Callers persist the bumped value together with
    /// the row it was allocated for.
    fn last_id(&self) -> StoreResult<u64> {
        match self.db.get_cf(self.cf(CF_META)?, LAST_ID_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Backend("corrupted gift card id sequence".to_string())
                })?;
                Ok(u64::from_be_bytes(raw))
            }
            None => Ok(0),
        }
    }
}

fn index_key(account: AccountId, id: GiftCardId) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&account.0.to_be_bytes());
    key[8..].copy_from_slice(&id.0.to_be_bytes());
    key
}

fn id_from_index_key(key: &[u8]) -> StoreResult<GiftCardId> {
    let raw: [u8; 8] = key
        .get(8..16)
        .and_then(|tail| tail.try_into().ok())
        .ok_or_else(|| StoreError::Backend("malformed index key".to_string()))?;
    Ok(GiftCardId(u64::from_be_bytes(raw)))
}

#[async_trait]
impl GiftCardStore for RocksDBStore {
    async fn create(&self, card: NewGiftCard) -> StoreResult<GiftCard> {
        let _guard = self.id_lock.lock().await;
        let next = self.last_id()? + 1;
        let id = GiftCardId(next);
        let card = GiftCard::from_new(id, card, Utc::now());

        // Row, both index entries and the sequence land together or not at all.
        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_GIFT_CARDS)?, id.0.to_be_bytes(), serde_json::to_vec(&card)?);
        batch.put_cf(self.cf(CF_BY_SENDER)?, index_key(card.sender, id), b"");
        batch.put_cf(self.cf(CF_BY_RECEIVER)?, index_key(card.receiver, id), b"");
        batch.put_cf(self.cf(CF_META)?, LAST_ID_KEY, next.to_be_bytes());
        self.db.write(batch)?;

        Ok(card)
    }

    async fn find_by_id(&self, id: GiftCardId) -> StoreResult<Option<GiftCard>> {
        self.load_card(id)
    }

    async fn update_status(&self, id: GiftCardId, status: GiftCardStatus) -> StoreResult<()> {
        if let Some(mut card) = self.load_card(id)? {
            card.set_status(status, Utc::now());
            self.put_card(&card)?;
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
        let prefix = account.0.to_be_bytes();
        let iter = self.db.iterator_cf(
            self.index_cf(role)?,
            IteratorMode::From(&prefix, Direction::Forward),
        );

        let (start, end) = (page.offset(), page.offset().saturating_add(page.limit()));
        let mut result = GiftCardPage::default();
        let mut matched = 0usize;

        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            let id = id_from_index_key(&key)?;
            let card = self.load_card(id)?.ok_or_else(|| {
                StoreError::Backend(format!("index entry for missing gift card {id}"))
            })?;
            if status.is_some_and(|s| card.status != s) {
                continue;
            }
            if (start..end).contains(&matched) {
                result.cards.push(card);
            }
            matched += 1;
        }
        result.total = matched as u64;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gift_card::Amount;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn new_card(sender: u64, receiver: u64) -> NewGiftCard {
        NewGiftCard::new(
            Amount::new(dec!(25.5)).unwrap(),
            AccountId(sender),
            AccountId(receiver),
        )
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        for cf in [CF_GIFT_CARDS, CF_BY_SENDER, CF_BY_RECEIVER, CF_META] {
            assert!(store.db.cf_handle(cf).is_some());
        }
    }

    #[tokio::test]
    async fn test_rocksdb_create_and_find() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let first = store.create(new_card(1, 2)).await.unwrap();
        let second = store.create(new_card(1, 2)).await.unwrap();
        assert_eq!(first.id, GiftCardId(1));
        assert_eq!(second.id, GiftCardId(2));

        let retrieved = store.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(retrieved, first);
        assert!(store.find_by_id(GiftCardId(3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_id_sequence_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.create(new_card(1, 2)).await.unwrap();
        }

        let store = RocksDBStore::open(dir.path()).unwrap();
        let card = store.create(new_card(1, 2)).await.unwrap();
        assert_eq!(card.id, GiftCardId(2));
        assert!(store.find_by_id(GiftCardId(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_update_status() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();
        let card = store.create(new_card(1, 2)).await.unwrap();

        store
            .update_status(card.id, GiftCardStatus::Rejected)
            .await
            .unwrap();

        let retrieved = store.find_by_id(card.id).await.unwrap().unwrap();
        assert_eq!(retrieved.status, GiftCardStatus::Rejected);
        assert_eq!(retrieved.amount, card.amount);
    }

    #[tokio::test]
    async fn test_rocksdb_list_by_role() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        // Account 1 receives ids 1..=3; account 256 shares no key prefix with it.
        for _ in 0..3 {
            store.create(new_card(9, 1)).await.unwrap();
        }
        store.create(new_card(1, 256)).await.unwrap();
        store
            .update_status(GiftCardId(3), GiftCardStatus::Accepted)
            .await
            .unwrap();

        let page = store
            .list_by_role(Role::Receiver, AccountId(1), None, PageRequest::first(2))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        let ids: Vec<_> = page.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![GiftCardId(1), GiftCardId(2)]);

        let accepted = store
            .list_by_role(
                Role::Receiver,
                AccountId(1),
                Some(GiftCardStatus::Accepted),
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(accepted.total, 1);
        assert_eq!(accepted.cards[0].id, GiftCardId(3));

        let sent = store
            .list_by_role(Role::Sender, AccountId(1), None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(sent.total, 1);
        assert_eq!(sent.cards[0].receiver, AccountId(256));
    }

    #[tokio::test]
    async fn test_rocksdb_created_card_listed_by_both_roles_after_reopen() {
        let dir = tempdir().unwrap();
        let created = {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.create(new_card(7, 8)).await.unwrap()
        };

        let store = RocksDBStore::open(dir.path()).unwrap();
        let sent = store
            .list_by_role(Role::Sender, AccountId(7), None, PageRequest::default())
            .await
            .unwrap();
        let received = store
            .list_by_role(Role::Receiver, AccountId(8), None, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(sent.total, 1);
        assert_eq!(sent.cards, vec![created.clone()]);
        assert_eq!(received.total, 1);
        assert_eq!(received.cards, vec![created]);
        assert_eq!(store.last_id().unwrap(), 1);
    }
}
