#![allow(dead_code)]

use gift_card::application::engine::GiftCardEngine;
use gift_card::domain::gift_card::{AccountId, Amount, GiftCard, GiftCardStatus, NewGiftCard};
use gift_card::domain::ports::GiftCardStore;
use gift_card::infrastructure::in_memory::InMemoryGiftCardStore;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "type, account, card, receiver, amount, status";

/// Writes a command file with the standard header followed by `rows`.
pub fn command_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// An engine together with a handle on its store for direct seeding.
pub fn engine_with_store() -> (GiftCardEngine, InMemoryGiftCardStore) {
    let store = InMemoryGiftCardStore::new();
    (GiftCardEngine::new(Box::new(store.clone())), store)
}

/// Stores a card and forces its status, bypassing the engine's rules.
pub async fn seed(
    store: &impl GiftCardStore,
    amount: Decimal,
    sender: u64,
    receiver: u64,
    status: GiftCardStatus,
) -> GiftCard {
    let card = store
        .create(NewGiftCard::new(
            Amount::new(amount).unwrap(),
            AccountId(sender),
            AccountId(receiver),
        ))
        .await
        .unwrap();
    store.update_status(card.id, status).await.unwrap();
    store.find_by_id(card.id).await.unwrap().unwrap()
}
