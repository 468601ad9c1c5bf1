use crate::domain::gift_card::GiftCard;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct GiftCardRow {
    id: u64,
    amount: Decimal,
    sender: u64,
    receiver: u64,
    status: String,
    created_at: String,
    updated_at: String,
}

impl From<&GiftCard> for GiftCardRow {
    fn from(card: &GiftCard) -> Self {
        Self {
            id: card.id.0,
            amount: card.amount.value(),
            sender: card.sender.0,
            receiver: card.receiver.0,
            status: card.status.to_string(),
            created_at: card.created_at.to_rfc3339(),
            updated_at: card.updated_at.to_rfc3339(),
        }
    }
}

/// Writes gift cards as CSV rows.
///
/// The header `id,amount,sender,receiver,status,created_at,updated_at` is
/// emitted before the first row.
pub struct GiftCardWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> GiftCardWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes one card and flushes, so rows show up as they are produced.
    pub fn write_card(&mut self, card: &GiftCard) -> Result<()> {
        self.writer.serialize(GiftCardRow::from(card))?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_cards<'a>(&mut self, cards: impl IntoIterator<Item = &'a GiftCard>) -> Result<()> {
        for card in cards {
            self.writer.serialize(GiftCardRow::from(card))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
