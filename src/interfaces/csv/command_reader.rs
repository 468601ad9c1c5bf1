use crate::application::command::Command;
use crate::domain::gift_card::{AccountId, Amount, GiftCardId};
use crate::error::{GiftCardError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Send,
    Resolve,
}

/// One raw row of a command file: `type, account, card, receiver, amount, status`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub r#type: CommandType,
    pub account: u64,
    pub card: Option<u64>,
    pub receiver: Option<u64>,
    pub amount: Option<Decimal>,
    pub status: Option<i64>,
}

fn required<T>(value: Option<T>, field: &str, kind: &str) -> Result<T> {
    value.ok_or_else(|| GiftCardError::Validation(format!("{kind} command requires `{field}`")))
}

impl TryFrom<CommandRecord> for Command {
    type Error = GiftCardError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        let account = AccountId(record.account);
        match record.r#type {
            CommandType::Send => Ok(Command::Send {
                sender: account,
                receiver: AccountId(required(record.receiver, "receiver", "send")?),
                amount: Amount::new(required(record.amount, "amount", "send")?)?,
            }),
            CommandType::Resolve => Ok(Command::Resolve {
                account,
                card: GiftCardId(required(record.card, "card", "resolve")?),
                status: required(record.status, "status", "resolve")?,
            }),
        }
    }
}

/// Reads commands from a CSV source.
///
/// Whitespace is trimmed and trailing empty columns may be omitted.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads, deserializes and validates commands.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader.into_deserialize().map(|result| {
            let record: CommandRecord = result.map_err(GiftCardError::from)?;
            Command::try_from(record)
        })
    }
}
