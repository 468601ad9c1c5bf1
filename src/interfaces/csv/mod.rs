//! CSV adapters for the batch command file and the gift card output.

pub mod command_reader;
pub mod gift_card_writer;
