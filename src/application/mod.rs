//! Application layer containing the gift card business rules.
//!
//! `GiftCardEngine` is the entry point for every operation. It validates
//! status transitions and ownership itself and only uses the store for
//! reads and unconditional writes.

pub mod command;
pub mod engine;
