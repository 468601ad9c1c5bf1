//! Domain layer: the gift card entity and the persistence port it is stored through.

pub mod gift_card;
pub mod ports;
