pub mod giftcode;
#[cfg(test)]
pub mod testing;

pub use giftcode::{GiftCodeApi, GiftCodeClient, LookupResult, RedeemResult};
