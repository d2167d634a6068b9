pub mod hash;
pub mod signature;

pub use signature::{Fields, RequestSigner};
