pub mod source;

pub use source::{derive_wallets, DerivedWallet};
