//! toman-domain
//!
//! Pure domain models (Category, Transaction, FrequentTransaction, Ledger, etc.).
//! No I/O, no storage. Only data types, amounts and calendar helpers.

pub mod calendar;
pub mod category;
pub mod common;
pub mod currency;
pub mod frequent;
pub mod ledger;
pub mod theme;
pub mod transaction;

pub use calendar::*;
pub use category::*;
pub use common::*;
pub use currency::*;
pub use frequent::*;
pub use ledger::*;
pub use theme::*;
pub use transaction::*;
