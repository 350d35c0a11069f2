//! toman-core
//!
//! Ledger rules and services for the Toman ledger.
//! Depends on toman-domain. Persistence goes through the [`KeyValueStore`] trait;
//! no file system or terminal access happens here.

pub mod aggregate;
pub mod category_service;
pub mod error;
pub mod form;
pub mod frequent_service;
pub mod inclusion;
pub mod storage;
pub mod store;
pub mod time;
pub mod transaction_service;
pub mod validator;

pub use aggregate::*;
pub use category_service::*;
pub use error::CoreError;
pub use form::*;
pub use frequent_service::*;
pub use inclusion::*;
pub use storage::*;
pub use store::*;
pub use time::*;
pub use transaction_service::*;
pub use validator::*;
