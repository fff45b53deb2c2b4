pub mod catalog_service;
pub mod ledger_service;
pub mod spin_service;

pub use catalog_service::*;
pub use ledger_service::*;
pub use spin_service::*;
