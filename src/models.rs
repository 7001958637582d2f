pub mod catalog;
pub mod ledger;
pub mod location;
pub mod session;
