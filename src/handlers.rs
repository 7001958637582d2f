pub mod catalog;
pub mod counts;
pub mod session;
pub mod sheets;
