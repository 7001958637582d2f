pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod ledger_repo;
pub use ledger_repo::LedgerRepository;
