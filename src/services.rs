pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod conversion;
pub mod count_service;
pub use count_service::CountService;
pub mod export_service;
pub use export_service::ExportService;
