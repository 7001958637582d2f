// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Catalog ---
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::catalog::list_brands,
        handlers::catalog::list_categories,

        // --- Locations ---
        handlers::catalog::get_locations,

        // --- Sheets ---
        handlers::sheets::list_sheets,
        handlers::sheets::create_sheet,
        handlers::sheets::list_records,
        handlers::sheets::export_sheet,

        // --- Session ---
        handlers::session::get_session,
        handlers::session::select_sheet,
        handlers::session::select_location,

        // --- Counts ---
        handlers::counts::register_count,
    ),
    components(
        schemas(
            // --- Catalog ---
            models::catalog::Product,
            models::catalog::UnitKind,

            // --- Ledger ---
            models::ledger::Sheet,
            models::ledger::SheetSummary,
            models::ledger::CountRecord,

            // --- Locations / Session ---
            models::location::LocationLayout,
            models::location::AisleAdvance,
            models::session::FormSession,

            // --- Counts ---
            services::count_service::CountOutcome,
            services::count_service::RecordOrder,

            // --- Payloads ---
            handlers::sheets::CreateSheetPayload,
            handlers::sheets::CreateSheetResponse,
            handlers::session::SelectSheetPayload,
            handlers::session::SelectLocationPayload,
            handlers::counts::CountPayload,
            handlers::counts::CountResponse,
        )
    ),
    tags(
        (name = "Catalog", description = "Catálogo de Produtos (somente leitura)"),
        (name = "Locations", description = "Barracões e Ruas"),
        (name = "Sheets", description = "Fichas de Contagem, listagem e exportação"),
        (name = "Session", description = "Estado do Formulário de Contagem"),
        (name = "Counts", description = "Registro de Contagens (upsert)")
    )
)]
pub struct ApiDoc;
