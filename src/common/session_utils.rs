// src/common/session_utils.rs

use std::sync::MutexGuard;

use crate::{common::error::AppError, config::AppState, models::session::FormSession};

// ---
// Helper: acesso à sessão do formulário
// ---
/// Trava a sessão do formulário. Deve ser adquirida antes de qualquer
/// operação do `CountService` que também grave o arquivo.
pub(crate) fn lock_session(app_state: &AppState) -> Result<MutexGuard<'_, FormSession>, AppError> {
    app_state
        .session
        .lock()
        .map_err(|_| anyhow::anyhow!("sessão do formulário envenenada").into())
}

/// Sessão atual, já sem a ficha selecionada se ela não existir mais.
pub(crate) fn resolved_session(app_state: &AppState) -> Result<FormSession, AppError> {
    let mut session = lock_session(app_state)?;
    let sheets = app_state.count_service.list_sheets()?;
    let resolved = session.clone().resolved(|id| sheets.iter().any(|s| s.id == id));
    if resolved != *session {
        tracing::info!("Ficha selecionada não existe mais; nenhuma ficha selecionada");
        *session = resolved.clone();
    }
    Ok(resolved)
}
