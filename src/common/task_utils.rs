// src/common/task_utils.rs

use crate::{common::error::AppError, config::AppState};

// ---
// Helper: trabalho bloqueante fora das threads do runtime
// ---
/// Roda `job` em `spawn_blocking` com uma cópia do estado. As operações das
/// fichas leem, gravam e fazem fsync no arquivo de forma síncrona.
pub(crate) async fn run_blocking<T, F>(app_state: &AppState, job: F) -> Result<T, AppError>
where
    F: FnOnce(AppState) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let state = app_state.clone();
    tokio::task::spawn_blocking(move || job(state))
        .await
        .map_err(|e| anyhow::anyhow!("tarefa bloqueante interrompida: {}", e))?
}
