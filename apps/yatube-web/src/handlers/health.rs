//! Health check endpoint.

use actix_web::{HttpResponse, web};

use yatube_core::ports::BaseRepository;
use yatube_shared::dto::HealthResponse;

use crate::state::AppState;

/// Health check endpoint - reports whether the entity store answers.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_ok = store_answers(&state).await;
    if !store_ok {
        tracing::warn!("Health check: entity store unavailable");
    }

    let response = HealthResponse {
        status: if store_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}

async fn store_answers(state: &AppState) -> bool {
    #[cfg(feature = "postgres")]
    if let Some(db) = &state.db {
        return db.ping().await.is_ok();
    }

    state.groups.count().await.is_ok()
}
