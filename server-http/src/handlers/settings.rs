use crate::models::SectionsResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use extensions::registry::ExtensionCard;
use tracing::info;

/// GET /settings/:tab
pub async fn list_sections(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> Json<SectionsResponse> {
    info!("GET sections: tab={}", tab);

    let sections = state.registry.sections(&tab, Vec::new(), true).await;

    Json(SectionsResponse { tab, sections })
}

/// GET /settings/:tab/:section
pub async fn get_card(
    State(state): State<AppState>,
    Path((tab, section)): Path<(String, String)>,
) -> Result<Json<ExtensionCard>, StatusCode> {
    info!("GET card: tab={}, section={}", tab, section);

    state
        .registry
        .card(&tab, &section)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
