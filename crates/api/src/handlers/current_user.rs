use axum::{
    extract::{Extension, State},
    Json,
};
use std::sync::Arc;
use ticketdesk_core::{AppState, AuthIdentity};
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::user_dto::CurrentUserResponse;
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "The signed-in user and their tickets", body = CurrentUserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User no longer exists")
    ),
    security(("bearerAuth" = [])),
    tag = "User"
)]
pub async fn current_user_details(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let me = state.users.current_user(identity.user_id)?;
    info!("Fetched user data for user_id: {}", identity.user_id);
    Ok(Json(me))
}
