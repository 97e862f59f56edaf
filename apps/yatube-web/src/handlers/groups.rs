//! Community group API.

use actix_web::{HttpResponse, web};

use yatube_core::domain::{Group, NewGroup};
use yatube_shared::ApiResponse;
use yatube_shared::dto::{CreateGroupRequest, GroupResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{ApiError, ApiResult, AppError};
use crate::state::AppState;

fn group_response(group: Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title,
        slug: group.slug,
        description: group.description,
    }
}

/// GET /api/groups
pub async fn list_groups(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let groups = state.blog.group_choices().await?;
    let body: Vec<GroupResponse> = groups.into_iter().map(group_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/groups - administrators only
pub async fn create_group(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateGroupRequest>,
) -> ApiResult<HttpResponse> {
    if !identity.has_role("admin") {
        tracing::warn!(username = %identity.username, "Group creation without admin role");
        return Err(ApiError::App(AppError::Forbidden));
    }

    let req = body.into_inner();
    let group = state
        .blog
        .create_group(NewGroup::new(req.title, req.slug, req.description))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(group_response(group))))
}
