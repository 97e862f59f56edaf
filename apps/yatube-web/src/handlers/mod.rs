//! HTTP handlers and route configuration.

mod auth;
mod groups;
mod health;
mod posts;


use actix_web::{HttpRequest, HttpResponse, http::header, web};

use crate::middleware::error::{ApiError, AppError, AppResult};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                ApiError::BadRequest(err.to_string()).into()
            }))
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/groups", web::get().to(groups::list_groups))
            // Admin routes
            .route("/groups", web::post().to(groups::create_group)),
    )
    .service(
        web::scope("/auth")
            .route("/signup/", web::get().to(auth::signup_form))
            .route("/signup/", web::post().to(auth::signup))
            .route("/login/", web::get().to(auth::login_form))
            .route("/login/", web::post().to(auth::login))
            .route("/logout/", web::get().to(auth::logout)),
    )
    .route("/", web::get().to(posts::index))
    .route("/group/{slug}/", web::get().to(posts::group_posts))
    .route("/profile/{username}/", web::get().to(posts::profile))
    .route("/create/", web::get().to(posts::create_form))
    .route("/create/", web::post().to(posts::create))
    .route("/posts/{post_id}/", web::get().to(posts::post_detail))
    .route("/posts/{post_id}/edit/", web::get().to(posts::edit_form))
    .route("/posts/{post_id}/edit/", web::post().to(posts::edit));
}

/// Fallback for unmapped paths.
pub async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    tracing::debug!(path = req.path(), "No route");
    Err(AppError::NotFound(req.path().to_string()))
}

/// `302 Found` to `location`.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Percent-encode one URL path segment, e.g. a username.
pub(crate) fn path_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
