//! Authentication handlers: sign-up, login and logout pages.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use yatube_core::DomainError;
use yatube_core::domain::User;
use yatube_core::forms::{FormErrors, LoginForm, SignupForm, SignupInput};
use yatube_core::ports::TokenService;
use yatube_shared::dto::{LoginFormData, NextQuery, SignupFormData};

use crate::middleware::auth::{
    LOGIN_PATH, OptionalIdentity, expired_session_cookie, safe_next, session_cookie,
};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates::{FieldView, LoginTemplate, SignupTemplate, render};

fn signup_page(viewer: Option<String>, input: &SignupInput, errors: &FormErrors) -> SignupTemplate {
    SignupTemplate {
        viewer,
        // Passwords are never echoed back.
        fields: SignupForm::FIELDS
            .iter()
            .map(|field| {
                let value = if field.name == SignupForm::USERNAME.name {
                    input.username.as_str()
                } else {
                    ""
                };
                FieldView::new(field, value, errors)
            })
            .collect(),
    }
}

fn login_page(
    viewer: Option<String>,
    username: &str,
    next: Option<&str>,
    error: Option<String>,
) -> LoginTemplate {
    let action = match next {
        Some(next) => format!(
            "{LOGIN_PATH}?next={}",
            url::form_urlencoded::byte_serialize(next.as_bytes()).collect::<String>()
        ),
        None => LOGIN_PATH.to_string(),
    };
    let no_errors = FormErrors::default();

    LoginTemplate {
        viewer,
        fields: LoginForm::FIELDS
            .iter()
            .map(|field| {
                let value = if field.name == LoginForm::USERNAME.name { username } else { "" };
                FieldView::new(field, value, &no_errors)
            })
            .collect(),
        action,
        error,
    }
}

/// Issue a session for `user` and send them to `location`.
fn start_session(
    state: &AppState,
    token_service: &dyn TokenService,
    user: &User,
    location: &str,
) -> AppResult<HttpResponse> {
    let token = token_service
        .generate_token(user.id, &user.username, state.roles_for(&user.username))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, location))
        .cookie(session_cookie(token, token_service.expiration_seconds()))
        .finish())
}

/// GET /auth/signup/
pub async fn signup_form(viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    render(&signup_page(
        viewer.username(),
        &SignupInput::default(),
        &FormErrors::default(),
    ))
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    viewer: OptionalIdentity,
    form: web::Form<SignupFormData>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let input = SignupInput {
        username: form.username,
        password1: form.password1,
        password2: form.password2,
    };

    match state.accounts.register(&input).await {
        Ok(user) => start_session(&state, token_service.get_ref().as_ref(), &user, "/"),
        Err(DomainError::Validation(errors)) => {
            render(&signup_page(viewer.username(), &input, &errors))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /auth/login/
pub async fn login_form(
    viewer: OptionalIdentity,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    render(&login_page(viewer.username(), "", query.next.as_deref(), None))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    viewer: OptionalIdentity,
    query: web::Query<NextQuery>,
    form: web::Form<LoginFormData>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    match state.accounts.authenticate(&form.username, &form.password).await {
        Ok(user) => {
            tracing::info!(username = %user.username, "User logged in");
            let location = safe_next(query.next.as_deref());
            start_session(&state, token_service.get_ref().as_ref(), &user, location)
        }
        Err(DomainError::Unauthorized) => render(&login_page(
            viewer.username(),
            &form.username,
            query.next.as_deref(),
            Some(LoginForm::INVALID_LOGIN_MESSAGE.to_string()),
        )),
        Err(e) => Err(e.into()),
    }
}

/// GET /auth/logout/
pub async fn logout(viewer: OptionalIdentity) -> HttpResponse {
    if let Some(identity) = &viewer.0 {
        tracing::info!(username = %identity.username, "User logged out");
    }

    HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, "/"))
        .cookie(expired_session_cookie())
        .finish()
}
