//! Post pages: listings, detail, create and edit.

use actix_web::{HttpRequest, HttpResponse, web};

use yatube_core::DomainError;
use yatube_core::forms::{FormErrors, PostInput};
use yatube_core::services::{can_edit, page_number};
use yatube_shared::dto::{PageQuery, PostFormData};

use super::{path_segment, redirect};
use crate::middleware::auth::{OptionalIdentity, login_url};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates::{
    CreatePostTemplate, GroupListTemplate, IndexTemplate, PostDetailTemplate, ProfileTemplate,
    listing, render,
};

fn post_input(form: PostFormData) -> PostInput {
    PostInput {
        text: form.text,
        group: form.group,
    }
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state.blog.list_all();
    let number = page_number(query.page.as_deref());
    let page = state.blog.page(&feed, number, state.posts_per_page).await?;
    let (posts, paginator) = listing(page);

    render(&IndexTemplate {
        viewer: viewer.username(),
        posts,
        paginator,
    })
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (group, feed) = state.blog.list_by_group(&slug).await?;
    let number = page_number(query.page.as_deref());
    let page = state.blog.page(&feed, number, state.posts_per_page).await?;
    let (posts, paginator) = listing(page);

    render(&GroupListTemplate {
        viewer: viewer.username(),
        group,
        posts,
        paginator,
    })
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (author, feed) = state.blog.list_by_author(&username).await?;
    let number = page_number(query.page.as_deref());
    let page = state.blog.page(&feed, number, state.posts_per_page).await?;
    let post_count = page.total_count;
    let (posts, paginator) = listing(page);

    render(&ProfileTemplate {
        viewer: viewer.username(),
        author: author.username,
        post_count,
        posts,
        paginator,
    })
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let card = state.blog.get_post(post_id.into_inner()).await?;
    let author_post_count = state.blog.author_post_count(card.post.author_id).await?;
    let can_edit = can_edit(&viewer.actor(), &card.post);

    render(&PostDetailTemplate {
        viewer: viewer.username(),
        post: card.into(),
        author_post_count,
        can_edit,
    })
}

/// GET /create/
pub async fn create_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    if viewer.0.is_none() {
        return Ok(redirect(&login_url(req.path())));
    }

    let groups = state.blog.group_choices().await?;
    render(&CreatePostTemplate::new(
        viewer.username(),
        None,
        &PostInput::default(),
        groups,
        &FormErrors::default(),
    ))
}

/// POST /create/
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    let Some(identity) = &viewer.0 else {
        return Ok(redirect(&login_url(req.path())));
    };

    let input = post_input(form.into_inner());
    match state.blog.create_post(&identity.actor(), &input).await {
        Ok(_) => Ok(redirect(&format!(
            "/profile/{}/",
            path_segment(&identity.username)
        ))),
        Err(DomainError::Validation(errors)) => {
            let groups = state.blog.group_choices().await?;
            render(&CreatePostTemplate::new(
                viewer.username(),
                None,
                &input,
                groups,
                &errors,
            ))
        }
        Err(DomainError::PermissionDenied) => Ok(redirect(&login_url(req.path()))),
        Err(e) => Err(e.into()),
    }
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    if viewer.0.is_none() {
        return Ok(redirect(&login_url(req.path())));
    }

    let post = state.blog.find_post(post_id.into_inner()).await?;
    if !can_edit(&viewer.actor(), &post) {
        return Ok(redirect(&format!("/posts/{}/", post.id)));
    }

    let groups = state.blog.group_choices().await?;
    render(&CreatePostTemplate::new(
        viewer.username(),
        Some(post.id),
        &PostInput::new(post.text, post.group_id),
        groups,
        &FormErrors::default(),
    ))
}

/// POST /posts/{post_id}/edit/
pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    post_id: web::Path<i64>,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    if viewer.0.is_none() {
        return Ok(redirect(&login_url(req.path())));
    }

    let post_id = post_id.into_inner();
    let input = post_input(form.into_inner());
    match state.blog.edit_post(&viewer.actor(), post_id, &input).await {
        Ok(post) => Ok(redirect(&format!("/posts/{}/", post.id))),
        Err(DomainError::PermissionDenied) => Ok(redirect(&format!("/posts/{}/", post_id))),
        Err(DomainError::Validation(errors)) => {
            let groups = state.blog.group_choices().await?;
            render(&CreatePostTemplate::new(
                viewer.username(),
                Some(post_id),
                &input,
                groups,
                &errors,
            ))
        }
        Err(e) => Err(e.into()),
    }
}
