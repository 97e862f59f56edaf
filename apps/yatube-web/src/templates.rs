//! Askama templates for the Yatube pages.
//!
//! Every page struct carries `viewer`, the username shown by `base.html`
//! (`None` for anonymous visitors).

use actix_web::{HttpResponse, http::header::ContentType};
use askama::Template;

use yatube_core::Page;
use yatube_core::domain::{Group, POST_PREVIEW_CHARS, PostCard};
use yatube_core::forms::{FieldKind, FieldSpec, FormErrors, PostForm, PostInput};

use crate::middleware::error::AppResult;

/// Render a template into a `200 OK` HTML response.
pub fn render<T: Template>(template: &T) -> AppResult<HttpResponse> {
    let body = template.render()?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

/// A post prepared for display.
#[derive(Debug)]
pub struct PostView {
    pub id: i64,
    pub text: String,
    pub preview: String,
    pub author: String,
    pub created: String,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
}

impl From<PostCard> for PostView {
    fn from(card: PostCard) -> Self {
        let preview: String = card.post.text.chars().take(POST_PREVIEW_CHARS).collect();
        Self {
            id: card.post.id,
            created: card.post.created_at.format("%d.%m.%Y %H:%M").to_string(),
            preview,
            text: card.post.text,
            author: card.author.username,
            group_title: card.group.as_ref().map(|g| g.title.clone()),
            group_slug: card.group.map(|g| g.slug),
        }
    }
}

/// Navigation links under a listing.
#[derive(Debug)]
pub struct Paginator {
    pub links: Vec<PageLink>,
    pub previous: Option<u64>,
    pub next: Option<u64>,
}

#[derive(Debug)]
pub struct PageLink {
    pub number: u64,
    pub current: bool,
}

impl Paginator {
    pub fn is_paginated(&self) -> bool {
        self.links.len() > 1
    }
}

/// Split a page of cards into display rows and navigation.
pub fn listing(page: Page<PostCard>) -> (Vec<PostView>, Paginator) {
    let paginator = Paginator {
        links: (1..=page.num_pages())
            .map(|number| PageLink {
                number,
                current: number == page.number,
            })
            .collect(),
        previous: page.previous_page_number(),
        next: page.next_page_number(),
    };
    let posts = page.items.into_iter().map(PostView::from).collect();
    (posts, paginator)
}

/// One input of a form, with its submitted value and errors.
#[derive(Debug)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub input_type: &'static str,
    pub required: bool,
    pub value: String,
    pub errors: Vec<String>,
}

impl FieldView {
    pub fn new(field: &FieldSpec, value: impl Into<String>, errors: &FormErrors) -> Self {
        let input_type = match field.kind {
            FieldKind::Text => "text",
            FieldKind::Choice => "select",
            FieldKind::Password => "password",
        };
        Self {
            name: field.name,
            label: field.label,
            help_text: field.help_text,
            input_type,
            required: field.required,
            value: value.into(),
            errors: errors.field(field.name).to_vec(),
        }
    }
}

/// An option of the group select.
#[derive(Debug)]
pub struct GroupChoice {
    pub id: i64,
    pub title: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexTemplate {
    pub viewer: Option<String>,
    pub posts: Vec<PostView>,
    pub paginator: Paginator,
}

#[derive(Template)]
#[template(path = "posts/group_list.html")]
pub struct GroupListTemplate {
    pub viewer: Option<String>,
    pub group: Group,
    pub posts: Vec<PostView>,
    pub paginator: Paginator,
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfileTemplate {
    pub viewer: Option<String>,
    pub author: String,
    pub post_count: u64,
    pub posts: Vec<PostView>,
    pub paginator: Paginator,
}

#[derive(Template)]
#[template(path = "posts/post_detail.html")]
pub struct PostDetailTemplate {
    pub viewer: Option<String>,
    pub post: PostView,
    pub author_post_count: u64,
    pub can_edit: bool,
}

/// Post create and edit form; `is_edit` switches the headings.
#[derive(Template)]
#[template(path = "posts/create_post.html")]
pub struct CreatePostTemplate {
    pub viewer: Option<String>,
    pub is_edit: bool,
    pub action: String,
    pub text: FieldView,
    pub group: FieldView,
    pub choices: Vec<GroupChoice>,
}

impl CreatePostTemplate {
    pub fn new(
        viewer: Option<String>,
        edit_post_id: Option<i64>,
        input: &PostInput,
        groups: Vec<Group>,
        errors: &FormErrors,
    ) -> Self {
        let selected = input.group.as_deref().map(str::trim).unwrap_or_default();
        let choices = groups
            .into_iter()
            .map(|g| GroupChoice {
                selected: g.id.to_string() == selected,
                id: g.id,
                title: g.title,
            })
            .collect();

        Self {
            viewer,
            is_edit: edit_post_id.is_some(),
            action: match edit_post_id {
                Some(id) => format!("/posts/{id}/edit/"),
                None => "/create/".to_string(),
            },
            text: FieldView::new(&PostForm::TEXT, input.text.clone(), errors),
            group: FieldView::new(&PostForm::GROUP, selected, errors),
            choices,
        }
    }
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupTemplate {
    pub viewer: Option<String>,
    pub fields: Vec<FieldView>,
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
    pub viewer: Option<String>,
    pub fields: Vec<FieldView>,
    /// Form target, carrying `next` along.
    pub action: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "core/404.html")]
pub struct NotFoundTemplate {
    pub viewer: Option<String>,
    pub path: String,
}

#[derive(Template)]
#[template(path = "core/403.html")]
pub struct ForbiddenTemplate {
    pub viewer: Option<String>,
}

#[derive(Template)]
#[template(path = "core/500.html")]
pub struct ServerErrorTemplate {
    pub viewer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use yatube_core::domain::{Post, User};

    fn card(text: &str) -> PostCard {
        PostCard {
            post: Post {
                id: 3,
                text: text.to_string(),
                created_at: Utc::now(),
                author_id: Uuid::new_v4(),
                group_id: Some(1),
            },
            author: User::new("auth", "hash"),
            group: Some(Group {
                id: 1,
                title: "Тестовая группа".to_string(),
                slug: "test-slug".to_string(),
                description: String::new(),
            }),
        }
    }

    #[test]
    fn test_post_view_from_card() {
        let view = PostView::from(card("Очень длинный текст тестового поста"));
        assert_eq!(view.preview, "Очень длинный т");
        assert_eq!(view.author, "auth");
        assert_eq!(view.group_slug.as_deref(), Some("test-slug"));
    }

    #[test]
    fn test_form_marks_selected_group() {
        let groups = vec![card("x").group.unwrap()];
        let form = CreatePostTemplate::new(
            Some("auth".to_string()),
            Some(3),
            &PostInput::new("text", Some(1)),
            groups,
            &FormErrors::default(),
        );
        assert!(form.is_edit);
        assert_eq!(form.action, "/posts/3/edit/");
        assert!(form.choices[0].selected);
        assert_eq!(form.text.input_type, "text");
        assert_eq!(form.group.input_type, "select");
    }

    #[test]
    fn test_index_renders_cards() {
        let page = Page {
            items: vec![card("Тестовый пост")],
            number: 1,
            page_size: 10,
            total_count: 1,
        };
        let (posts, paginator) = listing(page);
        let html = IndexTemplate {
            viewer: None,
            posts,
            paginator,
        }
        .render()
        .unwrap();
        assert!(html.contains("Последние обновления на сайте"));
        assert!(html.contains("Тестовый пост"));
        assert!(html.contains("/group/test-slug/"));
    }
}
