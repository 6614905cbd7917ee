//! Post pages. Posts are created from their author's page.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use blogly_core::DomainError;
use blogly_core::domain::{NewPost, Post};
use blogly_shared::dto::PostForm;

use super::redirect;
use super::users::find_user;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// The raw post form; its `tags` checkboxes repeat the same key.
type PostFormPairs = web::Form<Vec<(String, String)>>;

/// A tag checkbox on the edit form.
#[derive(Serialize)]
struct TagChoice {
    id: i32,
    name: String,
    checked: bool,
}

async fn find_post(state: &AppState, id: i32) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", id).into())
}

/// GET /users/{user_id}/posts/new
pub async fn new_post_form(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;
    let tags = super::tags::all_tags(&state).await?;

    let mut context = state.views.context();
    context.insert("user", &user);
    context.insert("tags", &tags);
    state.views.render("posts/new.html", &context)
}

/// POST /users/{user_id}/posts/new
pub async fn create_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: PostFormPairs,
) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;
    let form = PostForm::from_pairs(form.into_inner())?;

    let post = state
        .posts
        .create_with_tags(NewPost::new(user.id, form.title, form.content), &form.tag_ids)
        .await?;

    tracing::info!(post_id = post.id, user_id = user.id, "Post created");
    Ok(redirect(format!("/users/{}", user.id)))
}

/// GET /posts/{post_id} - the post with its author and tags.
pub async fn show_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    let author = find_user(&state, post.user_id).await?;
    let tags = state.posts.find_tags(post.id).await?;

    let mut context = state.views.context();
    context.insert("post", &post);
    context.insert("author", &author);
    context.insert("tags", &tags);
    state.views.render("posts/show.html", &context)
}

/// GET /posts/{post_id}/edit
pub async fn edit_post_form(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    let selected: Vec<i32> = state
        .posts
        .find_tags(post.id)
        .await?
        .into_iter()
        .map(|tag| tag.id)
        .collect();
    let tags: Vec<TagChoice> = super::tags::all_tags(&state)
        .await?
        .into_iter()
        .map(|tag| TagChoice {
            checked: selected.contains(&tag.id),
            id: tag.id,
            name: tag.name,
        })
        .collect();

    let mut context = state.views.context();
    context.insert("post", &post);
    context.insert("tags", &tags);
    state.views.render("posts/edit.html", &context)
}

/// POST /posts/{post_id}/edit - blank fields keep their value, tags are
/// replaced by the checked set.
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: PostFormPairs,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    let form = PostForm::from_pairs(form.into_inner())?;

    let (post, tags) = state
        .posts
        .update_with_tags(post.with_changes(&form.title, &form.content), &form.tag_ids)
        .await?;

    tracing::info!(post_id = post.id, tags = tags.len(), "Post updated");
    Ok(redirect(format!("/posts/{}", post.id)))
}

/// POST /posts/{post_id}/delete
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    state.posts.delete(post.id).await?;

    tracing::info!(post_id = post.id, "Post deleted");
    Ok(redirect("/"))
}
