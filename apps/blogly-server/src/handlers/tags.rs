//! Tag pages.

use actix_web::{HttpResponse, web};

use blogly_core::DomainError;
use blogly_core::domain::{NewTag, Tag};
use blogly_shared::dto::TagForm;

use super::redirect;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Every tag, alphabetically.
pub(super) async fn all_tags(state: &AppState) -> AppResult<Vec<Tag>> {
    let mut tags = state.tags.find_all().await?;
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(tags)
}

async fn find_tag(state: &AppState, id: i32) -> AppResult<Tag> {
    state
        .tags
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Tag", id).into())
}

/// GET /tags
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = all_tags(&state).await?;

    let mut context = state.views.context();
    context.insert("tags", &tags);
    state.views.render("tags/index.html", &context)
}

/// GET /tags/new - the form, above the tags that already exist.
pub async fn new_tag_form(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = all_tags(&state).await?;

    let mut context = state.views.context();
    context.insert("tags", &tags);
    state.views.render("tags/new.html", &context)
}

/// POST /tags/new
pub async fn create_tag(
    state: web::Data<AppState>,
    form: web::Form<TagForm>,
) -> AppResult<HttpResponse> {
    let tag = state.tags.insert(NewTag::new(form.into_inner().name)).await?;

    tracing::info!(tag_id = tag.id, "Tag created");
    Ok(redirect("/tags"))
}

/// GET /tags/{tag_id} - the tag with the posts carrying it.
pub async fn show_tag(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let tag = find_tag(&state, path.into_inner()).await?;
    let posts = state.tags.find_posts(tag.id).await?;

    let mut context = state.views.context();
    context.insert("tag", &tag);
    context.insert("posts", &posts);
    state.views.render("tags/show.html", &context)
}

/// GET /tags/{tag_id}/edit
pub async fn edit_tag_form(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let tag = find_tag(&state, path.into_inner()).await?;

    let mut context = state.views.context();
    context.insert("tag", &tag);
    state.views.render("tags/edit.html", &context)
}

/// POST /tags/{tag_id}/edit
pub async fn update_tag(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<TagForm>,
) -> AppResult<HttpResponse> {
    let tag = find_tag(&state, path.into_inner()).await?;
    let tag = state.tags.update(tag.renamed(&form.name)).await?;

    tracing::info!(tag_id = tag.id, "Tag renamed");
    Ok(redirect("/tags"))
}

/// POST /tags/{tag_id}/delete - the tag comes off every post carrying it.
pub async fn delete_tag(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let tag = find_tag(&state, path.into_inner()).await?;
    state.tags.delete(tag.id).await?;

    tracing::info!(tag_id = tag.id, "Tag deleted");
    Ok(redirect("/tags"))
}
