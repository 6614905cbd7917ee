//! User pages.

use actix_web::{HttpResponse, web};

use blogly_core::DomainError;
use blogly_core::domain::{NewUser, User};
use blogly_shared::dto::UserForm;

use super::redirect;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Load a user or fail with 404.
pub(super) async fn find_user(state: &AppState, id: i32) -> AppResult<User> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", id).into())
}

/// GET /users - all users, with a link to add one.
pub async fn list_users(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let mut users = state.users.find_all().await?;
    users.sort_by(|a, b| {
        (a.last_name.as_str(), a.first_name.as_str(), a.id)
            .cmp(&(b.last_name.as_str(), b.first_name.as_str(), b.id))
    });

    let mut context = state.views.context();
    context.insert("users", &users);
    state.views.render("users/index.html", &context)
}

/// GET /users/new
pub async fn new_user_form(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    state.views.render("users/new.html", &state.views.context())
}

/// POST /users/new
pub async fn create_user(
    state: web::Data<AppState>,
    form: web::Form<UserForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let new = NewUser::new(form.first_name, form.last_name, Some(form.image_url));
    new.validate()?;
    let user = state.users.insert(new).await?;

    tracing::info!(user_id = user.id, "User created");
    Ok(redirect("/users"))
}

/// GET /users/{user_id} - profile with the user's posts.
pub async fn show_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;
    let posts = state.posts.find_by_user_id(user.id).await?;

    let mut context = state.views.context();
    context.insert("user", &user);
    context.insert("posts", &posts);
    state.views.render("users/profile.html", &context)
}

/// GET /users/{user_id}/edit
pub async fn edit_user_form(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;

    let mut context = state.views.context();
    context.insert("user", &user);
    state.views.render("users/edit.html", &context)
}

/// POST /users/{user_id}/edit
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<UserForm>,
) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;
    let form = form.into_inner();

    let user = user.with_changes(&form.first_name, &form.last_name, &form.image_url);
    user.validate()?;
    let user = state.users.update(user).await?;

    tracing::info!(user_id = user.id, "User updated");
    Ok(redirect("/users"))
}

/// POST /users/{user_id}/delete - also deletes the user's posts.
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;
    state.users.delete(user.id).await?;

    tracing::info!(user_id = user.id, "User deleted");
    Ok(redirect("/users"))
}
