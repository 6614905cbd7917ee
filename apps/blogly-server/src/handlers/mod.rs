//! HTTP handlers and route configuration.

mod health;
mod posts;
mod tags;
mod users;

#[cfg(test)]
mod tests;

use actix_web::http::header;
use actix_web::{HttpResponse, web};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list_users))
                .route("/new", web::get().to(users::new_user_form))
                .route("/new", web::post().to(users::create_user))
                .route("/{user_id}", web::get().to(users::show_user))
                .route("/{user_id}/edit", web::get().to(users::edit_user_form))
                .route("/{user_id}/edit", web::post().to(users::update_user))
                .route("/{user_id}/delete", web::post().to(users::delete_user))
                .route("/{user_id}/posts/new", web::get().to(posts::new_post_form))
                .route("/{user_id}/posts/new", web::post().to(posts::create_post)),
        )
        .service(
            web::scope("/posts")
                .route("/{post_id}", web::get().to(posts::show_post))
                .route("/{post_id}/edit", web::get().to(posts::edit_post_form))
                .route("/{post_id}/edit", web::post().to(posts::update_post))
                .route("/{post_id}/delete", web::post().to(posts::delete_post)),
        )
        .service(
            web::scope("/tags")
                .route("", web::get().to(tags::list_tags))
                .route("/new", web::get().to(tags::new_tag_form))
                .route("/new", web::post().to(tags::create_tag))
                .route("/{tag_id}", web::get().to(tags::show_tag))
                .route("/{tag_id}/edit", web::get().to(tags::edit_tag_form))
                .route("/{tag_id}/edit", web::post().to(tags::update_tag))
                .route("/{tag_id}/delete", web::post().to(tags::delete_tag)),
        );
}

/// GET / - the user list is the home page.
async fn home() -> HttpResponse {
    redirect("/users")
}

/// 302 to `location`, as a browser form submission expects.
fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.as_ref()))
        .finish()
}
