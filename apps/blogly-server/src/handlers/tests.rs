//! Handler tests against the in-memory repositories.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};

use blogly_core::domain::{NewPost, NewTag, NewUser, Post, Tag, User};
use blogly_core::ports::{BaseRepository, PostRepository, TagRepository};
use blogly_infra::InMemoryStore;

use super::configure_routes;
use crate::state::AppState;
use crate::views::Views;

/// Build the routed service over `$store`.
macro_rules! test_app {
    ($store:expr) => {{
        let views = Arc::new(Views::new().unwrap());
        let state = AppState::in_memory($store.clone(), views);
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await
    }};
}

struct Seed {
    store: InMemoryStore,
    paul: User,
    first: Post,
    cool: Tag,
    funny: Tag,
}

async fn seed() -> Seed {
    let store = InMemoryStore::new();
    let paul = store
        .users()
        .insert(NewUser::new("Paul".into(), "Smith".into(), None))
        .await
        .unwrap();
    let cool = store.tags().insert(NewTag::new("cool".into())).await.unwrap();
    let funny = store.tags().insert(NewTag::new("funny".into())).await.unwrap();
    let first = store
        .posts()
        .create_with_tags(
            NewPost::new(paul.id, "Test title1".into(), "test".into()),
            &[cool.id],
        )
        .await
        .unwrap();
    store
        .posts()
        .insert(NewPost::new(paul.id, "Test title2".into(), "test".into()))
        .await
        .unwrap();

    Seed {
        store,
        paul,
        first,
        cool,
        funny,
    }
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[actix_web::test]
async fn test_home_redirects_to_users() {
    let app = test_app!(InMemoryStore::new());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/users");
}

#[actix_web::test]
async fn test_show_user_info_lists_posts() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}", seed.paul.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Paul"));
    assert!(html.contains("Test title1"));
    assert!(html.contains("Test title2"));
}

#[actix_web::test]
async fn test_create_user_then_find_it() {
    let store = InMemoryStore::new();
    let app = test_app!(store);

    let req = test::TestRequest::post()
        .uri("/users/new")
        .set_form([("first-name", "Bob"), ("last-name", "Chin"), ("img-url", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/users");

    let users = store.users().find_all().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].full_name(), "Bob Chin");
    assert!(users[0].image_url.is_some());

    let body = test::call_and_read_body(
        &app,
        test::TestRequest::get()
            .uri(&format!("/users/{}", users[0].id))
            .to_request(),
    )
    .await;
    assert!(String::from_utf8_lossy(&body).contains("Bob Chin"));
}

#[actix_web::test]
async fn test_overlong_names_are_bad_requests() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    let req = test::TestRequest::post()
        .uri("/users/new")
        .set_form([
            ("first-name", "Maximilianopolis"),
            ("last-name", "Chin"),
            ("img-url", ""),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(seed.store.users().find_all().await.unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/users/{}/edit", seed.paul.id))
        .set_form([("first-name", ""), ("last-name", "Maximilianopolis"), ("img-url", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let paul = seed.store.users().find_by_id(seed.paul.id).await.unwrap();
    assert_eq!(paul, Some(seed.paul));
}

#[actix_web::test]
async fn test_unknown_ids_are_not_found() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    for uri in [
        "/users/999",
        "/users/999/edit",
        "/users/999/posts/new",
        "/posts/999",
        "/posts/999/edit",
        "/tags/999",
        "/tags/999/edit",
        "/posts/not-a-number",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }

    for uri in ["/users/999/delete", "/posts/999/delete", "/tags/999/delete"] {
        let resp = test::call_service(&app, test::TestRequest::post().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "POST {uri}");
    }
}

#[actix_web::test]
async fn test_edit_user_keeps_blank_names_and_clears_image() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    let req = test::TestRequest::post()
        .uri(&format!("/users/{}/edit", seed.paul.id))
        .set_form([("first-name", ""), ("last-name", "Jones"), ("img-url", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/users");

    let paul = seed.store.users().find_by_id(seed.paul.id).await.unwrap().unwrap();
    assert_eq!(paul.first_name, "Paul");
    assert_eq!(paul.last_name, "Jones");
    assert_eq!(paul.image_url, None);
}

#[actix_web::test]
async fn test_delete_user_removes_posts() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    let req = test::TestRequest::post()
        .uri(&format!("/users/{}/delete", seed.paul.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    assert!(seed.store.posts().find_all().await.unwrap().is_empty());
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}", seed.first.id))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_post_with_tags() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    let cool = seed.cool.id.to_string();
    let funny = seed.funny.id.to_string();
    let req = test::TestRequest::post()
        .uri(&format!("/users/{}/posts/new", seed.paul.id))
        .set_form([
            ("title", "test3"),
            ("content", "some content"),
            ("tags", cool.as_str()),
            ("tags", funny.as_str()),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/users/{}", seed.paul.id));

    let posts = seed.store.posts().find_by_user_id(seed.paul.id).await.unwrap();
    let created = posts.iter().find(|p| p.title == "test3").unwrap();
    let tags = seed.store.posts().find_tags(created.id).await.unwrap();
    assert_eq!(tags, vec![seed.cool.clone(), seed.funny.clone()]);

    let body = test::call_and_read_body(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}", created.id))
            .to_request(),
    )
    .await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("test3"));
    assert!(html.contains("Paul Smith"));
    assert!(html.contains("funny"));
}

#[actix_web::test]
async fn test_create_post_rejects_bad_tag_id_and_missing_user() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    let req = test::TestRequest::post()
        .uri(&format!("/users/{}/posts/new", seed.paul.id))
        .set_form([("title", "t"), ("content", "c"), ("tags", "cool")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/users/999/posts/new")
        .set_form([("title", "t"), ("content", "c")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_edit_post_keeps_blank_fields_and_replaces_tags() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    let funny = seed.funny.id.to_string();
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit", seed.first.id))
        .set_form([("title", ""), ("content", "rewritten"), ("tags", funny.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}", seed.first.id));

    let post = seed.store.posts().find_by_id(seed.first.id).await.unwrap().unwrap();
    assert_eq!(post.title, "Test title1");
    assert_eq!(post.content, "rewritten");
    assert_eq!(
        seed.store.posts().find_tags(post.id).await.unwrap(),
        vec![seed.funny.clone()]
    );

    // The edit form shows the new selection.
    let body = test::call_and_read_body(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/edit", post.id))
            .to_request(),
    )
    .await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("rewritten"));
    assert_eq!(html.matches("checked").count(), 1);
}

#[actix_web::test]
async fn test_delete_post() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete", seed.first.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    assert_eq!(seed.store.posts().find_by_id(seed.first.id).await.unwrap(), None);
    assert!(seed.store.tags().find_posts(seed.cool.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_tag_lifecycle() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    let req = test::TestRequest::post()
        .uri("/tags/new")
        .set_form([("name", "serious")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/tags");

    let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/tags").to_request()).await;
    assert!(String::from_utf8_lossy(&body).contains("serious"));

    // Names are unique.
    let req = test::TestRequest::post()
        .uri("/tags/new")
        .set_form([("name", "cool")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // A blank rename keeps the name.
    let req = test::TestRequest::post()
        .uri(&format!("/tags/{}/edit", seed.funny.id))
        .set_form([("name", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let funny = seed.store.tags().find_by_id(seed.funny.id).await.unwrap().unwrap();
    assert_eq!(funny.name, "funny");

    // The tag page lists its posts.
    let body = test::call_and_read_body(
        &app,
        test::TestRequest::get()
            .uri(&format!("/tags/{}", seed.cool.id))
            .to_request(),
    )
    .await;
    assert!(String::from_utf8_lossy(&body).contains("Test title1"));

    // Deleting the tag takes it off the post.
    let req = test::TestRequest::post()
        .uri(&format!("/tags/{}/delete", seed.cool.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(seed.store.posts().find_tags(seed.first.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_forms_render() {
    let seed = seed().await;
    let app = test_app!(seed.store);

    for uri in [
        "/users".to_string(),
        "/users/new".to_string(),
        format!("/users/{}/edit", seed.paul.id),
        format!("/users/{}/posts/new", seed.paul.id),
        "/tags/new".to_string(),
        format!("/tags/{}/edit", seed.cool.id),
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    }
}

#[actix_web::test]
async fn test_health_reports_in_memory_storage() {
    let app = test_app!(InMemoryStore::new());

    let body: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/health").to_request(),
    )
    .await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "in-memory");
}
