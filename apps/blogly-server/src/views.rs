//! HTML views rendered with Tera.
//!
//! Templates are compiled into the binary so the server has no runtime
//! file dependencies.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use tera::{Context, Tera};

use blogly_core::domain::DEFAULT_IMAGE_URL;

use crate::middleware::error::{AppError, AppResult};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("users/index.html", include_str!("../templates/users/index.html")),
    ("users/new.html", include_str!("../templates/users/new.html")),
    ("users/profile.html", include_str!("../templates/users/profile.html")),
    ("users/edit.html", include_str!("../templates/users/edit.html")),
    ("posts/new.html", include_str!("../templates/posts/new.html")),
    ("posts/show.html", include_str!("../templates/posts/show.html")),
    ("posts/edit.html", include_str!("../templates/posts/edit.html")),
    ("tags/index.html", include_str!("../templates/tags/index.html")),
    ("tags/new.html", include_str!("../templates/tags/new.html")),
    ("tags/show.html", include_str!("../templates/tags/show.html")),
    ("tags/edit.html", include_str!("../templates/tags/edit.html")),
];

/// The compiled page templates.
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    /// A context carrying the values every page may use.
    pub fn context(&self) -> Context {
        let mut context = Context::new();
        context.insert("default_image_url", DEFAULT_IMAGE_URL);
        context
    }

    /// Render `template` into a 200 HTML response.
    pub fn render(&self, template: &str, context: &Context) -> AppResult<HttpResponse> {
        let html = self
            .tera
            .render(template, context)
            .map_err(|e| AppError::Internal(format!("failed to render {template}: {e:?}")))?;

        Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_compile() {
        let views = Views::new().unwrap();
        let mut context = views.context();
        context.insert("tags", &Vec::<blogly_core::domain::Tag>::new());

        let response = views.render("tags/index.html", &context).unwrap();
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    }
}
