//! Domain entities - the core business objects.

mod post;
mod tag;
mod user;

pub use post::{NewPost, Post};
pub use tag::{NewTag, Tag};
pub use user::{DEFAULT_IMAGE_URL, MAX_NAME_LEN, NewUser, User};

/// Edit forms leave a field blank to keep its current value.
fn or_prior(submitted: &str, prior: String) -> String {
    if submitted.is_empty() {
        prior
    } else {
        submitted.to_string()
    }
}
