//! Data Transfer Objects - the HTML forms submitted by the browser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Form decoding failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid tag id: {0:?}")]
    InvalidTagId(String),
}

/// Add/edit user form. Missing fields decode as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserForm {
    #[serde(rename = "first-name", default)]
    pub first_name: String,
    #[serde(rename = "last-name", default)]
    pub last_name: String,
    #[serde(rename = "img-url", default)]
    pub image_url: String,
}

/// Add/edit tag form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagForm {
    #[serde(default)]
    pub name: String,
}

/// Add/edit post form.
///
/// The tag checkboxes share the `tags` field name, so the body is decoded
/// from its raw key/value pairs rather than through a derived struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub tag_ids: Vec<i32>,
}

impl PostForm {
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut form = Self::default();

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "title" => form.title = value.to_string(),
                "content" => form.content = value.to_string(),
                "tags" => {
                    let id = value
                        .trim()
                        .parse()
                        .map_err(|_| FormError::InvalidTagId(value.to_string()))?;
                    form.tag_ids.push(id);
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_form_collects_repeated_tags() {
        let form = PostForm::from_pairs([
            ("title", "test3"),
            ("content", "some content"),
            ("tags", "1"),
            ("tags", "4"),
            ("user_id", "9"),
        ])
        .unwrap();

        assert_eq!(form.title, "test3");
        assert_eq!(form.content, "some content");
        assert_eq!(form.tag_ids, vec![1, 4]);
    }

    #[test]
    fn post_form_rejects_non_numeric_tag() {
        let err = PostForm::from_pairs([("tags", "cool")]).unwrap_err();
        assert_eq!(err, FormError::InvalidTagId("cool".to_string()));
    }

    #[test]
    fn user_form_uses_dashed_field_names() {
        let form: UserForm =
            serde_json::from_str(r#"{"first-name":"Tom","last-name":"Doe"}"#).unwrap();
        assert_eq!(form.first_name, "Tom");
        assert_eq!(form.last_name, "Doe");
        assert!(form.image_url.is_empty());
    }
}
