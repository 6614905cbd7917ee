use serde::{Deserialize, Serialize};

use super::or_prior;
use crate::error::DomainError;

/// Avatar stored for users created without an image.
pub const DEFAULT_IMAGE_URL: &str =
    "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTQdztTDcpZ2pFqwWDYwSXbvZq5nzJYg5cn8w&s";

/// Longest first or last name the `users` table stores.
pub const MAX_NAME_LEN: usize = 15;

fn check_names(first_name: &str, last_name: &str) -> Result<(), DomainError> {
    for (field, value) in [("first name", first_name), ("last name", last_name)] {
        if value.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "{field} must be at most {MAX_NAME_LEN} characters"
            )));
        }
    }
    Ok(())
}

/// User entity - an author who owns posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub image_url: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Apply an edit form. Blank names keep their current value, while a blank
    /// image URL clears the image.
    pub fn with_changes(mut self, first_name: &str, last_name: &str, image_url: &str) -> Self {
        self.first_name = or_prior(first_name, self.first_name);
        self.last_name = or_prior(last_name, self.last_name);
        self.image_url = (!image_url.is_empty()).then(|| image_url.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_names(&self.first_name, &self.last_name)
    }
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub image_url: Option<String>,
}

impl NewUser {
    /// Create a new user, falling back to the default avatar.
    pub fn new(first_name: String, last_name: String, image_url: Option<String>) -> Self {
        let image_url = image_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());

        Self {
            first_name,
            last_name,
            image_url: Some(image_url),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_names(&self.first_name, &self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paul() -> User {
        User {
            id: 1,
            first_name: "Paul".to_string(),
            last_name: "Smith".to_string(),
            image_url: Some("https://example.com/paul.png".to_string()),
        }
    }

    #[test]
    fn new_user_without_image_gets_default() {
        let user = NewUser::new("Tom".into(), "Doe".into(), Some(String::new()));
        assert_eq!(user.image_url.as_deref(), Some(DEFAULT_IMAGE_URL));

        let user = NewUser::new("Tom".into(), "Doe".into(), None);
        assert_eq!(user.image_url.as_deref(), Some(DEFAULT_IMAGE_URL));
    }

    #[test]
    fn blank_names_keep_previous_values() {
        let user = paul().with_changes("", "", "https://example.com/new.png");
        assert_eq!(user.first_name, "Paul");
        assert_eq!(user.last_name, "Smith");
        assert_eq!(user.image_url.as_deref(), Some("https://example.com/new.png"));
    }

    #[test]
    fn names_longer_than_column_are_rejected() {
        let long = "Maximilianopolis";
        assert_eq!(long.chars().count(), MAX_NAME_LEN + 1);

        let err = NewUser::new(long.into(), "Doe".into(), None).validate();
        assert!(matches!(err, Err(DomainError::Validation(_))));

        let err = paul().with_changes("", long, "").validate();
        assert!(matches!(err, Err(DomainError::Validation(_))));

        // Fifteen multibyte characters still fit.
        let user = paul().with_changes("ÉÉÉÉÉÉÉÉÉÉÉÉÉÉÉ", "", "");
        assert!(user.validate().is_ok());
    }

    #[test]
    fn blank_image_clears_it() {
        let user = paul().with_changes("Bob", "Chin", "");
        assert_eq!(user.full_name(), "Bob Chin");
        assert_eq!(user.image_url, None);
    }
}
