use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::or_prior;

/// Post entity - a blog post written by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Apply an edit form; blank fields keep their current value.
    pub fn with_changes(mut self, title: &str, content: &str) -> Self {
        self.title = or_prior(title, self.title);
        self.content = or_prior(content, self.content);
        self
    }
}

/// A post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    /// Create a new post stamped with the current time.
    pub fn new(user_id: i32, title: String, content: String) -> Self {
        Self {
            user_id,
            title,
            content,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_keep_previous_values() {
        let post = Post {
            id: 7,
            user_id: 1,
            title: "First Post!".to_string(),
            content: "I have no idea what to say.".to_string(),
            created_at: Utc::now(),
        };

        let edited = post.clone().with_changes("", "Still no idea.");
        assert_eq!(edited.title, "First Post!");
        assert_eq!(edited.content, "Still no idea.");
        assert_eq!(edited.created_at, post.created_at);
    }
}
