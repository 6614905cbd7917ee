use serde::{Deserialize, Serialize};

use super::or_prior;

/// Tag entity - a unique label attached to any number of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

impl Tag {
    pub fn renamed(mut self, name: &str) -> Self {
        self.name = or_prior(name, self.name);
        self
    }
}

/// A tag that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
}

impl NewTag {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}
