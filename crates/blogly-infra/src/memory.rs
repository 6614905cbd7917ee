//! In-memory repositories.
//!
//! Used when no database is configured and in tests. All three repositories
//! share one [`InMemoryStore`], so cascades and uniqueness behave like the
//! PostgreSQL schema.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blogly_core::domain::{NewPost, NewTag, NewUser, Post, Tag, User};
use blogly_core::error::{DomainError, RepoError};
use blogly_core::ports::{BaseRepository, PostRepository, TagRepository, UserRepository};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    posts: BTreeMap<i32, Post>,
    tags: BTreeMap<i32, Tag>,
    /// (post_id, tag_id)
    post_tags: BTreeSet<(i32, i32)>,
    user_seq: i32,
    post_seq: i32,
    tag_seq: i32,
}

fn next_id(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

impl Tables {
    fn remove_post(&mut self, post_id: i32) -> bool {
        self.post_tags.retain(|&(post, _)| post != post_id);
        self.posts.remove(&post_id).is_some()
    }

    fn tag_name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.tags
            .values()
            .any(|tag| tag.name == name && Some(tag.id) != except)
    }

    fn tags_by_ids(&self, tag_ids: &[i32]) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .tags
            .values()
            .filter(|tag| tag_ids.contains(&tag.id))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    /// Link a post to the existing tags among `tag_ids`.
    fn attach_tags(&mut self, post_id: i32, tag_ids: &[i32]) -> Vec<Tag> {
        let tags = self.tags_by_ids(tag_ids);
        for tag in &tags {
            self.post_tags.insert((post_id, tag.id));
        }
        tags
    }

    fn insert_post(&mut self, new: NewPost) -> Result<Post, RepoError> {
        if !self.users.contains_key(&new.user_id) {
            return Err(RepoError::Constraint(format!(
                "post references missing user {}",
                new.user_id
            )));
        }

        let post = Post {
            id: next_id(&mut self.post_seq),
            user_id: new.user_id,
            title: new.title,
            content: new.content,
            created_at: new.created_at,
        };
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    fn update_post(&mut self, post: Post) -> Result<Post, RepoError> {
        if !self.users.contains_key(&post.user_id) {
            return Err(RepoError::Constraint(format!(
                "post references missing user {}",
                post.user_id
            )));
        }
        let slot = self.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    fn replace_tags(&mut self, post_id: i32, tag_ids: &[i32]) -> Vec<Tag> {
        self.post_tags.retain(|&(post, _)| post != post_id);
        self.attach_tags(post_id, tag_ids)
    }
}

/// Names too long for the `users` columns are refused, as the database would.
fn name_violation(err: DomainError) -> RepoError {
    RepoError::Constraint(err.to_string())
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    posts
}

/// Shared storage behind the in-memory repositories.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn tags(&self) -> InMemoryTagRepository {
        InMemoryTagRepository {
            tables: self.tables.clone(),
        }
    }
}

/// In-memory user repository.
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, NewUser, i32> for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        new.validate().map_err(name_violation)?;
        let mut tables = self.tables.write().await;
        let user = User {
            id: next_id(&mut tables.user_seq),
            first_name: new.first_name,
            last_name: new.last_name,
            image_url: new.image_url,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        user.validate().map_err(name_violation)?;
        let mut tables = self.tables.write().await;
        let slot = tables.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        let owned: Vec<i32> = tables
            .posts
            .values()
            .filter(|post| post.user_id == id)
            .map(|post| post.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id);
        }
        Ok(())
    }
}

impl UserRepository for InMemoryUserRepository {}

/// In-memory post repository.
#[derive(Debug, Clone)]
pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Post, NewPost, i32> for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.tables.read().await.posts.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        self.tables.write().await.insert_post(new)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        self.tables.write().await.update_post(post)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        if self.tables.write().await.remove_post(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let posts = tables
            .posts
            .values()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(posts))
    }

    async fn find_tags(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .post_tags
            .iter()
            .filter(|&&(post, _)| post == post_id)
            .filter_map(|(_, tag_id)| tables.tags.get(tag_id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn create_with_tags(&self, new: NewPost, tag_ids: &[i32]) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.insert_post(new)?;
        tables.attach_tags(post.id, tag_ids);
        Ok(post)
    }

    async fn set_tags(&self, post_id: i32, tag_ids: &[i32]) -> Result<Vec<Tag>, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id) {
            return Err(RepoError::NotFound);
        }
        Ok(tables.replace_tags(post_id, tag_ids))
    }

    async fn update_with_tags(
        &self,
        post: Post,
        tag_ids: &[i32],
    ) -> Result<(Post, Vec<Tag>), RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.update_post(post)?;
        let tags = tables.replace_tags(post.id, tag_ids);
        Ok((post, tags))
    }
}

/// In-memory tag repository.
#[derive(Debug, Clone)]
pub struct InMemoryTagRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Tag, NewTag, i32> for InMemoryTagRepository {
    async fn find_all(&self) -> Result<Vec<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn insert(&self, new: NewTag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tag_name_taken(&new.name, None) {
            return Err(RepoError::Constraint(format!("tag {:?} already exists", new.name)));
        }

        let tag = Tag {
            id: next_id(&mut tables.tag_seq),
            name: new.name,
        };
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tag_name_taken(&tag.name, Some(tag.id)) {
            return Err(RepoError::Constraint(format!("tag {:?} already exists", tag.name)));
        }
        let slot = tables.tags.get_mut(&tag.id).ok_or(RepoError::NotFound)?;
        *slot = tag.clone();
        Ok(tag)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tags.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.post_tags.retain(|&(_, tag)| tag != id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RepoError> {
        Ok(self.tables.read().await.tags_by_ids(ids))
    }

    async fn find_posts(&self, tag_id: i32) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let posts = tables
            .post_tags
            .iter()
            .filter(|&&(_, tag)| tag == tag_id)
            .filter_map(|(post_id, _)| tables.posts.get(post_id).cloned())
            .collect();
        Ok(newest_first(posts))
    }
}
