use async_trait::async_trait;

use crate::domain::{NewPost, NewTag, NewUser, Post, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// `T` is the stored entity, `N` the shape used to create one and `ID` its key.
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// List every entity.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Store a new entity and return it with its assigned ID.
    async fn insert(&self, new: N) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, cascading to rows that depend on it.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository. Deleting a user deletes their posts.
pub trait UserRepository: BaseRepository<User, NewUser, i32> {}

/// Post repository, including the post side of the post/tag relation.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost, i32> {
    /// Posts written by a user, newest first.
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError>;

    /// Tags attached to a post, ordered by name.
    async fn find_tags(&self, post_id: i32) -> Result<Vec<Tag>, RepoError>;

    /// Store a post together with its tags in one transaction.
    /// Unknown tag ids are ignored.
    async fn create_with_tags(&self, new: NewPost, tag_ids: &[i32]) -> Result<Post, RepoError>;

    /// Replace the tags attached to a post. Unknown tag ids are ignored.
    async fn set_tags(&self, post_id: i32, tag_ids: &[i32]) -> Result<Vec<Tag>, RepoError>;

    /// Overwrite a post and replace its tags in one transaction, returning
    /// the stored post and the tags now attached.
    async fn update_with_tags(
        &self,
        post: Post,
        tag_ids: &[i32],
    ) -> Result<(Post, Vec<Tag>), RepoError>;
}

/// Tag repository. Tag names are unique.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, NewTag, i32> {
    /// The existing tags among `ids`, ordered by name.
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RepoError>;

    /// Posts carrying a tag, newest first.
    async fn find_posts(&self, tag_id: i32) -> Result<Vec<Post>, RepoError>;
}
