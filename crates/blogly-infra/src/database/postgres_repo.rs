//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use blogly_core::domain::{NewPost, Post, Tag};
use blogly_core::error::RepoError;
use blogly_core::ports::{PostRepository, TagRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::Entity as UserEntity;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

// Posts go with their user through the `ON DELETE CASCADE` foreign key.
impl UserRepository for PostgresUserRepository {}

/// The existing tags among `tag_ids`, ordered by name.
async fn tags_by_ids<C>(conn: &C, tag_ids: &[i32]) -> Result<Vec<tag::Model>, DbErr>
where
    C: ConnectionTrait,
{
    if tag_ids.is_empty() {
        return Ok(Vec::new());
    }

    TagEntity::find()
        .filter(tag::Column::Id.is_in(tag_ids.iter().copied()))
        .order_by_asc(tag::Column::Name)
        .all(conn)
        .await
}

/// Link `post_id` to every existing tag in `tag_ids`, returning the tags linked.
async fn attach_tags<C>(conn: &C, post_id: i32, tag_ids: &[i32]) -> Result<Vec<tag::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let tags = tags_by_ids(conn, tag_ids).await?;

    if !tags.is_empty() {
        let rows = tags.iter().map(|tag| post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag.id),
        });
        PostTagEntity::insert_many(rows)
            .exec_without_returning(conn)
            .await?;
    }

    Ok(tags)
}

/// Drop every tag link of `post_id`, then link the existing tags in `tag_ids`.
async fn replace_tags<C>(conn: &C, post_id: i32, tag_ids: &[i32]) -> Result<Vec<Tag>, DbErr>
where
    C: ConnectionTrait,
{
    PostTagEntity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(conn)
        .await?;
    let tags = attach_tags(conn, post_id, tag_ids).await?;

    Ok(tags.into_iter().map(Into::into).collect())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_tags(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .join(JoinType::InnerJoin, tag::Relation::PostTag.def())
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Name)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create_with_tags(&self, new: NewPost, tag_ids: &[i32]) -> Result<Post, RepoError> {
        let txn = self.conn().begin().await.map_err(map_db_err)?;

        let model = post::ActiveModel::from(new)
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        let tags = attach_tags(&txn, model.id, tag_ids)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(post_id = model.id, tags = tags.len(), "Post created");

        Ok(model.into())
    }

    async fn set_tags(&self, post_id: i32, tag_ids: &[i32]) -> Result<Vec<Tag>, RepoError> {
        let txn = self.conn().begin().await.map_err(map_db_err)?;

        let tags = replace_tags(&txn, post_id, tag_ids)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(tags)
    }

    async fn update_with_tags(
        &self,
        updated: Post,
        tag_ids: &[i32],
    ) -> Result<(Post, Vec<Tag>), RepoError> {
        let txn = self.conn().begin().await.map_err(map_db_err)?;

        let model = post::ActiveModel::from(updated)
            .update(&txn)
            .await
            .map_err(map_db_err)?;
        let tags = replace_tags(&txn, model.id, tag_ids)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(post_id = model.id, tags = tags.len(), "Post updated");

        Ok((model.into(), tags))
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RepoError> {
        let result = tags_by_ids(self.conn(), ids).await.map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_posts(&self, tag_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .join(JoinType::InnerJoin, post::Relation::PostTag.def())
            .filter(post_tag::Column::TagId.eq(tag_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
