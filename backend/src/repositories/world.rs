//! Worlds and their comments.
//!
//! World rows are written by the external scraper; this service only touches
//! the `legitidevs_*` columns and the comments table.

use async_trait::async_trait;
use sqlx::FromRow;

use crate::db::connection::DbPool;
use crate::error::AppError;
use crate::models::world::{Comment, CommentWindow, SortDirection, UserContent, World};
use crate::types::{CommentId, ProfileId, WorldId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorldStore: Send + Sync {
    async fn find_world(&self, world_uuid: &WorldId) -> Result<Option<World>, AppError>;

    /// Matches stored owner ids in either UUID form and any letter case.
    async fn list_by_owner(
        &self,
        owner: &ProfileId,
        include_unlisted: bool,
    ) -> Result<Vec<World>, AppError>;

    async fn update_description(
        &self,
        world_uuid: &WorldId,
        description: &str,
    ) -> Result<(), AppError>;

    async fn set_unlisted(&self, world_uuid: &WorldId, unlisted: bool) -> Result<(), AppError>;

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError>;

    async fn find_comment(&self, uuid: &CommentId) -> Result<Option<Comment>, AppError>;

    /// Comments on a world ordered by date, then cut to `window`.
    async fn list_comments(
        &self,
        world_uuid: &WorldId,
        direction: SortDirection,
        window: CommentWindow,
    ) -> Result<Vec<Comment>, AppError>;

    /// Returns whether a comment was removed.
    async fn delete_comment(&self, uuid: &CommentId) -> Result<bool, AppError>;
}

const WORLD_COLUMNS: &str = "world_uuid, owner_uuid, name, raw_name, description, raw_description, \
     version, locked, player_count, visits, votes, creation_date_unix_seconds, last_scraped, \
     legitidevs_description, legitidevs_unlisted";

#[derive(Debug, FromRow)]
struct WorldRow {
    world_uuid: String,
    owner_uuid: String,
    name: String,
    raw_name: String,
    description: String,
    raw_description: String,
    version: String,
    locked: bool,
    player_count: i32,
    visits: i32,
    votes: i32,
    creation_date_unix_seconds: i64,
    last_scraped: i64,
    legitidevs_description: Option<String>,
    legitidevs_unlisted: bool,
}

impl TryFrom<WorldRow> for World {
    type Error = AppError;

    fn try_from(row: WorldRow) -> Result<Self, Self::Error> {
        let world_uuid = row.world_uuid.parse().map_err(|err| {
            AppError::InternalServerError(anyhow::anyhow!(
                "stored world uuid '{}' is invalid: {}",
                row.world_uuid,
                err
            ))
        })?;
        Ok(World {
            world_uuid,
            owner_uuid: row.owner_uuid,
            name: row.name,
            raw_name: row.raw_name,
            description: row.description,
            raw_description: row.raw_description,
            version: row.version,
            locked: row.locked,
            player_count: row.player_count,
            visits: row.visits,
            votes: row.votes,
            creation_date_unix_seconds: row.creation_date_unix_seconds,
            last_scraped: row.last_scraped,
            legitidevs: UserContent {
                description: row.legitidevs_description,
                unlisted: row.legitidevs_unlisted,
            },
        })
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    uuid: String,
    world_uuid: String,
    profile_uuid: String,
    content: String,
    date: i64,
}

impl TryFrom<CommentRow> for Comment {
    type Error = AppError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        let invalid = |what: &str, value: &str| {
            AppError::InternalServerError(anyhow::anyhow!("stored {} '{}' is invalid", what, value))
        };
        Ok(Comment {
            uuid: row
                .uuid
                .parse()
                .map_err(|_| invalid("comment uuid", &row.uuid))?,
            world_uuid: row
                .world_uuid
                .parse()
                .map_err(|_| invalid("world uuid", &row.world_uuid))?,
            profile_uuid: row.profile_uuid,
            content: row.content,
            date: row.date,
        })
    }
}

#[derive(Clone)]
pub struct PgWorldStore {
    pool: DbPool,
}

impl PgWorldStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorldStore for PgWorldStore {
    async fn find_world(&self, world_uuid: &WorldId) -> Result<Option<World>, AppError> {
        let row = sqlx::query_as::<_, WorldRow>(&format!(
            "SELECT {} FROM worlds WHERE world_uuid = $1",
            WORLD_COLUMNS
        ))
        .bind(world_uuid.to_string())
        .fetch_optional(&*self.pool)
        .await?;

        row.map(World::try_from).transpose()
    }

    async fn list_by_owner(
        &self,
        owner: &ProfileId,
        include_unlisted: bool,
    ) -> Result<Vec<World>, AppError> {
        let rows = sqlx::query_as::<_, WorldRow>(&format!(
            "SELECT {} FROM worlds \
             WHERE lower(replace(owner_uuid, '-', '')) = $1 AND ($2 OR NOT legitidevs_unlisted) \
             ORDER BY votes DESC, world_uuid",
            WORLD_COLUMNS
        ))
        .bind(owner.short())
        .bind(include_unlisted)
        .fetch_all(&*self.pool)
        .await?;

        rows.into_iter().map(World::try_from).collect()
    }

    async fn update_description(
        &self,
        world_uuid: &WorldId,
        description: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE worlds SET legitidevs_description = $2 WHERE world_uuid = $1")
            .bind(world_uuid.to_string())
            .bind(description)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn set_unlisted(&self, world_uuid: &WorldId, unlisted: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE worlds SET legitidevs_unlisted = $2 WHERE world_uuid = $1")
            .bind(world_uuid.to_string())
            .bind(unlisted)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO world_comments (uuid, world_uuid, profile_uuid, content, date) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(comment.uuid.to_string())
        .bind(comment.world_uuid.to_string())
        .bind(&comment.profile_uuid)
        .bind(&comment.content)
        .bind(comment.date)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn find_comment(&self, uuid: &CommentId) -> Result<Option<Comment>, AppError> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT uuid, world_uuid, profile_uuid, content, date FROM world_comments WHERE uuid = $1",
        )
        .bind(uuid.to_string())
        .fetch_optional(&*self.pool)
        .await?;

        row.map(Comment::try_from).transpose()
    }

    async fn list_comments(
        &self,
        world_uuid: &WorldId,
        direction: SortDirection,
        window: CommentWindow,
    ) -> Result<Vec<Comment>, AppError> {
        let order = match direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT uuid, world_uuid, profile_uuid, content, date FROM world_comments \
             WHERE world_uuid = $1 ORDER BY date {}, uuid LIMIT $2 OFFSET $3",
            order
        ))
        .bind(world_uuid.to_string())
        .bind(window.limit.map(i64::from))
        .bind(i64::try_from(window.offset).unwrap_or(i64::MAX))
        .fetch_all(&*self.pool)
        .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn delete_comment(&self, uuid: &CommentId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM world_comments WHERE uuid = $1")
            .bind(uuid.to_string())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
