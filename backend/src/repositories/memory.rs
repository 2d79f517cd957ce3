//! In-process stores used when no database is configured, and by tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::AppError;
use crate::models::profile_auth::ProfileAuthRecord;
use crate::models::world::{Comment, CommentWindow, SortDirection, World};
use crate::repositories::{profile_auth::ProfileAuthStore, world::WorldStore};
use crate::types::{CommentId, ProfileId, WorldId};

#[derive(Debug, Default)]
pub struct InMemoryProfileAuthStore {
    records: Mutex<HashMap<String, ProfileAuthRecord>>,
}

impl InMemoryProfileAuthStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileAuthStore for InMemoryProfileAuthStore {
    async fn find_by_profile_id(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<ProfileAuthRecord>, AppError> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(&profile_id.short()).cloned())
    }

    async fn upsert(&self, record: &ProfileAuthRecord) -> Result<(), AppError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.insert(record.profile_id.short(), record.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryWorldStore {
    worlds: Mutex<HashMap<WorldId, World>>,
    comments: Mutex<Vec<Comment>>,
}

impl InMemoryWorldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stands in for the scraper.
    pub fn insert_world(&self, world: World) {
        let mut worlds = self.worlds.lock().unwrap_or_else(|e| e.into_inner());
        worlds.insert(world.world_uuid, world);
    }
}

#[async_trait]
impl WorldStore for InMemoryWorldStore {
    async fn find_world(&self, world_uuid: &WorldId) -> Result<Option<World>, AppError> {
        let worlds = self.worlds.lock().unwrap_or_else(|e| e.into_inner());
        Ok(worlds.get(world_uuid).cloned())
    }

    async fn list_by_owner(
        &self,
        owner: &ProfileId,
        include_unlisted: bool,
    ) -> Result<Vec<World>, AppError> {
        let worlds = self.worlds.lock().unwrap_or_else(|e| e.into_inner());
        let mut owned: Vec<World> = worlds
            .values()
            .filter(|world| ProfileId::parse(&world.owner_uuid).is_ok_and(|id| id == *owner))
            .filter(|world| include_unlisted || !world.legitidevs.unlisted)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.votes
                .cmp(&a.votes)
                .then_with(|| a.world_uuid.cmp(&b.world_uuid))
        });
        Ok(owned)
    }

    async fn update_description(
        &self,
        world_uuid: &WorldId,
        description: &str,
    ) -> Result<(), AppError> {
        let mut worlds = self.worlds.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(world) = worlds.get_mut(world_uuid) {
            world.legitidevs.description = Some(description.to_string());
        }
        Ok(())
    }

    async fn set_unlisted(&self, world_uuid: &WorldId, unlisted: bool) -> Result<(), AppError> {
        let mut worlds = self.worlds.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(world) = worlds.get_mut(world_uuid) {
            world.legitidevs.unlisted = unlisted;
        }
        Ok(())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        let mut comments = self.comments.lock().unwrap_or_else(|e| e.into_inner());
        comments.push(comment.clone());
        Ok(())
    }

    async fn find_comment(&self, uuid: &CommentId) -> Result<Option<Comment>, AppError> {
        let comments = self.comments.lock().unwrap_or_else(|e| e.into_inner());
        Ok(comments.iter().find(|c| c.uuid == *uuid).cloned())
    }

    async fn list_comments(
        &self,
        world_uuid: &WorldId,
        direction: SortDirection,
        window: CommentWindow,
    ) -> Result<Vec<Comment>, AppError> {
        let comments = self.comments.lock().unwrap_or_else(|e| e.into_inner());
        let mut listed: Vec<Comment> = comments
            .iter()
            .filter(|c| c.world_uuid == *world_uuid)
            .cloned()
            .collect();
        match direction {
            SortDirection::Ascending => listed.sort_by_key(|c| (c.date, c.uuid)),
            SortDirection::Descending => {
                listed.sort_by(|a, b| b.date.cmp(&a.date).then(a.uuid.cmp(&b.uuid)))
            }
        }

        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = window.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(listed.into_iter().skip(offset).take(limit).collect())
    }

    async fn delete_comment(&self, uuid: &CommentId) -> Result<bool, AppError> {
        let mut comments = self.comments.lock().unwrap_or_else(|e| e.into_inner());
        let before = comments.len();
        comments.retain(|c| c.uuid != *uuid);
        Ok(comments.len() != before)
    }
}
