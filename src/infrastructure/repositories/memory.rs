//! Process-local storage backing every repository trait and the
//! aggregation store. Used by tests and local runs without Postgres.

use crate::domain::comments::{Comment, CommentRepository, NewComment};
use crate::domain::likes::{Like, LikeRepository};
use crate::domain::pipeline::{AggregationStore, Collection, Pipeline};
use crate::domain::subscriptions::Subscription;
use crate::domain::users::{DuplicateUser, NewUser, UpdateUser, User, UserRepository};
use crate::domain::videos::{NewVideo, UpdateVideo, Video, VideoRepository};
use crate::infrastructure::pipeline::memory::evaluate;
use crate::shared::pagination::{Page, PageRequest};
use anyhow::bail;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    videos: Vec<Video>,
    likes: Vec<Like>,
    comments: Vec<Comment>,
    subscriptions: Vec<Subscription>,
    last_timestamp: Option<OffsetDateTime>,
}

impl Tables {
    /// Strictly increasing timestamps keep creation order observable.
    fn now(&mut self) -> OffsetDateTime {
        let now = match self.last_timestamp {
            Some(last) if OffsetDateTime::now_utc() <= last => last + Duration::microseconds(1),
            _ => OffsetDateTime::now_utc(),
        };
        self.last_timestamp = Some(now);
        now
    }

    fn snapshot(&self) -> Result<HashMap<Collection, Vec<Value>>, serde_json::Error> {
        fn docs<T: serde::Serialize>(rows: &[T]) -> Result<Vec<Value>, serde_json::Error> {
            rows.iter().map(serde_json::to_value).collect()
        }

        Ok(HashMap::from([
            (Collection::Users, docs(&self.users)?),
            (Collection::Videos, docs(&self.videos)?),
            (Collection::Likes, docs(&self.likes)?),
            (Collection::Comments, docs(&self.comments)?),
            (Collection::Subscriptions, docs(&self.subscriptions)?),
        ]))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Subscriptions have no write path in the application; fixtures add them here.
    pub fn seed_subscription(&self, subscriber: Uuid, channel: Uuid) -> Subscription {
        let mut tables = self.tables();
        let subscription = Subscription {
            id: Uuid::new_v4(),
            subscriber,
            channel,
            created_at: tables.now(),
        };
        tables.subscriptions.push(subscription.clone());
        subscription
    }

    pub fn like_count(&self, video: Uuid) -> usize {
        self.tables().likes.iter().filter(|l| l.video == video).count()
    }

    pub fn comment_count(&self, video: Uuid) -> usize {
        self.tables()
            .comments
            .iter()
            .filter(|c| c.video == video)
            .count()
    }

    fn run(&self, from: Collection, pipeline: &Pipeline) -> Result<Vec<Value>, anyhow::Error> {
        let collections = self.tables().snapshot()?;
        let source = |c: Collection| collections.get(&c).cloned().unwrap_or_default();
        Ok(evaluate(&source, pipeline.stages(), source(from)))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error> {
        let mut tables = self.tables();
        if tables
            .users
            .iter()
            .any(|u| u.username == new_user.username || u.email == new_user.email)
        {
            return Err(DuplicateUser.into());
        }

        let now = tables.now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            full_name: new_user.full_name,
            avatar: new_user.avatar,
            cover_image: new_user.cover_image,
            watch_history: Vec::new(),
            password_hash: new_user.password_hash,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, anyhow::Error> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, anyhow::Error> {
        let tables = self.tables();
        Ok(tables
            .users
            .iter()
            .find(|u| username == Some(u.username.as_str()) || email == Some(u.email.as_str()))
            .cloned())
    }

    async fn update(&self, id: Uuid, update: UpdateUser) -> Result<Option<User>, anyhow::Error> {
        let mut tables = self.tables();
        let email_taken = update
            .email
            .as_ref()
            .is_some_and(|email| tables.users.iter().any(|u| u.id != id && &u.email == email));
        if email_taken {
            return Err(DuplicateUser.into());
        }
        let now = tables.now();
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(cover_image) = update.cover_image {
            user.cover_image = Some(cover_image);
        }
        user.updated_at = now;

        Ok(Some(user.clone()))
    }

    async fn set_refresh_token_hash(
        &self,
        id: Uuid,
        token_hash: Option<&str>,
    ) -> Result<bool, anyhow::Error> {
        let mut tables = self.tables();
        match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.refresh_token_hash = token_hash.map(str::to_string);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_to_watch_history(&self, id: Uuid, video_id: Uuid) -> Result<bool, anyhow::Error> {
        let mut tables = self.tables();
        match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) if !user.watch_history.contains(&video_id) => {
                user.watch_history.push(video_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl VideoRepository for InMemoryStore {
    async fn create(&self, new_video: NewVideo) -> Result<Video, anyhow::Error> {
        let mut tables = self.tables();
        if !tables.users.iter().any(|u| u.id == new_video.owner) {
            bail!("owner {} does not exist", new_video.owner);
        }

        let now = tables.now();
        let video = Video {
            id: Uuid::new_v4(),
            title: new_video.title,
            description: new_video.description,
            video_file: new_video.video_file,
            thumbnail: new_video.thumbnail,
            duration: new_video.duration,
            views: 0,
            is_published: new_video.is_published,
            owner: new_video.owner,
            created_at: now,
            updated_at: now,
        };
        tables.videos.push(video.clone());
        Ok(video)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, anyhow::Error> {
        Ok(self.tables().videos.iter().find(|v| v.id == id).cloned())
    }

    async fn update(&self, id: Uuid, update: UpdateVideo) -> Result<Option<Video>, anyhow::Error> {
        let mut tables = self.tables();
        let now = tables.now();
        let Some(video) = tables.videos.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };

        if let Some(title) = update.title {
            video.title = title;
        }
        if let Some(description) = update.description {
            video.description = description;
        }
        if let Some(thumbnail) = update.thumbnail {
            video.thumbnail = thumbnail;
        }
        if let Some(is_published) = update.is_published {
            video.is_published = is_published;
        }
        video.updated_at = now;

        Ok(Some(video.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Video>, anyhow::Error> {
        let mut tables = self.tables();
        let position = tables.videos.iter().position(|v| v.id == id);
        Ok(position.map(|i| tables.videos.remove(i)))
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>, anyhow::Error> {
        let mut tables = self.tables();
        Ok(tables.videos.iter_mut().find(|v| v.id == id).map(|video| {
            video.views += 1;
            video.views
        }))
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn create(&self, video: Uuid, liked_by: Uuid) -> Result<bool, anyhow::Error> {
        let mut tables = self.tables();
        if tables
            .likes
            .iter()
            .any(|l| l.video == video && l.liked_by == liked_by)
        {
            return Ok(false);
        }

        let created_at = tables.now();
        tables.likes.push(Like {
            id: Uuid::new_v4(),
            video,
            liked_by,
            created_at,
        });
        Ok(true)
    }

    async fn delete(&self, video: Uuid, liked_by: Uuid) -> Result<bool, anyhow::Error> {
        let mut tables = self.tables();
        let before = tables.likes.len();
        tables
            .likes
            .retain(|l| !(l.video == video && l.liked_by == liked_by));
        Ok(tables.likes.len() < before)
    }

    async fn exists(&self, video: Uuid, liked_by: Uuid) -> Result<bool, anyhow::Error> {
        Ok(self
            .tables()
            .likes
            .iter()
            .any(|l| l.video == video && l.liked_by == liked_by))
    }

    async fn delete_by_video(&self, video: Uuid) -> Result<u64, anyhow::Error> {
        let mut tables = self.tables();
        let before = tables.likes.len();
        tables.likes.retain(|l| l.video != video);
        Ok((before - tables.likes.len()) as u64)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, anyhow::Error> {
        let mut tables = self.tables();
        let now = tables.now();
        let comment = Comment {
            id: Uuid::new_v4(),
            content: new_comment.content,
            video: new_comment.video,
            owner: new_comment.owner,
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn delete_by_video(&self, video: Uuid) -> Result<u64, anyhow::Error> {
        let mut tables = self.tables();
        let before = tables.comments.len();
        tables.comments.retain(|c| c.video != video);
        Ok((before - tables.comments.len()) as u64)
    }
}

#[async_trait]
impl AggregationStore for InMemoryStore {
    async fn aggregate(
        &self,
        from: Collection,
        pipeline: &Pipeline,
    ) -> Result<Vec<Value>, anyhow::Error> {
        self.run(from, pipeline)
    }

    async fn aggregate_paginate(
        &self,
        from: Collection,
        pipeline: &Pipeline,
        page: PageRequest,
    ) -> Result<Page<Value>, anyhow::Error> {
        let docs = self.run(from, pipeline)?;
        let total = docs.len() as u64;
        let items = docs
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn ping(&self) -> Result<(), anyhow::Error> {
        Ok(())
    }
}
