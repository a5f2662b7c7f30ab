//! In-process comment storage.
//!
//! Implements every comment storage port over a single `RwLock<HashMap>`.
//! Writes are visible to the next read, so the service's fetch-then-mutate
//! sequences observe their own effects.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    CommentCreator, CommentDeleter, CommentProvider, CommentRepositoryError, CommentUpdater,
};
use crate::domain::{
    Comment, CommentId, CommentPage, Filter, PaginationMetadata, PostId, SortOrder,
};

/// Comment storage backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    comments: RwLock<HashMap<CommentId, Comment>>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing comments.
    pub fn with_comments(comments: impl IntoIterator<Item = Comment>) -> Self {
        let comments = comments
            .into_iter()
            .map(|comment| (comment.id.clone(), comment))
            .collect();
        Self {
            comments: RwLock::new(comments),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<CommentId, Comment>>, CommentRepositoryError> {
        self.comments
            .read()
            .map_err(|_| CommentRepositoryError::query("comment store lock poisoned"))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<CommentId, Comment>>, CommentRepositoryError> {
        self.comments
            .write()
            .map_err(|_| CommentRepositoryError::query("comment store lock poisoned"))
    }
}

fn page_of(mut comments: Vec<Comment>, filter: &Filter) -> CommentPage {
    comments.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    if filter.order == SortOrder::NewestFirst {
        comments.reverse();
    }

    let total = comments.len() as u64;
    let offset = usize::try_from(filter.page.offset()).unwrap_or(usize::MAX);
    let page_size = usize::try_from(filter.page.page_size()).unwrap_or(usize::MAX);
    let comments = comments.into_iter().skip(offset).take(page_size).collect();

    CommentPage {
        comments,
        metadata: PaginationMetadata::calculate(total, &filter.page),
    }
}

#[async_trait]
impl CommentProvider for InMemoryCommentStore {
    async fn get_comment(&self, comment_id: &CommentId) -> Result<Comment, CommentRepositoryError> {
        self.read()?
            .get(comment_id)
            .cloned()
            .ok_or_else(|| CommentRepositoryError::not_found(comment_id.as_str()))
    }

    async fn list_post_comments(
        &self,
        post_id: &PostId,
        filter: &Filter,
    ) -> Result<CommentPage, CommentRepositoryError> {
        let matching = self
            .read()?
            .values()
            .filter(|comment| &comment.post_id == post_id)
            .cloned()
            .collect();
        Ok(page_of(matching, filter))
    }
}

#[async_trait]
impl CommentCreator for InMemoryCommentStore {
    async fn create_comment(&self, comment: Comment) -> Result<Comment, CommentRepositoryError> {
        let mut comments = self.write()?;
        if comments.contains_key(&comment.id) {
            return Err(CommentRepositoryError::query(format!(
                "duplicate comment id {}",
                comment.id
            )));
        }
        comments.insert(comment.id.clone(), comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl CommentUpdater for InMemoryCommentStore {
    async fn update_comment(&self, comment: Comment) -> Result<Comment, CommentRepositoryError> {
        let mut comments = self.write()?;
        let Some(slot) = comments.get_mut(&comment.id) else {
            return Err(CommentRepositoryError::not_found(comment.id.as_str()));
        };
        *slot = comment.clone();
        Ok(comment)
    }
}

#[async_trait]
impl CommentDeleter for InMemoryCommentStore {
    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), CommentRepositoryError> {
        self.write()?
            .remove(comment_id)
            .map(|_| ())
            .ok_or_else(|| CommentRepositoryError::not_found(comment_id.as_str()))
    }
}
