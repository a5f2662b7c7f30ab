//! Listing parameters and results for comments on a post.

use serde::{Deserialize, Serialize};

pub use pagination::{PageRequest, PageRequestError, PaginationMetadata};

use super::Comment;

/// Order in which a post's comments are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

/// Query parameters for listing comments; passed to storage unmodified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filter {
    /// Page number and size, already validated.
    pub page: PageRequest,
    /// Creation-time ordering of the page.
    pub order: SortOrder,
}

impl Filter {
    pub fn new(page: PageRequest, order: SortOrder) -> Self {
        Self { page, order }
    }
}

/// One page of comments with its descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub metadata: PaginationMetadata,
}
