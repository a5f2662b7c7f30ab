//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers below mirror their wire shape and are registered under the
//! domain type names, so handlers reference them in `utoipa::path` bodies.

#![expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// An identifier is malformed.
    #[schema(rename = "invalid_id")]
    InvalidId,
    /// A query parameter or body fails validation.
    #[schema(rename = "invalid_argument")]
    InvalidArgument,
    #[schema(rename = "user_not_found")]
    UserNotFound,
    #[schema(rename = "comment_not_found")]
    CommentNotFound,
    /// The caller may not act on the comment.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The request deadline elapsed.
    #[schema(rename = "cancelled")]
    Cancelled,
    #[schema(rename = "internal")]
    Internal,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "comment_not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "comment C1 not found")]
    message: String,
    /// Supplementary error details.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`], the author snapshot embedded in
/// each comment.
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
pub struct UserSchema {
    #[schema(example = 42, minimum = 1)]
    id: i64,
    #[schema(example = "Ann")]
    name: String,
    avatar_url: Option<String>,
}

/// OpenAPI schema for [`crate::domain::Comment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Comment)]
pub struct CommentSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "P1")]
    post_id: String,
    user: UserSchema,
    #[schema(example = "Nice post!", max_length = 4000)]
    body: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::PaginationMetadata`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PaginationMetadata)]
pub struct PaginationMetadataSchema {
    current_page: u32,
    page_size: u32,
    first_page: u32,
    last_page: u32,
    total_records: u64,
}

/// OpenAPI schema for [`crate::domain::CommentPage`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CommentPage)]
pub struct CommentPageSchema {
    comments: Vec<CommentSchema>,
    metadata: PaginationMetadataSchema,
}
