//! Read-only comment endpoints.
//!
//! ```text
//! GET /api/v1/posts/{post_id}/comments?page=1&page_size=20&order=oldest_first
//! GET /api/v1/comments/{comment_id}
//! ```
//!
//! Writes happen over the real-time protocol only; these endpoints serve the
//! initial snapshot a client reconciles its live view against.

use actix_web::{get, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{
    Comment, CommentId, CommentPage, Error, Filter, PageRequest, PageRequestError, PostId,
    SortOrder,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CommentPageSchema, CommentSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;

/// Query string for listing a post's comments.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCommentsQuery {
    /// One-based page number (default 1).
    #[param(minimum = 1, example = 1)]
    pub page: Option<u32>,
    /// Records per page, 1 to 100 (default 20).
    #[param(minimum = 1, maximum = 100, example = 20)]
    pub page_size: Option<u32>,
    /// `oldest_first` (default) or `newest_first`.
    #[param(value_type = Option<String>, example = "newest_first")]
    pub order: Option<SortOrder>,
}

impl TryFrom<ListCommentsQuery> for Filter {
    type Error = Error;

    fn try_from(value: ListCommentsQuery) -> Result<Self, Self::Error> {
        let page = PageRequest::from_parts(value.page, value.page_size)
            .map_err(map_page_request_error)?;
        Ok(Filter::new(page, value.order.unwrap_or_default()))
    }
}

fn map_page_request_error(err: PageRequestError) -> Error {
    let field = match err {
        PageRequestError::ZeroPage => "page",
        PageRequestError::PageSizeOutOfRange { .. } => "page_size",
    };
    Error::invalid_argument(err.to_string()).with_details(json!({ "field": field }))
}

fn parse_post_id(raw: String) -> Result<PostId, Error> {
    PostId::new(raw).map_err(|err| Error::invalid_id(err.to_string()))
}

fn parse_comment_id(raw: String) -> Result<CommentId, Error> {
    CommentId::new(raw).map_err(|err| Error::invalid_id(err.to_string()))
}

/// List one page of a post's comments.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use post_comments::inbound::http::comments::list_post_comments;
///
/// let app = App::new().service(web::scope("/api/v1").service(list_post_comments));
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments",
    params(
        ("post_id" = String, Path, description = "Post whose comments are listed"),
        ListCommentsQuery
    ),
    responses(
        (status = 200, description = "Page of comments", body = CommentPageSchema),
        (status = 400, description = "Invalid id or query", body = ErrorSchema),
        (status = 504, description = "Request deadline exceeded", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listPostComments"
)]
#[get("/posts/{post_id}/comments")]
pub async fn list_post_comments(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ListCommentsQuery>,
) -> ApiResult<web::Json<CommentPage>> {
    let post_id = parse_post_id(path.into_inner())?;
    let filter = Filter::try_from(query.into_inner())?;
    let ctx = state.request_context();
    let page = state
        .comments
        .list_by_post_id(&ctx, &post_id, &filter)
        .await?;
    Ok(web::Json(page))
}

/// Fetch a single comment.
#[utoipa::path(
    get,
    path = "/api/v1/comments/{comment_id}",
    params(("comment_id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment", body = CommentSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema),
        (status = 504, description = "Request deadline exceeded", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "getComment"
)]
#[get("/comments/{comment_id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Comment>> {
    let comment_id = parse_comment_id(path.into_inner())?;
    let ctx = state.request_context();
    let comment = state.comments.get_by_id(&ctx, &comment_id).await?;
    Ok(web::Json(comment))
}

/// Query extractor configuration replying with the domain error body.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_argument(err.to_string()).into()
    })
}

#[cfg(test)]
#[path = "comments_tests.rs"]
mod tests;
