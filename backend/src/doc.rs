//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the read-only comment endpoints, the health probes,
//! and the schema wrappers from [`crate::inbound::http::schemas`]. The
//! real-time protocol is served over WebSocket and is not described here.

use crate::inbound::http::schemas::{
    CommentPageSchema, CommentSchema, ErrorCodeSchema, ErrorSchema, PaginationMetadataSchema,
    UserSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Post comments API",
        description = "Read access to post comments and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::comments::list_post_comments,
        crate::inbound::http::comments::get_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CommentSchema,
        CommentPageSchema,
        PaginationMetadataSchema,
        UserSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "comments", description = "Reading comments on posts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
