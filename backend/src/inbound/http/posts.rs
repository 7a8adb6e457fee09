//! Post, like and comment HTTP handlers.
//!
//! ```text
//! GET    /api/posts
//! POST   /api/posts
//! PUT    /api/posts/{id}
//! DELETE /api/posts/{id}
//! POST   /api/posts/{id}/like
//! POST   /api/posts/{id}/comment
//! DELETE /api/posts/{post_id}/comment/{comment_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{AddCommentRequest, CreatePostRequest, EditCaptionRequest};
use crate::domain::{CommentId, PostId, PostView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, PostSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_id};

const POST_ID: FieldName = FieldName::new("postId");
const COMMENT_ID: FieldName = FieldName::new("commentId");

/// Request payload for publishing a post.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    #[schema(example = "Hello plants")]
    pub caption: Option<String>,
    /// Filename of an already stored image.
    #[schema(example = "1717171717-monstera.jpg")]
    pub image: Option<String>,
}

/// Request payload for editing a caption.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct EditCaptionBody {
    pub caption: Option<String>,
}

/// Request payload for commenting on a post.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommentBody {
    #[schema(example = "Lovely fern!")]
    pub text: Option<String>,
}

/// Confirmation returned by delete endpoints.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Post deleted")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// List every post, newest first, with authors populated.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "Posts, newest first", body = Vec<PostSchema>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<PostView>>> {
    let posts = state.posts_query.list_posts().await?;
    Ok(web::Json(posts))
}

/// Publish a post authored by the caller.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostBody,
    responses(
        (status = 201, description = "Created post", body = PostSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreatePostBody>,
) -> ApiResult<HttpResponse> {
    let CreatePostBody { caption, image } = payload.into_inner();
    let caption = caption.ok_or_else(|| missing_field_error(FieldName::new("caption")))?;

    let post = state
        .posts
        .create_post(CreatePostRequest {
            author_id: caller.id(),
            caption,
            image_ref: image,
        })
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// Replace the caption of the caller's own post.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    request_body = EditCaptionBody,
    responses(
        (status = 200, description = "Updated post", body = PostSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Caller is not the author", body = ErrorSchema),
        (status = 404, description = "Post not found", body = ErrorSchema),
        (status = 409, description = "Concurrent update", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "editCaption"
)]
#[put("/posts/{id}")]
pub async fn edit_caption(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<EditCaptionBody>,
) -> ApiResult<web::Json<PostView>> {
    let post_id: PostId = parse_id(&path, POST_ID)?;
    let caption = payload
        .into_inner()
        .caption
        .ok_or_else(|| missing_field_error(FieldName::new("caption")))?;

    let post = state
        .posts
        .edit_caption(EditCaptionRequest {
            post_id,
            actor_id: caller.id(),
            caption,
        })
        .await?;
    Ok(web::Json(post))
}

/// Delete the caller's own post together with its comments and likes.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 403, description = "Caller is not the author", body = ErrorSchema),
        (status = 404, description = "Post not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let post_id: PostId = parse_id(&path, POST_ID)?;
    state.posts.delete_post(post_id, caller.id()).await?;
    Ok(web::Json(MessageResponse::new("Post deleted")))
}

/// Like the post, or remove the caller's like if already present.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Updated post", body = PostSchema),
        (status = 404, description = "Post not found", body = ErrorSchema),
        (status = 409, description = "Concurrent update", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "toggleLike"
)]
#[post("/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostView>> {
    let post_id: PostId = parse_id(&path, POST_ID)?;
    let post = state.posts.toggle_like(post_id, caller.id()).await?;
    Ok(web::Json(post))
}

/// Append a comment by the caller.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comment",
    params(("id" = String, Path, description = "Post id")),
    request_body = CommentBody,
    responses(
        (status = 200, description = "Updated post", body = PostSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Post not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "addComment"
)]
#[post("/posts/{id}/comment")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<CommentBody>,
) -> ApiResult<web::Json<PostView>> {
    let post_id: PostId = parse_id(&path, POST_ID)?;
    let text = payload
        .into_inner()
        .text
        .ok_or_else(|| missing_field_error(FieldName::new("text")))?;

    let post = state
        .posts
        .add_comment(AddCommentRequest {
            post_id,
            actor_id: caller.id(),
            text,
        })
        .await?;
    Ok(web::Json(post))
}

/// Remove one of the caller's comments.
#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}/comment/{comment_id}",
    params(
        ("post_id" = String, Path, description = "Post id"),
        ("comment_id" = String, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Updated post", body = PostSchema),
        (status = 403, description = "Caller did not write the comment", body = ErrorSchema),
        (status = 404, description = "Post or comment not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deleteComment"
)]
#[delete("/posts/{post_id}/comment/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<PostView>> {
    let (raw_post, raw_comment) = path.into_inner();
    let post_id: PostId = parse_id(&raw_post, POST_ID)?;
    let comment_id: CommentId = parse_id(&raw_comment, COMMENT_ID)?;

    let post = state
        .posts
        .delete_comment(post_id, comment_id, caller.id())
        .await?;
    Ok(web::Json(post))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
