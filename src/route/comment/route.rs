use axum::extract::State;
use macros::route;

use crate::{
	extract::{Json, Path},
	openapi::tag,
	service::Blog,
};

use super::{model, RouteError};

/// Create comment
/// Adds a comment to an existing post.
#[route(tag = tag::COMMENT, response(status = 404, description = "The post does not exist"))]
pub async fn create_comment(
	State(blog): State<Blog>,
	Path(path): Path<model::PostPath>,
	Json(input): Json<model::CommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = blog.add_comment(path.id, &input.text).await?;

	Ok(Json(comment))
}

/// Update comment
/// Replaces the text of a comment of a post.
#[route(tag = tag::COMMENT, response(status = 404, description = "The comment does not exist under this post"))]
pub async fn update_comment(
	State(blog): State<Blog>,
	Path(path): Path<model::CommentPath>,
	Json(input): Json<model::CommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = blog
		.update_comment(path.id, path.comment_id, &input.text)
		.await?;

	Ok(Json(comment))
}

/// Delete comment
/// Deletes a comment of a post. Deleting a missing comment succeeds.
#[route(tag = tag::COMMENT)]
pub async fn delete_comment(
	State(blog): State<Blog>,
	Path(path): Path<model::CommentPath>,
) -> Result<(), RouteError> {
	blog.delete_comment(path.id, path.comment_id).await?;

	Ok(())
}
