use axum::{extract::State, http::header, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Multipart, Path, Query},
	model::{NewPost, PostChanges},
	openapi::tag,
	service::Blog,
};

use super::{model, RouteError};

/// Get posts
/// Returns a page of posts with their comments, oldest first.
/// When `search` is set, only posts whose tags contain it are returned.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(blog): State<Blog>,
	Query(input): Query<model::SearchInput>,
) -> Result<Json<model::PostPage>, RouteError> {
	let paginate = input.paginate();
	let (posts, total) = blog.list_posts_paged(&input.search, paginate).await?;

	Ok(Json(model::PostPage {
		posts: posts.into_iter().map(model::Post::from).collect(),
		paging: model::Paging::new(total, paginate),
		search: input.search,
	}))
}

/// Get single post
/// Returns a single post and its comments by its unique id.
#[route(tag = tag::POST, response(status = 404, description = "The post does not exist"))]
pub async fn get_post(
	State(blog): State<Blog>,
	Path(path): Path<model::PostPath>,
) -> Result<Json<model::Post>, RouteError> {
	let post = blog.get_post_with_comments(path.id).await?;

	Ok(Json(post.into()))
}

/// Create post
/// Creates a new post from a multipart form with the fields
/// `title`, `text`, `tags` and an optional `image` file.
#[route(tag = tag::POST)]
pub async fn create_post(
	State(blog): State<Blog>,
	Multipart(form): Multipart<model::PostForm>,
) -> Result<Json<model::Post>, RouteError> {
	let input = NewPost::try_from(form)?;
	let id = blog.create_post(&input).await?;
	let post = blog.get_post_with_comments(id).await?;

	Ok(Json(post.into()))
}

/// Update post
/// Updates an existing post by its unique id. Fields that are not
/// part of the form keep their current value.
#[route(tag = tag::POST, response(status = 404, description = "The post does not exist"))]
pub async fn update_post(
	State(blog): State<Blog>,
	Path(path): Path<model::PostPath>,
	Multipart(form): Multipart<model::PostForm>,
) -> Result<Json<model::Post>, RouteError> {
	blog.update_post(path.id, PostChanges::from(form)).await?;
	let post = blog.get_post_with_comments(path.id).await?;

	Ok(Json(post.into()))
}

/// Delete post
/// Deletes a post and all of its comments. Deleting a missing post succeeds.
#[route(tag = tag::POST)]
pub async fn delete_post(
	State(blog): State<Blog>,
	Path(path): Path<model::PostPath>,
) -> Result<(), RouteError> {
	blog.delete_post_cascade(path.id).await?;

	Ok(())
}

/// Like post
/// Likes (`like=true`) or dislikes (`like=false`) a post.
#[route(tag = tag::POST, response(status = 404, description = "The post does not exist"))]
pub async fn like_post(
	State(blog): State<Blog>,
	Path(path): Path<model::PostPath>,
	Query(input): Query<model::LikeInput>,
) -> Result<Json<model::Likes>, RouteError> {
	let likes_count = blog.change_likes(path.id, input.like).await?;

	Ok(Json(model::Likes { likes_count }))
}

/// Returns the raw image of a post.
///
/// Not part of the API document, since the body is not JSON.
pub async fn get_post_image(
	State(blog): State<Blog>,
	Path(path): Path<model::PostPath>,
) -> Result<impl IntoResponse, RouteError> {
	let image = blog.post_image(path.id).await?;

	Ok((
		[(header::CONTENT_TYPE, "application/octet-stream")],
		image,
	))
}
