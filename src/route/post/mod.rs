use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::routing::get;

use crate::AppState;

pub use super::RouteError;

pub mod model;
pub mod route;

pub fn routes(state: AppState) -> ApiRouter {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
		.api_route("/:id/like", post_with(like_post, like_post_docs))
		.route("/:id/image", get(get_post_image))
		.merge(super::comment::routes())
		.with_state(state)
}
