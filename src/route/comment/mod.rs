use aide::axum::{
	routing::{post_with, put_with},
	ApiRouter,
};

use crate::AppState;

pub use super::RouteError;

pub mod model;
pub mod route;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/:id/comments", post_with(create_comment, create_comment_docs))
		.api_route(
			"/:id/comments/:comment_id",
			put_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
}
