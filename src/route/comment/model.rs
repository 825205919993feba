use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

pub use crate::{model::Comment, route::model::PostPath};

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CommentPath {
	/// The unique identifier of the post.
	#[validate(range(min = 1))]
	pub id: i64,
	/// The unique identifier of the comment.
	#[validate(range(min = 1))]
	pub comment_id: i64,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CommentInput {
	/// The content of the comment.
	#[validate(length(min = 1, max = 4096))]
	pub text: String,
}
