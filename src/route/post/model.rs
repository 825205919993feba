pub use crate::route::model::{PostPath, SearchInput};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
	error::AppError,
	extract::{Fields, File, FromMultipart},
	model::{self, Comment, NewPost, Paginate, PostChanges},
};

/// Number of characters of the text shown in a preview.
pub const PREVIEW_LENGTH: usize = 300;

/// A single post, ready to be rendered.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Post {
	/// The unique identifier of the post.
	pub id: i64,
	/// The title of the post.
	pub title: String,
	/// The full text of the post.
	pub text: String,
	/// The first characters of the text, for post listings.
	pub text_preview: String,
	/// The text split into lines.
	pub text_parts: Vec<String>,
	/// The tags of the post, in order.
	pub tags: Vec<String>,
	/// The tags as they were entered.
	pub tags_as_text: String,
	/// The number of likes minus the number of dislikes.
	pub likes_count: i32,
	/// Whether `GET /posts/{id}/image` returns an image.
	pub has_image: bool,
	/// The creation time of the post.
	pub created_at: chrono::DateTime<chrono::Utc>,
	/// The comments of the post, oldest first.
	pub comments: Vec<Comment>,
}

impl From<model::Post> for Post {
	fn from(post: model::Post) -> Self {
		Self {
			id: post.id,
			text_preview: preview(&post.text),
			text_parts: post.text.split('\n').map(str::to_owned).collect(),
			tags: post.tags().map(str::to_owned).collect(),
			has_image: post.image.is_some(),
			title: post.title,
			text: post.text,
			tags_as_text: post.tags,
			likes_count: post.likes_count,
			created_at: post.created_at,
			comments: post.comments,
		}
	}
}

fn preview(text: &str) -> String {
	match text.char_indices().nth(PREVIEW_LENGTH) {
		Some((end, _)) => format!("{}...", &text[..end]),
		None => text.to_owned(),
	}
}

/// Pagination details of a post listing.
#[derive(Debug, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Paging {
	/// The number of posts across all pages.
	pub total: i64,
	/// The current page (1-indexed).
	pub page: i64,
	/// The number of posts per page.
	pub size: i64,
	/// The number of pages.
	pub pages: i64,
	pub has_previous: bool,
	pub has_next: bool,
}

impl Paging {
	pub fn new(total: i64, paginate: Paginate) -> Self {
		Self {
			total,
			page: paginate.page,
			size: paginate.size,
			pages: (total + paginate.size - 1) / paginate.size,
			has_previous: paginate.page > 1,
			has_next: paginate.page.saturating_mul(paginate.size) < total,
		}
	}
}

/// A page of posts.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PostPage {
	pub posts: Vec<Post>,
	pub paging: Paging,
	/// The search the posts were filtered with.
	pub search: String,
}

/// The multipart form used to create or edit a post.
///
/// Every field is optional when editing; `title` and `text` are
/// required when creating.
#[derive(Debug, Validate, JsonSchema)]
pub struct PostForm {
	#[validate(length(min = 1, max = 256))]
	pub title: Option<String>,
	/// An image file, stored as-is.
	#[schemars(with = "Option<File>")]
	pub image: Option<Vec<u8>>,
	#[validate(length(max = 1024))]
	pub tags: Option<String>,
	pub text: Option<String>,
}

impl FromMultipart for PostForm {
	fn from_multipart(fields: Fields) -> Result<Self, AppError> {
		Ok(Self {
			title: fields.text("title")?,
			image: fields.file("image"),
			tags: fields.text("tags")?,
			text: fields.text("text")?,
		})
	}
}

impl TryFrom<PostForm> for NewPost {
	type Error = AppError;

	fn try_from(form: PostForm) -> Result<Self, Self::Error> {
		Ok(Self {
			title: form.title.ok_or(AppError::MissingField("title"))?,
			image: form.image,
			tags: form.tags.unwrap_or_default(),
			text: form.text.ok_or(AppError::MissingField("text"))?,
		})
	}
}

impl From<PostForm> for PostChanges {
	fn from(form: PostForm) -> Self {
		Self {
			title: form.title,
			image: form.image,
			tags: form.tags,
			text: form.text,
		}
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LikeInput {
	/// `true` to like the post, `false` to dislike it.
	pub like: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct Likes {
	/// The new number of likes.
	pub likes_count: i32,
}
