use schemars::JsonSchema;
use serde::Serialize;

/// A single blog post.
///
/// `comments` is not a column; it is filled in by [`crate::service::Blog`]
/// when the post is read together with its comments.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
	pub id: i64,
	pub title: String,
	/// Raw image bytes, stored as uploaded.
	pub image: Option<Vec<u8>>,
	pub text: String,
	/// Whitespace-separated list of tags.
	pub tags: String,
	pub likes_count: i32,
	pub created_at: chrono::DateTime<chrono::Utc>,
	#[sqlx(skip)]
	pub comments: Vec<Comment>,
}

impl Post {
	/// Returns the tags in the order they were written.
	pub fn tags(&self) -> impl Iterator<Item = &str> {
		self.tags.split_whitespace()
	}
}

/// A comment, owned by exactly one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Comment {
	/// The unique identifier of the comment.
	pub id: i64,
	/// The post that the comment belongs to.
	pub post_id: i64,
	/// The content of the comment.
	pub text: String,
	/// The creation time of the comment.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The fields required to create a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
	pub title: String,
	pub image: Option<Vec<u8>>,
	pub tags: String,
	pub text: String,
}

/// A partial edit of a post. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
	pub title: Option<String>,
	pub image: Option<Vec<u8>>,
	pub tags: Option<String>,
	pub text: Option<String>,
}

impl PostChanges {
	/// Applies the provided fields to `post`, leaving the like counter untouched.
	pub fn apply(self, post: &mut Post) {
		if let Some(title) = self.title {
			post.title = title;
		}

		if let Some(image) = self.image {
			post.image = Some(image);
		}

		if let Some(tags) = self.tags {
			post.tags = tags;
		}

		if let Some(text) = self.text {
			post.text = text;
		}
	}
}

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginate {
	pub page: i64,
	pub size: i64,
}

impl Paginate {
	/// Saturates instead of overflowing for pages far past the end.
	pub fn offset(&self) -> i64 {
		(self.page - 1).max(0).saturating_mul(self.size)
	}

	pub fn limit(&self) -> i64 {
		self.size
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn post(tags: &str) -> Post {
		Post {
			id: 1,
			title: "Post 1".into(),
			image: Some(b"Post Image Content One".to_vec()),
			text: "Post Text1".into(),
			tags: tags.into(),
			likes_count: 10,
			created_at: chrono::Utc::now(),
			comments: Vec::new(),
		}
	}

	#[test]
	fn test_paginate_offset() {
		let mut paginate = Paginate { page: 1, size: 10 };

		assert_eq!(paginate.offset(), 0);

		paginate.page = 2;

		assert_eq!(paginate.offset(), 10);

		paginate.size = 5;

		assert_eq!(paginate.offset(), 5);

		paginate.page = 3;

		assert_eq!(paginate.offset(), 10);
	}

	#[test]
	fn test_paginate_offset_saturates() {
		let paginate = Paginate {
			page: i64::MAX,
			size: 100,
		};

		assert_eq!(paginate.offset(), i64::MAX);
	}

	#[test]
	fn test_paginate_limit() {
		let paginate = Paginate { page: 1, size: 10 };

		assert_eq!(paginate.limit(), 10);
	}

	#[test]
	fn test_tags_split_on_any_whitespace() {
		let tagged = post("  Tag1\tTag2 \n Tag3  ");
		let untagged = post("");

		assert_eq!(tagged.tags().collect::<Vec<_>>(), ["Tag1", "Tag2", "Tag3"]);
		assert_eq!(untagged.tags().count(), 0);
	}

	#[test]
	fn test_changes_keep_missing_fields() {
		let mut post = post("Tag1 Tag2");

		PostChanges {
			title: Some("Updated".into()),
			tags: Some("updated post".into()),
			..Default::default()
		}
		.apply(&mut post);

		assert_eq!(post.title, "Updated");
		assert_eq!(post.tags, "updated post");
		assert_eq!(post.text, "Post Text1");
		assert_eq!(post.image.as_deref(), Some(&b"Post Image Content One"[..]));
		assert_eq!(post.likes_count, 10);
	}

	#[test]
	fn test_changes_replace_image() {
		let mut post = post("");

		PostChanges {
			image: Some(b"new".to_vec()),
			..Default::default()
		}
		.apply(&mut post);

		assert_eq!(post.image.as_deref(), Some(&b"new"[..]));
	}
}
