use crate::{
	model::{Comment, NewPost, Paginate, Post, PostChanges},
	store::{comment, post, Error},
	Database,
};

/// Composes posts with their comments and runs the operations that
/// touch both tables.
#[derive(Clone)]
pub struct Blog {
	database: Database,
}

impl Blog {
	pub fn new(database: Database) -> Self {
		Self { database }
	}

	/// Returns a post with its comments attached.
	#[tracing::instrument(skip(self))]
	pub async fn get_post_with_comments(&self, id: i64) -> Result<Post, Error> {
		let mut conn = self.database.acquire().await?;

		let mut post = post::get(&mut *conn, id).await?;
		post.comments = comment::list_by_post(&mut *conn, id).await?;

		Ok(post)
	}

	/// Returns a page of posts matching `search`, each with its comments,
	/// and the number of matching posts across all pages.
	#[tracing::instrument(skip(self))]
	pub async fn list_posts_paged(
		&self,
		search: &str,
		paginate: Paginate,
	) -> Result<(Vec<Post>, i64), Error> {
		let mut conn = self.database.acquire().await?;

		let mut posts = post::list(&mut *conn, search, paginate).await?;
		let total = post::count(&mut *conn, search).await?;

		for post in &mut posts {
			post.comments = comment::list_by_post(&mut *conn, post.id).await?;
		}

		Ok((posts, total))
	}

	#[tracing::instrument(skip_all, fields(title = %input.title))]
	pub async fn create_post(&self, input: &NewPost) -> Result<i64, Error> {
		let id = post::create(&self.database, input).await?;

		tracing::info!(monotonic_counter.posts_created = 1_u64, post = id, "post created");

		Ok(id)
	}

	/// Applies a partial edit to a post.
	///
	/// The row stays locked between the read and the write, so a like that
	/// arrives meanwhile is not overwritten.
	#[tracing::instrument(skip(self, changes))]
	pub async fn update_post(&self, id: i64, changes: PostChanges) -> Result<(), Error> {
		let mut tx = self.database.begin().await?;

		let mut post = post::get_for_update(&mut *tx, id).await?;
		changes.apply(&mut post);
		post::update(&mut *tx, &post).await?;

		tx.commit().await?;

		Ok(())
	}

	/// Deletes a post and all of its comments.
	///
	/// Comments go first; the post row is removed last.
	#[tracing::instrument(skip(self))]
	pub async fn delete_post_cascade(&self, id: i64) -> Result<(), Error> {
		let mut tx = self.database.begin().await?;

		let comments = comment::delete_all_by_post(&mut *tx, id).await?;
		post::delete(&mut *tx, id).await?;

		tx.commit().await?;

		tracing::info!(post = id, comments, "post deleted");

		Ok(())
	}

	/// Likes (`increment`) or dislikes a post, returning the new count.
	#[tracing::instrument(skip(self))]
	pub async fn change_likes(&self, id: i64, increment: bool) -> Result<i32, Error> {
		let delta = if increment { 1 } else { -1 };
		let likes = post::change_likes(&self.database, id, delta).await?;

		if increment {
			tracing::info!(monotonic_counter.post_likes = 1_u64, post = id);
		} else {
			tracing::info!(monotonic_counter.post_dislikes = 1_u64, post = id);
		}

		Ok(likes)
	}

	/// Returns the image of a post.
	#[tracing::instrument(skip(self))]
	pub async fn post_image(&self, id: i64) -> Result<Vec<u8>, Error> {
		post::get_image(&self.database, id)
			.await?
			.ok_or(Error::MissingImage(id))
	}

	#[tracing::instrument(skip(self, text))]
	pub async fn add_comment(&self, post_id: i64, text: &str) -> Result<Comment, Error> {
		let mut conn = self.database.acquire().await?;

		let id = comment::create(&mut *conn, post_id, text).await?;
		let comment = comment::get(&mut *conn, id).await?;

		tracing::info!(monotonic_counter.comments_created = 1_u64, post = post_id, comment = id);

		Ok(comment)
	}

	/// Replaces the text of a comment that belongs to `post_id`.
	#[tracing::instrument(skip(self, text))]
	pub async fn update_comment(&self, post_id: i64, id: i64, text: &str) -> Result<Comment, Error> {
		let mut conn = self.database.acquire().await?;

		let mut comment = comment::get(&mut *conn, id).await?;

		if comment.post_id != post_id {
			return Err(Error::UnknownComment(id));
		}

		comment::update(&mut *conn, id, text).await?;
		comment.text = text.to_owned();

		Ok(comment)
	}

	/// Deletes a comment that belongs to `post_id`. A missing comment is not an error.
	#[tracing::instrument(skip(self))]
	pub async fn delete_comment(&self, post_id: i64, id: i64) -> Result<(), Error> {
		let mut conn = self.database.acquire().await?;

		match comment::get(&mut *conn, id).await {
			Ok(comment) if comment.post_id == post_id => comment::delete(&mut *conn, id).await,
			Ok(..) => Err(Error::UnknownComment(id)),
			Err(Error::UnknownComment(..)) => Ok(()),
			Err(e) => Err(e),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn new_post(title: &str, tags: &str) -> NewPost {
		NewPost {
			title: title.into(),
			image: Some(b"image".to_vec()),
			tags: tags.into(),
			text: format!("{title} text"),
		}
	}

	#[sqlx::test]
	async fn test_get_post_with_comments(pool: Database) {
		let blog = Blog::new(pool);
		let id = blog.create_post(&new_post("Post 1", "Tag1")).await.unwrap();

		blog.add_comment(id, "C1").await.unwrap();
		blog.add_comment(id, "C2").await.unwrap();

		let post = blog.get_post_with_comments(id).await.unwrap();
		let texts = post.comments.iter().map(|c| c.text.as_str()).collect::<Vec<_>>();

		assert_eq!(post.title, "Post 1");
		assert_eq!(texts, ["C1", "C2"]);
	}

	#[sqlx::test]
	async fn test_get_unknown_post(pool: Database) {
		let blog = Blog::new(pool);

		assert!(matches!(
			blog.get_post_with_comments(7).await,
			Err(Error::UnknownPost(7))
		));
	}

	#[sqlx::test]
	async fn test_list_posts_paged(pool: Database) {
		let blog = Blog::new(pool);
		let a = blog.create_post(&new_post("A", "Tag1 Tag2")).await.unwrap();
		let b = blog.create_post(&new_post("B", "Tag2 Tag3")).await.unwrap();
		blog.create_post(&new_post("C", "Tag3")).await.unwrap();

		blog.add_comment(b, "on b").await.unwrap();

		let (posts, total) = blog
			.list_posts_paged("Tag2", Paginate { page: 1, size: 1 })
			.await
			.unwrap();

		assert_eq!(total, 2);
		assert_eq!(posts.len(), 1);
		assert_eq!(posts[0].id, a);

		let (posts, total) = blog
			.list_posts_paged("Tag2", Paginate { page: 2, size: 1 })
			.await
			.unwrap();

		assert_eq!(total, 2);
		assert_eq!(posts[0].id, b);
		assert_eq!(posts[0].comments.len(), 1);
		assert_eq!(posts[0].comments[0].text, "on b");
	}

	#[sqlx::test]
	async fn test_like_then_dislike(pool: Database) {
		let blog = Blog::new(pool);
		let id = blog.create_post(&new_post("Post", "")).await.unwrap();

		assert_eq!(blog.change_likes(id, true).await.unwrap(), 1);
		assert_eq!(blog.change_likes(id, false).await.unwrap(), 0);
		assert_eq!(blog.get_post_with_comments(id).await.unwrap().likes_count, 0);
	}

	#[sqlx::test]
	async fn test_delete_post_cascade(pool: Database) {
		let blog = Blog::new(pool.clone());
		let id = blog.create_post(&new_post("Post", "")).await.unwrap();
		let other = blog.create_post(&new_post("Other", "")).await.unwrap();

		blog.add_comment(id, "C1").await.unwrap();
		blog.add_comment(id, "C2").await.unwrap();
		blog.add_comment(other, "C3").await.unwrap();

		blog.delete_post_cascade(id).await.unwrap();

		assert!(comment::list_by_post(&pool, id).await.unwrap().is_empty());
		assert!(matches!(
			blog.get_post_with_comments(id).await,
			Err(Error::UnknownPost(..))
		));
		assert_eq!(comment::list_by_post(&pool, other).await.unwrap().len(), 1);

		// deleting again is a no-op
		blog.delete_post_cascade(id).await.unwrap();
	}

	#[sqlx::test]
	async fn test_update_post_keeps_likes(pool: Database) {
		let blog = Blog::new(pool);
		let id = blog.create_post(&new_post("Post", "old")).await.unwrap();

		blog.change_likes(id, true).await.unwrap();
		blog.update_post(
			id,
			PostChanges {
				tags: Some("new tags".into()),
				..Default::default()
			},
		)
		.await
		.unwrap();

		let post = blog.get_post_with_comments(id).await.unwrap();

		assert_eq!(post.tags, "new tags");
		assert_eq!(post.title, "Post");
		assert_eq!(post.image.as_deref(), Some(&b"image"[..]));
		assert_eq!(post.likes_count, 1);
		assert!(matches!(
			blog.update_post(999, PostChanges::default()).await,
			Err(Error::UnknownPost(999))
		));
	}

	#[sqlx::test]
	async fn test_post_image(pool: Database) {
		let blog = Blog::new(pool);
		let with = blog.create_post(&new_post("With", "")).await.unwrap();
		let without = blog
			.create_post(&NewPost {
				image: None,
				..new_post("Without", "")
			})
			.await
			.unwrap();

		assert_eq!(blog.post_image(with).await.unwrap(), b"image");
		assert!(matches!(
			blog.post_image(without).await,
			Err(Error::MissingImage(..))
		));
		assert!(matches!(
			blog.post_image(999).await,
			Err(Error::UnknownPost(999))
		));
	}

	#[sqlx::test]
	async fn test_delete_comment(pool: Database) {
		let blog = Blog::new(pool);
		let id = blog.create_post(&new_post("Post", "")).await.unwrap();

		let c1 = blog.add_comment(id, "C1").await.unwrap();
		blog.add_comment(id, "C2").await.unwrap();

		blog.delete_comment(id, c1.id).await.unwrap();
		blog.delete_comment(id, c1.id).await.unwrap();

		let post = blog.get_post_with_comments(id).await.unwrap();
		let texts = post.comments.iter().map(|c| c.text.as_str()).collect::<Vec<_>>();

		assert_eq!(texts, ["C2"]);
	}

	#[sqlx::test]
	async fn test_comments_are_scoped_to_post(pool: Database) {
		let blog = Blog::new(pool);
		let a = blog.create_post(&new_post("A", "")).await.unwrap();
		let b = blog.create_post(&new_post("B", "")).await.unwrap();
		let comment = blog.add_comment(a, "on a").await.unwrap();

		assert!(matches!(
			blog.update_comment(b, comment.id, "moved").await,
			Err(Error::UnknownComment(..))
		));
		assert!(matches!(
			blog.delete_comment(b, comment.id).await,
			Err(Error::UnknownComment(..))
		));

		let updated = blog.update_comment(a, comment.id, "edited").await.unwrap();

		assert_eq!(updated.text, "edited");
		assert_eq!(updated.post_id, a);
		assert!(matches!(
			blog.add_comment(999, "orphan").await,
			Err(Error::UnknownPost(999))
		));
	}
}
