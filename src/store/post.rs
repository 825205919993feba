use sqlx::PgExecutor;

use crate::model::{NewPost, Paginate, Post};

use super::Error;

/// Returns a page of posts whose tags contain `search`, oldest first.
///
/// An empty `search` matches every post. The match is a case-sensitive
/// substring test, so `Tag1` also matches `Tag10`.
pub async fn list<'e, E>(executor: E, search: &str, paginate: Paginate) -> Result<Vec<Post>, Error>
where
	E: PgExecutor<'e>,
{
	let posts = sqlx::query_as::<_, Post>(
		r#"
			SELECT id, title, image, text, tags, likes_count, created_at
			FROM post
			WHERE $1 = '' OR strpos(tags, $1) > 0
			ORDER BY id ASC
			LIMIT $2 OFFSET $3
		"#,
	)
	.bind(search)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(executor)
	.await?;

	Ok(posts)
}

/// Counts the posts matched by [`list`] with the same `search`.
pub async fn count<'e, E>(executor: E, search: &str) -> Result<i64, Error>
where
	E: PgExecutor<'e>,
{
	let count = sqlx::query_scalar::<_, i64>(
		r#"
			SELECT COUNT(*) FROM post
			WHERE $1 = '' OR strpos(tags, $1) > 0
		"#,
	)
	.bind(search)
	.fetch_one(executor)
	.await?;

	Ok(count)
}

/// Inserts a new post with no likes, returning its id.
pub async fn create<'e, E>(executor: E, post: &NewPost) -> Result<i64, Error>
where
	E: PgExecutor<'e>,
{
	let id = sqlx::query_scalar::<_, i64>(
		r#"
			INSERT INTO post (title, image, text, tags)
			VALUES ($1, $2, $3, $4)
			RETURNING id
		"#,
	)
	.bind(&post.title)
	.bind(post.image.as_deref())
	.bind(&post.text)
	.bind(&post.tags)
	.fetch_one(executor)
	.await?;

	Ok(id)
}

pub async fn get<'e, E>(executor: E, id: i64) -> Result<Post, Error>
where
	E: PgExecutor<'e>,
{
	let post = sqlx::query_as::<_, Post>(
		r#"
			SELECT id, title, image, text, tags, likes_count, created_at
			FROM post
			WHERE id = $1
		"#,
	)
	.bind(id)
	.fetch_optional(executor)
	.await?;

	post.ok_or(Error::UnknownPost(id))
}

/// Same as [`get`], but locks the row until the surrounding transaction ends.
pub async fn get_for_update<'e, E>(executor: E, id: i64) -> Result<Post, Error>
where
	E: PgExecutor<'e>,
{
	let post = sqlx::query_as::<_, Post>(
		r#"
			SELECT id, title, image, text, tags, likes_count, created_at
			FROM post
			WHERE id = $1
			FOR UPDATE
		"#,
	)
	.bind(id)
	.fetch_optional(executor)
	.await?;

	post.ok_or(Error::UnknownPost(id))
}

/// Overwrites every mutable field of the post with the same id.
pub async fn update<'e, E>(executor: E, post: &Post) -> Result<(), Error>
where
	E: PgExecutor<'e>,
{
	let status = sqlx::query(
		r#"
			UPDATE post
			SET title = $1, image = $2, text = $3, tags = $4, likes_count = $5
			WHERE id = $6
		"#,
	)
	.bind(&post.title)
	.bind(post.image.as_deref())
	.bind(&post.text)
	.bind(&post.tags)
	.bind(post.likes_count)
	.bind(post.id)
	.execute(executor)
	.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownPost(post.id));
	}

	Ok(())
}

/// Deletes a post. Deleting a post that does not exist is not an error.
///
/// Comments must be removed first with [`super::comment::delete_all_by_post`].
pub async fn delete<'e, E>(executor: E, id: i64) -> Result<(), Error>
where
	E: PgExecutor<'e>,
{
	sqlx::query("DELETE FROM post WHERE id = $1")
		.bind(id)
		.execute(executor)
		.await?;

	Ok(())
}

/// Adds `delta` to the like counter in a single statement and returns the new value.
pub async fn change_likes<'e, E>(executor: E, id: i64, delta: i32) -> Result<i32, Error>
where
	E: PgExecutor<'e>,
{
	let likes = sqlx::query_scalar::<_, i32>(
		r#"
			UPDATE post
			SET likes_count = likes_count + $1
			WHERE id = $2
			RETURNING likes_count
		"#,
	)
	.bind(delta)
	.bind(id)
	.fetch_optional(executor)
	.await?;

	likes.ok_or(Error::UnknownPost(id))
}

/// Returns the stored image, or `None` if the post has no image.
pub async fn get_image<'e, E>(executor: E, id: i64) -> Result<Option<Vec<u8>>, Error>
where
	E: PgExecutor<'e>,
{
	let image = sqlx::query_scalar::<_, Option<Vec<u8>>>("SELECT image FROM post WHERE id = $1")
		.bind(id)
		.fetch_optional(executor)
		.await?;

	image.ok_or(Error::UnknownPost(id))
}
