use sqlx::PgExecutor;

use crate::model::Comment;

use super::Error;

/// Name of the foreign key from `comment.post_id` to `post.id`.
const POST_FOREIGN_KEY: &str = "comment_post_id_fkey";

/// Returns the comments of a post, oldest first.
pub async fn list_by_post<'e, E>(executor: E, post_id: i64) -> Result<Vec<Comment>, Error>
where
	E: PgExecutor<'e>,
{
	let comments = sqlx::query_as::<_, Comment>(
		r#"
			SELECT id, post_id, text, created_at
			FROM comment
			WHERE post_id = $1
			ORDER BY id ASC
		"#,
	)
	.bind(post_id)
	.fetch_all(executor)
	.await?;

	Ok(comments)
}

pub async fn get<'e, E>(executor: E, id: i64) -> Result<Comment, Error>
where
	E: PgExecutor<'e>,
{
	let comment = sqlx::query_as::<_, Comment>(
		r#"
			SELECT id, post_id, text, created_at
			FROM comment
			WHERE id = $1
		"#,
	)
	.bind(id)
	.fetch_optional(executor)
	.await?;

	comment.ok_or(Error::UnknownComment(id))
}

/// Adds a comment to a post, returning its id.
///
/// Returns [`Error::UnknownPost`] if the post does not exist.
pub async fn create<'e, E>(executor: E, post_id: i64, text: &str) -> Result<i64, Error>
where
	E: PgExecutor<'e>,
{
	sqlx::query_scalar::<_, i64>(
		r#"
			INSERT INTO comment (post_id, text)
			VALUES ($1, $2)
			RETURNING id
		"#,
	)
	.bind(post_id)
	.bind(text)
	.fetch_one(executor)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) if d.constraint() == Some(POST_FOREIGN_KEY) => {
			Error::UnknownPost(post_id)
		}
		e => Error::Storage(e),
	})
}

/// Replaces the text of a comment.
pub async fn update<'e, E>(executor: E, id: i64, text: &str) -> Result<(), Error>
where
	E: PgExecutor<'e>,
{
	let status = sqlx::query("UPDATE comment SET text = $1 WHERE id = $2")
		.bind(text)
		.bind(id)
		.execute(executor)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownComment(id));
	}

	Ok(())
}

/// Deletes a comment. Deleting a comment that does not exist is not an error.
pub async fn delete<'e, E>(executor: E, id: i64) -> Result<(), Error>
where
	E: PgExecutor<'e>,
{
	sqlx::query("DELETE FROM comment WHERE id = $1")
		.bind(id)
		.execute(executor)
		.await?;

	Ok(())
}

/// Deletes every comment of a post, returning how many were removed.
pub async fn delete_all_by_post<'e, E>(executor: E, post_id: i64) -> Result<u64, Error>
where
	E: PgExecutor<'e>,
{
	let status = sqlx::query("DELETE FROM comment WHERE post_id = $1")
		.bind(post_id)
		.execute(executor)
		.await?;

	Ok(status.rows_affected())
}
