//! Persistence for posts and comments.
//!
//! Every function takes the executor it runs on, so callers decide whether a
//! statement runs on the pool, on a single pooled connection or inside a
//! transaction.

pub mod comment;
pub mod post;

/// An error returned by the stores.
///
/// The `Display` output is not sent to the client for [`Error::Storage`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(i64),
	#[error("unknown comment {0}")]
	UnknownComment(i64),
	#[error("post {0} has no image")]
	MissingImage(i64),
	#[error("storage unavailable: {0}")]
	Storage(#[from] sqlx::Error),
}

impl Error {
	/// Whether the error means the requested row does not exist.
	pub fn is_not_found(&self) -> bool {
		matches!(
			self,
			Self::UnknownPost(..) | Self::UnknownComment(..) | Self::MissingImage(..)
		)
	}
}
