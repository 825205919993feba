use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use crate::model::Paginate;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn one() -> i64 {
	1
}

#[inline]
fn five() -> i64 {
	5
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct SearchInput {
	/// Only return posts whose tags contain this text (case-sensitive).
	#[serde(default)]
	#[validate(length(max = 256))]
	pub search: String,
	/// The page number to return (1-indexed).
	#[validate(range(min = 1, max = 1_000_000_000))]
	#[serde(default = "one")]
	pub page: i64,
	/// The number of posts to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "five")]
	pub size: i64,
}

impl SearchInput {
	pub fn paginate(&self) -> Paginate {
		Paginate {
			page: self.page,
			size: self.size,
		}
	}
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct PostPath {
	/// The unique identifier of the post.
	#[validate(range(min = 1))]
	pub id: i64,
}

#[cfg(test)]
mod test {
	use serde_json::json;

	use super::*;

	fn input(query: serde_json::Value) -> SearchInput {
		serde_json::from_value(query).unwrap()
	}

	#[test]
	fn test_search_defaults() {
		let search = input(json!({}));

		assert_eq!(search.search, "");
		assert_eq!(search.paginate(), Paginate { page: 1, size: 5 });
		assert!(search.validate().is_ok());
	}

	#[test]
	fn test_search_bounds() {
		assert!(input(json!({ "page": 0 })).validate().is_err());
		assert!(input(json!({ "size": 0 })).validate().is_err());
		assert!(input(json!({ "size": 101 })).validate().is_err());
		assert!(input(json!({ "page": i64::MAX, "size": 100 }))
			.validate()
			.is_err());
		assert!(input(json!({ "search": "Tag1", "page": 3, "size": 100 }))
			.validate()
			.is_ok());

		let last = input(json!({ "page": 1_000_000_000, "size": 100 }));

		assert!(last.validate().is_ok());
		assert_eq!(last.paginate().offset(), 99_999_999_900);
	}
}
