//! Helpers shared by the test modules.

use axum_test::TestServer;

pub use serde_json::json;

pub use crate::{service::Blog, Database};

/// Upload limit used by [`app`], small enough to test rejections.
pub const UPLOAD_LIMIT: usize = 64 * 1024;

/// Builds a test server around the full router, without rate limiting.
pub fn app(pool: Database) -> TestServer {
	let app = crate::route::app(crate::State::new(pool), UPLOAD_LIMIT);

	TestServer::new(app).unwrap()
}

pub fn blog(pool: Database) -> Blog {
	Blog::new(pool)
}
