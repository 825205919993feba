use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{extract::DefaultBodyLimit, http::StatusCode, Extension, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{error, openapi, store, AppState};

pub mod comment;
pub mod docs;
pub mod model;
pub mod post;

pub type RouteError = error::RouteError<store::Error>;

/// Builds the application router, including the API documentation.
pub fn app(state: AppState, upload_limit: usize) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest_api_service("/posts", post::routes(state))
		.nest_api_service("/docs", docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(DefaultBodyLimit::max(upload_limit))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
}

impl error::ErrorShape for store::Error {
	fn status(&self) -> StatusCode {
		if self.is_not_found() {
			StatusCode::NOT_FOUND
		} else {
			StatusCode::INTERNAL_SERVER_ERROR
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		match self {
			Self::UnknownPost(post) => error::Message::new("unknown_post")
				.detail("post", *post)
				.into_vec(),
			Self::UnknownComment(comment) => error::Message::new("unknown_comment")
				.detail("comment", *comment)
				.into_vec(),
			Self::MissingImage(post) => error::Message::new("missing_image")
				.detail("post", *post)
				.into_vec(),
			Self::Storage(..) => error::Message::new("internal_error").into_vec(),
		}
	}
}

#[cfg(test)]
mod test {
	use axum::response::IntoResponse;

	use crate::test::{app, *};

	use super::*;

	#[tokio::test]
	async fn test_storage_error_is_hidden() {
		let error = RouteError::from(store::Error::from(sqlx::Error::PoolTimedOut));
		let response = error.into_response();

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let body = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let body = serde_json::from_slice::<serde_json::Value>(&body).unwrap();

		assert_eq!(
			body,
			json!({
				"success": false,
				"errors": [{ "content": "internal_error" }],
			})
		);
	}

	#[sqlx::test]
	async fn test_api_document_describes_forms(pool: Database) {
		let response = app(pool).get("/docs/api.json").await;

		assert_eq!(response.status_code(), 200);

		let api = response.json::<serde_json::Value>();
		let forms = api["paths"]
			.as_object()
			.unwrap()
			.values()
			.flat_map(|path| [&path["post"], &path["put"]])
			.filter(|op| op["requestBody"]["content"]["multipart/form-data"].is_object())
			.count();

		assert_eq!(forms, 2);
		assert!(api["components"]["schemas"]["PostForm"]["properties"]["title"].is_object());
		assert_eq!(api["components"]["schemas"]["File"]["format"], "binary");
		assert_eq!(
			api["paths"]["/posts/{id}"]["get"]["summary"],
			"Get single post"
		);
	}
}
