use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::{multipart::{MultipartError, MultipartRejection}, rejection},
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message sent to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A machine-readable description of the error.
	pub content: Cow<'a, str>,
	/// The input field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Extra information about the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

impl<'a> Message<'a> {
	pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}

	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(|| Cow::Owned(Map::new()))
			.to_mut()
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
	pub success: bool,
	pub errors: Vec<Message<'a>>,
}

/// How a route-specific error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn errors(&self) -> Vec<Message<'_>>;
}

/// Errors shared by every route, mostly rejections from the extractors.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("multipart error: {0}")]
	Multipart(#[from] MultipartRejection),
	#[error("multipart field error: {0}")]
	MultipartField(#[from] MultipartError),
	#[error("field {0} is not valid utf-8")]
	InvalidField(&'static str),
	#[error("missing field {0}")]
	MissingField(&'static str),
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::Json(error) => error.status(),
			Self::Query(error) => error.status(),
			Self::Path(error) => error.status(),
			Self::Multipart(error) => error.status(),
			Self::MultipartField(error) => error.status(),
			Self::Validation(..) | Self::InvalidField(..) | Self::MissingField(..) => {
				StatusCode::BAD_REQUEST
			}
		}
	}

	pub fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| {
						Message::new(
							error
								.message
								.clone()
								.unwrap_or_else(|| error.code.clone()),
						)
						.field(field.to_string())
					})
				})
				.collect(),
			Self::Json(error) => Message::new(error.body_text()).into_vec(),
			Self::Query(error) => Message::new(error.body_text()).into_vec(),
			Self::Path(error) => Message::new(error.body_text()).into_vec(),
			Self::Multipart(error) => Message::new(error.body_text()).into_vec(),
			Self::MultipartField(error) => Message::new(error.body_text()).into_vec(),
			Self::InvalidField(field) => Message::new("invalid_utf8").field(*field).into_vec(),
			Self::MissingField(field) => Message::new("missing_field").field(*field).into_vec(),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		respond(self.status(), self.errors(), &self)
	}
}

/// The error type returned by route handlers: either a shared [`AppError`]
/// or an error specific to the route.
#[derive(Debug)]
pub enum RouteError<T> {
	App(AppError),
	Route(T),
}

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

impl<T> From<AppError> for RouteError<T> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => respond(error.status(), error.errors(), &error),
		}
	}
}

impl<T> OperationOutput for RouteError<T> {
	type Inner = Self;
}

fn respond(status: StatusCode, errors: Vec<Message<'_>>, source: &dyn std::error::Error) -> Response<Body> {
	if status.is_server_error() {
		tracing::error!(error = %source, "request failed");
	}

	(
		status,
		Json(ErrorResponse {
			success: false,
			errors,
		}),
	)
		.into_response()
}
