use std::collections::HashMap;

use aide::{
	gen::GenContext,
	openapi::{MediaType, Operation, RequestBody, SchemaObject},
	operation::set_body,
	OperationInput,
};
use axum::{
	body::Bytes,
	extract::{FromRequest, Request},
};

use crate::error::AppError;

/// The named parts of a `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct Fields {
	parts: HashMap<String, Bytes>,
}

impl Fields {
	pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Bytes>) {
		self.parts.insert(name.into(), data.into());
	}

	/// Returns a text part, or `None` if the part was not sent.
	pub fn text(&self, name: &'static str) -> Result<Option<String>, AppError> {
		self.parts
			.get(name)
			.map(|data| {
				std::str::from_utf8(data)
					.map(str::to_owned)
					.map_err(|_| AppError::InvalidField(name))
			})
			.transpose()
	}

	/// Returns a file part, or `None` if the part was not sent or is empty.
	///
	/// Browsers send an empty part when no file was chosen.
	pub fn file(&self, name: &str) -> Option<Vec<u8>> {
		self.parts
			.get(name)
			.filter(|data| !data.is_empty())
			.map(|data| data.to_vec())
	}
}

/// Documents a form part as an uploaded file.
pub struct File;

impl schemars::JsonSchema for File {
	fn schema_name() -> String {
		"File".into()
	}

	fn json_schema(_: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
		schemars::schema::SchemaObject {
			instance_type: Some(schemars::schema::InstanceType::String.into()),
			format: Some("binary".into()),
			..Default::default()
		}
		.into()
	}
}

/// Types that can be built from the parts of a multipart form.
pub trait FromMultipart: Sized {
	fn from_multipart(fields: Fields) -> Result<Self, AppError>;
}

/// Extractor that reads a `multipart/form-data` body and validates it.
///
/// ```rust
/// async fn route(Multipart(form): Multipart<PostForm>) {
///   // ...
/// }
/// ```
pub struct Multipart<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Multipart<T>
where
	T: FromMultipart + validator::Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let mut multipart = axum::extract::Multipart::from_request(req, state).await?;
		let mut fields = Fields::default();

		while let Some(field) = multipart.next_field().await? {
			let Some(name) = field.name().map(str::to_owned) else {
				continue;
			};

			fields.insert(name, field.bytes().await?);
		}

		let result = T::from_multipart(fields)?;

		result.validate().map_err(Self::Rejection::Validation)?;
		Ok(Self(result))
	}
}

impl<T: schemars::JsonSchema> OperationInput for Multipart<T> {
	fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
		let schema = ctx.schema.subschema_for::<T>();
		let mut body = RequestBody {
			required: true,
			..Default::default()
		};

		body.content.insert(
			"multipart/form-data".into(),
			MediaType {
				schema: Some(SchemaObject {
					json_schema: schema,
					example: None,
					external_docs: None,
				}),
				..Default::default()
			},
		);

		set_body(ctx, operation, body);
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_text_and_file_parts() {
		let mut fields = Fields::default();

		fields.insert("title", "Post 1");
		fields.insert("image", Vec::<u8>::new());
		fields.insert("bad", vec![0xff_u8, 0xfe]);

		assert_eq!(fields.text("title").unwrap().as_deref(), Some("Post 1"));
		assert_eq!(fields.text("tags").unwrap(), None);
		assert_eq!(fields.file("image"), None);
		assert_eq!(fields.file("title"), Some(b"Post 1".to_vec()));
		assert!(matches!(
			fields.text("bad"),
			Err(AppError::InvalidField("bad"))
		));
	}
}
