use darling::{ast::NestedMeta, FromMeta};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

#[derive(FromMeta)]
struct RouteArgs {
	#[darling(multiple)]
	tag: Vec<syn::Expr>,
	#[darling(multiple)]
	response: Vec<ResponseArgs>,
}

#[derive(FromMeta)]
struct ResponseArgs {
	status: syn::LitInt,
	shape: Option<syn::Type>,
	description: Option<String>,
}

pub fn from_input(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = match NestedMeta::parse_meta_list(args) {
		Ok(args) => args,
		Err(e) => return e.into_compile_error(),
	};

	let args = match RouteArgs::from_list(&args) {
		Ok(args) => args,
		Err(e) => return e.write_errors(),
	};

	let function = match syn::parse2::<syn::ItemFn>(input) {
		Ok(function) => function,
		Err(e) => return e.into_compile_error(),
	};

	let Some(docs) = Docs::from_attrs(&function.attrs) else {
		return syn::Error::new_spanned(
			&function.sig.ident,
			"a route needs a doc comment, its first line is used as the summary",
		)
		.into_compile_error();
	};

	let fn_name = format_ident!("{}_docs", function.sig.ident);
	let fn_vis = &function.vis;

	let summary = &docs.summary;
	let description = docs
		.description
		.as_ref()
		.map(|description| quote!(.description(#description)));

	let tags = &args.tag;
	let responses = args.response.iter().map(|response| {
		let status = &response.status;
		let shape = response
			.shape
			.as_ref()
			.map_or_else(|| quote!(()), |shape| quote!(#shape));

		match &response.description {
			Some(description) => quote! {
				.response_with::<#status, #shape, _>(|res| res.description(#description))
			},
			None => quote! {
				.response::<#status, #shape>()
			},
		}
	});

	quote! {
		#function

		#fn_vis fn #fn_name(op: aide::transform::TransformOperation) -> aide::transform::TransformOperation {
			op.summary(#summary)
				#description
				#(.tag(#tags))*
				#(#responses)*
		}
	}
}

#[derive(Debug, PartialEq, Eq)]
struct Docs {
	summary: String,
	description: Option<String>,
}

impl Docs {
	/// Reads the `///` lines of an item. Blank lines start a new paragraph
	/// in the description, other lines are joined with a space.
	fn from_attrs(attrs: &[syn::Attribute]) -> Option<Self> {
		let lines = attrs
			.iter()
			.filter(|attr| attr.path().is_ident("doc"))
			.filter_map(|attr| match &attr.meta {
				syn::Meta::NameValue(syn::MetaNameValue {
					value:
						syn::Expr::Lit(syn::ExprLit {
							lit: syn::Lit::Str(line),
							..
						}),
					..
				}) => Some(line.value().trim().to_owned()),
				_ => None,
			})
			.collect::<Vec<_>>();

		let mut lines = lines.iter().skip_while(|line| line.is_empty());
		let summary = lines.next()?.clone();

		let description = lines
			.map(String::as_str)
			.collect::<Vec<_>>()
			.split(|line| line.is_empty())
			.filter(|paragraph| !paragraph.is_empty())
			.map(|paragraph| paragraph.join(" "))
			.collect::<Vec<_>>()
			.join("\n\n");

		Some(Self {
			summary,
			description: (!description.is_empty()).then_some(description),
		})
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn docs(function: syn::ItemFn) -> Option<Docs> {
		Docs::from_attrs(&function.attrs)
	}

	#[test]
	fn test_summary_and_description() {
		let docs = docs(syn::parse_quote! {
			/// Get posts
			/// Returns a page of posts,
			/// oldest first.
			///
			/// Filtered by `search`.
			async fn get_posts() {}
		});

		assert_eq!(
			docs,
			Some(Docs {
				summary: "Get posts".into(),
				description: Some("Returns a page of posts, oldest first.\n\nFiltered by `search`.".into()),
			})
		);
	}

	#[test]
	fn test_summary_only() {
		let docs = docs(syn::parse_quote! {
			/// Delete post
			async fn delete_post() {}
		});

		assert_eq!(docs.unwrap().description, None);
	}

	#[test]
	fn test_missing_docs() {
		assert_eq!(docs(syn::parse_quote! { async fn like_post() {} }), None);
	}

	#[test]
	fn test_generates_docs_function() {
		let output = from_input(
			quote!(tag = tag::POST, response(status = 404, description = "Unknown post")),
			quote! {
				/// Get single post
				pub async fn get_post() {}
			},
		)
		.to_string();

		assert!(output.contains("pub fn get_post_docs"));
		assert!(output.contains("response_with"));
		assert!(output.contains("404"));
		assert!(!output.contains("compile_error"));
	}
}
