mod route;

use proc_macro::TokenStream;

/// Creates the documentation function of a route handler, named after the
/// handler with the suffix `_docs`.
///
/// The first line of the doc comment becomes the summary and the remaining
/// lines the description.
///
/// ```ignore
/// /// Get single post
/// /// Returns a single post and its comments by its unique id.
/// #[route(tag = tag::POST, response(status = 404, description = "The post does not exist"))]
/// pub async fn get_post(/* ... */) {}
/// ```
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args.into(), input.into()).into()
}
