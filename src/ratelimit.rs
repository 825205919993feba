use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use governor::{
	clock::QuantaInstant,
	middleware::{RateLimitingMiddleware, StateInformationMiddleware},
};
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::{KeyExtractor, PeerIpKeyExtractor},
	GovernorError,
};

use crate::error::{ErrorShape, Message, RouteError};

pub type Config = GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Limits each peer to 10 requests per second, with bursts of up to 50.
pub fn default() -> Option<Arc<Config>> {
	GovernorConfigBuilder::default()
		.per_second(10)
		.burst_size(50)
		.use_headers()
		.error_handler(error_handler)
		.finish()
		.map(Arc::new)
}

fn error_handler(error: GovernorError) -> Response<Body> {
	let headers = match &error {
		GovernorError::TooManyRequests { headers, .. } | GovernorError::Other { headers, .. } => {
			headers.clone()
		}
		GovernorError::UnableToExtractKey => None,
	};

	let mut response = RouteError::Route(error).into_response();

	if let Some(headers) = headers {
		response.headers_mut().extend(headers);
	}

	response
}

impl ErrorShape for GovernorError {
	fn status(&self) -> StatusCode {
		match self {
			Self::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
			Self::UnableToExtractKey => StatusCode::INTERNAL_SERVER_ERROR,
			Self::Other { code, .. } => *code,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::TooManyRequests { wait_time, .. } => Message::new("too_many_requests")
				.detail("wait_time", *wait_time)
				.into_vec(),
			Self::UnableToExtractKey => Message::new("internal_error").into_vec(),
			Self::Other { msg, .. } => {
				Message::new(msg.clone().unwrap_or_else(|| "rate_limited".into())).into_vec()
			}
		}
	}
}

/// Periodically drops the state of peers that have not been seen recently.
pub fn cleanup_old_limits<T, M>(configs: &[&Arc<GovernorConfig<T, M>>])
where
	T: KeyExtractor,
	<T as KeyExtractor>::Key: Send + Sync + 'static,
	M: RateLimitingMiddleware<QuantaInstant> + Send + Sync + 'static,
{
	let limiters = configs
		.iter()
		.map(|config| config.limiter().clone())
		.collect::<Vec<_>>();
	let interval = Duration::from_secs(60);

	std::thread::spawn(move || loop {
		std::thread::sleep(interval);

		for limiter in &limiters {
			tracing::debug!("rate limiting storage size: {}", limiter.len());

			limiter.retain_recent();
		}
	});
}
