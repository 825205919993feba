use std::{net::IpAddr, str::FromStr};

use tracing::Level;

/// An error while reading the configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{key} has an invalid value {value:?}")]
	Invalid { key: &'static str, value: String },
}

/// Runtime configuration, read from environment variables.
///
/// A `.env` file is loaded first if present, see `main`.
#[derive(Debug, Clone)]
pub struct Config {
	/// `DATABASE_URL`
	pub database_url: String,
	/// `DATABASE_MAX_CONNECTIONS`, defaults to 5.
	pub max_connections: u32,
	/// `HOST`, defaults to `127.0.0.1`.
	pub host: IpAddr,
	/// `PORT`, defaults to 3000.
	pub port: u16,
	/// `UPLOAD_LIMIT_BYTES`, the largest accepted request body. Defaults to 10 MiB.
	pub upload_limit: usize,
	/// `LOG_LEVEL`, defaults to `info`.
	pub log_level: Level,
	/// `OTEL_EXPORTER_OTLP_ENDPOINT`. Traces and metrics are only exported when set.
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		Ok(Self {
			database_url: lookup("DATABASE_URL").ok_or(Error::Missing("DATABASE_URL"))?,
			max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
			host: parse(&lookup, "HOST", IpAddr::from([127, 0, 0, 1]))?,
			port: parse(&lookup, "PORT", 3000)?,
			upload_limit: parse(&lookup, "UPLOAD_LIMIT_BYTES", 10 * 1024 * 1024)?,
			log_level: parse(&lookup, "LOG_LEVEL", Level::INFO)?,
			otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|url| !url.is_empty()),
		})
	}
}

fn parse<T: FromStr>(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &'static str,
	default: T,
) -> Result<T, Error> {
	match lookup(key) {
		Some(value) => value.parse().map_err(|_| Error::Invalid { key, value }),
		None => Ok(default),
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
		let vars = vars
			.iter()
			.map(|(key, value)| (key.to_string(), value.to_string()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|key| vars.get(key).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[("DATABASE_URL", "postgres://localhost/blog")]).unwrap();

		assert_eq!(config.database_url, "postgres://localhost/blog");
		assert_eq!(config.max_connections, 5);
		assert_eq!(config.host, IpAddr::from([127, 0, 0, 1]));
		assert_eq!(config.port, 3000);
		assert_eq!(config.upload_limit, 10 * 1024 * 1024);
		assert_eq!(config.log_level, Level::INFO);
		assert_eq!(config.otlp_endpoint, None);
	}

	#[test]
	fn test_overrides() {
		let config = config(&[
			("DATABASE_URL", "postgres://db/blog"),
			("HOST", "0.0.0.0"),
			("PORT", "8080"),
			("LOG_LEVEL", "debug"),
			("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
		])
		.unwrap();

		assert_eq!(config.host, IpAddr::from([0, 0, 0, 0]));
		assert_eq!(config.port, 8080);
		assert_eq!(config.log_level, Level::DEBUG);
		assert_eq!(config.otlp_endpoint.as_deref(), Some("http://collector:4317"));
	}

	#[test]
	fn test_missing_database_url() {
		assert!(matches!(config(&[]), Err(Error::Missing("DATABASE_URL"))));
	}

	#[test]
	fn test_invalid_port() {
		let error = config(&[("DATABASE_URL", "postgres://db"), ("PORT", "http")]).unwrap_err();

		assert!(matches!(error, Error::Invalid { key: "PORT", .. }));
		assert_eq!(error.to_string(), r#"PORT has an invalid value "http""#);
	}
}
