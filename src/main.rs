#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod model;
mod openapi;
mod ratelimit;
mod route;
mod service;
mod store;
#[cfg(test)]
mod test;
mod trace;

use std::net::SocketAddr;

use sqlx::postgres::PgPoolOptions;
use tower_governor::GovernorLayer;

use crate::{config::Config, service::Blog};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// Handlers extract the parts they need with [`axum::extract::State`],
/// e.g. `State(blog): State<Blog>`.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub blog: Blog,
}

impl State {
	pub fn new(database: Database) -> Self {
		Self {
			blog: Blog::new(database),
		}
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();

	let config = Config::from_env()?;
	let _guard = trace::init_tracing_subscriber(&config)?;

	let database = PgPoolOptions::new()
		.max_connections(config.max_connections)
		.connect(&config.database_url)
		.await?;

	sqlx::migrate!().run(&database).await?;

	let governor = ratelimit::default().ok_or("invalid rate limit configuration")?;

	ratelimit::cleanup_old_limits(&[&governor]);

	let app = route::app(State::new(database), config.upload_limit).layer(GovernorLayer {
		config: governor,
	});

	let listener = tokio::net::TcpListener::bind((config.host, config.port)).await?;

	tracing::info!("listening on {}", listener.local_addr()?);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.await?;

	Ok(())
}
