//! API routes module

use axum::Router;
use axum_helpers::server::{create_router, health_router};
use domain_users::{handlers, InMemoryUserRepository, UserDirectory};
use std::io;

use crate::config::Config;
use crate::openapi::ApiDoc;

/// Build the full application router: users API, docs, health and middleware.
pub fn router(config: &Config) -> io::Result<Router> {
    let directory = UserDirectory::new(InMemoryUserRepository::new(), config.directory.clone())
        .map_err(io::Error::other)?;

    let api_routes = Router::new().nest("/users", handlers::router(directory));
    let router = create_router::<ApiDoc>(api_routes)?;

    Ok(router.merge(health_router(config.app)))
}
