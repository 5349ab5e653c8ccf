//! Users Domain
//!
//! An in-memory user directory: create, fetch by id, paginated listing and
//! delete, with validation of every piece of caller input.
//!
//! # Features
//!
//! - Name and email validation (`validator`) with configurable name policy
//! - Strict numeric identifiers that are never reused
//! - `page`/`perPage` pagination with a `limit`/`offset` alternative
//! - Configurable email reuse after deletion
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Directory  │  ← Input parsing and validation, orchestration
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Storage (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, typed ids
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     repository::InMemoryUserRepository,
//!     service::UserDirectory,
//!     DirectoryConfig,
//! };
//!
//! # fn main() -> Result<(), domain_users::DirectoryConfigError> {
//! // Create repository and directory
//! let repository = InMemoryUserRepository::new();
//! let directory = UserDirectory::new(repository, DirectoryConfig::default())?;
//!
//! // Create Axum router
//! let router = handlers::router(directory);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use config::{DirectoryConfig, DirectoryConfigError, EmailReusePolicy, NamePolicy};
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreateUser, DeletedUser, ListUsersQuery, User, UserId, UserPage};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserDirectory;
