use std::sync::Arc;

use crate::config::{DirectoryConfig, DirectoryConfigError};
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, ListUsersQuery, User, UserPage};
use crate::repository::UserRepository;
use crate::validation::{parse_page_request, parse_user_id, validate_create};

/// The user directory: validates every request and delegates storage to
/// its repository.
///
/// Input is fully parsed before the repository is called, so a rejected
/// request never mutates state. The directory does not log; callers decide
/// what to record.
pub struct UserDirectory<R: UserRepository> {
    repository: Arc<R>,
    config: DirectoryConfig,
}

impl<R: UserRepository> Clone for UserDirectory<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
        }
    }
}

impl<R: UserRepository> UserDirectory<R> {
    /// Fails if `config` could not serve a list request.
    pub fn new(repository: R, config: DirectoryConfig) -> Result<Self, DirectoryConfigError> {
        config.validate()?;

        Ok(Self {
            repository: Arc::new(repository),
            config,
        })
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Create a new user
    pub async fn create(&self, input: CreateUser) -> UserResult<User> {
        let new_user = validate_create(&input, &self.config)?;

        self.repository
            .insert(new_user, self.config.email_reuse)
            .await
    }

    /// Get a user by the raw path identifier
    pub async fn get_by_id(&self, raw_id: &str) -> UserResult<User> {
        let id = parse_user_id(raw_id)?;

        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// List users one page at a time
    pub async fn list(&self, query: &ListUsersQuery) -> UserResult<UserPage> {
        let request = parse_page_request(query, &self.config)?;

        let (users, total) = self
            .repository
            .page(request.offset(), request.limit())
            .await?;

        Ok(UserPage {
            users,
            total,
            page: request.page,
            per_page: request.per_page,
            total_pages: total.div_ceil(request.limit()),
        })
    }

    /// Delete a user by the raw path identifier, returning the removed record
    pub async fn delete_by_id(&self, raw_id: &str) -> UserResult<User> {
        let id = parse_user_id(raw_id)?;

        self.repository
            .remove(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Number of users currently in the directory
    pub async fn count(&self) -> UserResult<usize> {
        self.repository.count().await
    }
}
