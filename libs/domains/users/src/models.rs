use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::config::DirectoryConfig;
use crate::error::UserError;
use crate::validation::{ValidEmail, ValidName, check_email, check_name, parse_user_id};

/// Positive integer key of a [`User`].
///
/// Ids are handed out in creation order and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = u64, example = 1)]
pub struct UserId(u64);

impl UserId {
    /// Largest id a JSON client can represent exactly (2^53 - 1).
    pub const MAX: u64 = 9_007_199_254_740_991;

    /// Returns `None` unless `value` is in `1..=UserId::MAX`.
    pub fn new(value: u64) -> Option<Self> {
        (1..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_user_id(s)
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[schema(example = "John Doe")]
    pub name: String,
    /// Trimmed and lower-cased
    #[schema(example = "john@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new user
///
/// Missing fields deserialize as empty strings so they are reported as
/// invalid name/email rather than as a malformed body. The `Validate` rules
/// expect the trimmed form; see [`validate_create`](crate::validation::validate_create).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[validate(context = DirectoryConfig)]
pub struct CreateUser {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Name cannot be empty"),
        custom(function = "check_name", use_context)
    )]
    #[schema(example = "John Doe")]
    pub name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Email cannot be empty"),
        custom(function = "check_email")
    )]
    #[schema(example = "john@example.com")]
    pub email: String,
}

/// Validated input handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: ValidName,
    pub email: ValidEmail,
}

/// Query parameters for listing users
///
/// Either `page`/`perPage` or `limit`/`offset` may be used, never both.
/// Values are kept raw so malformed numbers surface as pagination errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// 1-based page number (1..=10000, default 1)
    #[param(value_type = Option<u32>, example = 1)]
    pub page: Option<String>,
    /// Page size (default 10, max 100)
    #[param(value_type = Option<u32>, example = 10)]
    pub per_page: Option<String>,
    /// Page size, alternative to `perPage`. Used with `offset`, the offset
    /// must fall on a page boundary (a multiple of `limit`).
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
    /// Number of users to skip. Must be a multiple of `limit`, otherwise the
    /// request is rejected as invalid pagination.
    #[param(value_type = Option<u64>)]
    pub offset: Option<String>,
}

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Index of the first user on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.per_page as usize
    }

    pub fn limit(&self) -> usize {
        self.per_page as usize
    }
}

/// One page of users plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: usize,
}

/// Response body for a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletedUser {
    pub deleted: bool,
    pub user: User,
}

impl From<User> for DeletedUser {
    fn from(user: User) -> Self {
        Self {
            deleted: true,
            user,
        }
    }
}
