//! Parsing of untrusted input into typed values.
//!
//! Everything the directory accepts from a caller passes through here before
//! the repository is touched: names, emails, path identifiers and list
//! windows. Each function either returns a typed value or the matching
//! [`UserError`] validation variant.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{ValidateArgs, ValidationError, ValidationErrors};

use crate::config::{DirectoryConfig, NamePolicy};
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, ListUsersQuery, NewUser, PageRequest, UserId};

/// Upper bound on an email address, in characters.
pub const MAX_EMAIL_LEN: usize = 254;

/// Highest page number a list request may ask for.
pub const MAX_PAGE: u32 = 10_000;

/// Letters, whitespace, hyphens and apostrophes
static STRICT_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").unwrap());

/// No control characters or angle brackets
static RELAXED_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\p{Cc}<>]+$").unwrap());

/// `local@label(.label)+` with RFC 5322 atext in the local part and
/// hostname-style labels in the domain.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
    )
    .unwrap()
});

/// A trimmed name that satisfied the directory's name rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidName(String);

impl ValidName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A trimmed, lower-cased, well-shaped email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidEmail(String);

impl ValidEmail {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Name rules that depend on the directory's configuration. Emptiness is
/// left to the `length` rule on [`CreateUser`].
pub fn check_name(name: &str, config: &DirectoryConfig) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Ok(());
    }

    if name.chars().count() > config.max_name_len {
        return Err(rule(
            "name_too_long",
            format!("Name must be {} characters or less", config.max_name_len),
        ));
    }

    match config.name_policy {
        NamePolicy::Strict if !STRICT_NAME.is_match(name) => Err(rule(
            "name_charset",
            "Name can only contain letters, spaces, hyphens, and apostrophes",
        )),
        NamePolicy::Relaxed if !RELAXED_NAME.is_match(name) => Err(rule(
            "name_charset",
            "Name cannot contain control characters or angle brackets",
        )),
        _ => Ok(()),
    }
}

pub fn check_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Ok(());
    }

    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(rule(
            "email_too_long",
            format!("Email must be {} characters or less", MAX_EMAIL_LEN),
        ));
    }

    if !EMAIL_SHAPE.is_match(email) {
        return Err(rule("email_shape", "Email must be a valid email address"));
    }

    Ok(())
}

fn rule(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Normalises a create request and checks it against `config`.
///
/// The name is trimmed and the email trimmed and lower-cased before the
/// `Validate` rules run. When both fields are invalid the name is reported.
pub fn validate_create(input: &CreateUser, config: &DirectoryConfig) -> UserResult<NewUser> {
    let candidate = CreateUser {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_lowercase(),
    };

    if let Err(errors) = candidate.validate_with_args(config) {
        if let Some(message) = first_message(&errors, "name") {
            return Err(UserError::InvalidName(message));
        }
        let message = first_message(&errors, "email").unwrap_or_else(|| errors.to_string());
        return Err(UserError::InvalidEmail(message));
    }

    Ok(NewUser {
        name: ValidName(candidate.name),
        email: ValidEmail(candidate.email),
    })
}

fn first_message(errors: &ValidationErrors, field: &str) -> Option<String> {
    let field_errors = errors.field_errors();
    let error = field_errors.get(field)?.first()?;

    Some(match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    })
}

/// Parses a path segment into a [`UserId`].
///
/// Only plain ASCII digits are accepted: no sign, whitespace, decimal point
/// or exponent. The value must lie in `1..=UserId::MAX`.
pub fn parse_user_id(raw: &str) -> UserResult<UserId> {
    let invalid = || {
        UserError::InvalidIdentifier("User ID must be a valid positive integer".to_string())
    };

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    raw.parse::<u64>()
        .ok()
        .and_then(UserId::new)
        .ok_or_else(invalid)
}

/// Resolves list query parameters into a [`PageRequest`].
///
/// `page`/`perPage` is the canonical form. `limit`/`offset` maps onto it as
/// `perPage = limit` and `page = offset / limit + 1`, which requires the
/// offset to fall on a page boundary. Mixing the two forms is rejected.
pub fn parse_page_request(
    query: &ListUsersQuery,
    config: &DirectoryConfig,
) -> UserResult<PageRequest> {
    let page_style = query.page.is_some() || query.per_page.is_some();
    let offset_style = query.limit.is_some() || query.offset.is_some();

    if page_style && offset_style {
        return Err(UserError::InvalidPagination(
            "Use either page/perPage or limit/offset, not both".to_string(),
        ));
    }

    if offset_style {
        let per_page = match &query.limit {
            Some(raw) => parse_bounded("Limit", raw, 1, u64::from(config.max_per_page))? as u32,
            None => config.default_per_page,
        };
        let offset = match &query.offset {
            Some(raw) => parse_bounded("Offset", raw, 0, u64::MAX)?,
            None => 0,
        };

        if offset % u64::from(per_page) != 0 {
            return Err(UserError::InvalidPagination(
                "Offset must be a multiple of limit".to_string(),
            ));
        }

        let page = offset / u64::from(per_page) + 1;
        if page > u64::from(MAX_PAGE) {
            return Err(UserError::InvalidPagination(format!(
                "Offset must not exceed {} pages",
                MAX_PAGE
            )));
        }

        return Ok(PageRequest {
            page: page as u32,
            per_page,
        });
    }

    let page = match &query.page {
        Some(raw) => parse_bounded("Page", raw, 1, u64::from(MAX_PAGE))? as u32,
        None => 1,
    };
    let per_page = match &query.per_page {
        Some(raw) => parse_bounded("Per page", raw, 1, u64::from(config.max_per_page))? as u32,
        None => config.default_per_page,
    };

    Ok(PageRequest { page, per_page })
}

fn parse_bounded(label: &str, raw: &str, min: u64, max: u64) -> UserResult<u64> {
    let out_of_range = || {
        UserError::InvalidPagination(format!("{} must be between {} and {}", label, min, max))
    };

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(if raw.starts_with('-') {
            out_of_range()
        } else {
            UserError::InvalidPagination(format!("{} must be an integer", label))
        });
    }

    let value = raw.parse::<u64>().map_err(|_| out_of_range())?;
    if value < min || value > max {
        return Err(out_of_range());
    }

    Ok(value)
}
