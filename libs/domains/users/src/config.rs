use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Default upper bound on a user's name, in characters.
pub const DEFAULT_MAX_NAME_LEN: usize = 100;
/// Page size used when a list request does not supply one.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Largest page size a list request may ask for.
pub const DEFAULT_MAX_PER_PAGE: u32 = 100;

/// Which characters a user's name may contain.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NamePolicy {
    /// ASCII letters, whitespace, hyphens and apostrophes.
    #[default]
    Strict,
    /// Anything except control characters and angle brackets.
    Relaxed,
}

/// Whether a deleted user's email may be registered again.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EmailReusePolicy {
    #[default]
    AfterDelete,
    /// Every email ever registered stays reserved for the directory's lifetime.
    Never,
}

/// A [`DirectoryConfig`] that cannot drive a directory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryConfigError {
    #[error("max_name_len must be at least 1")]
    MaxNameLen,

    #[error("max_per_page must be at least 1")]
    MaxPerPage,

    #[error("default_per_page must be between 1 and {max_per_page}, got {default_per_page}")]
    DefaultPerPage { default_per_page: u32, max_per_page: u32 },
}

/// Tunables for a [`UserDirectory`](crate::service::UserDirectory).
///
/// Fields are public for struct-literal construction; a directory only
/// accepts a config that passes [`DirectoryConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub max_name_len: usize,
    pub name_policy: NamePolicy,
    pub email_reuse: EmailReusePolicy,
    pub default_per_page: u32,
    pub max_per_page: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            name_policy: NamePolicy::default(),
            email_reuse: EmailReusePolicy::default(),
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: DEFAULT_MAX_PER_PAGE,
        }
    }
}

impl DirectoryConfig {
    pub fn validate(&self) -> Result<(), DirectoryConfigError> {
        if self.max_name_len == 0 {
            return Err(DirectoryConfigError::MaxNameLen);
        }

        if self.max_per_page == 0 {
            return Err(DirectoryConfigError::MaxPerPage);
        }

        if !(1..=self.max_per_page).contains(&self.default_per_page) {
            return Err(DirectoryConfigError::DefaultPerPage {
                default_per_page: self.default_per_page,
                max_per_page: self.max_per_page,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_policies_parse_from_snake_case() {
        assert_eq!(NamePolicy::from_str("relaxed").unwrap(), NamePolicy::Relaxed);
        assert_eq!(NamePolicy::from_str("STRICT").unwrap(), NamePolicy::Strict);
        assert_eq!(
            EmailReusePolicy::from_str("after_delete").unwrap(),
            EmailReusePolicy::AfterDelete
        );
        assert_eq!(EmailReusePolicy::from_str("never").unwrap(), EmailReusePolicy::Never);
        assert!(EmailReusePolicy::from_str("sometimes").is_err());
    }

    #[test]
    fn test_policies_display_round_trip_names() {
        assert_eq!(EmailReusePolicy::AfterDelete.to_string(), "after_delete");
        assert_eq!(NamePolicy::Relaxed.to_string(), "relaxed");
    }

    #[test]
    fn test_default_config() {
        let config = DirectoryConfig::default();
        assert_eq!(config.max_name_len, 100);
        assert_eq!(config.name_policy, NamePolicy::Strict);
        assert_eq!(config.email_reuse, EmailReusePolicy::AfterDelete);
        assert_eq!(config.default_per_page, 10);
        assert_eq!(config.max_per_page, 100);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(DirectoryConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_default_page_size_rejected() {
        let config = DirectoryConfig {
            default_per_page: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(DirectoryConfigError::DefaultPerPage {
                default_per_page: 0,
                max_per_page: 100
            })
        );
    }

    #[test]
    fn test_default_page_size_above_max_rejected() {
        let config = DirectoryConfig {
            default_per_page: 30,
            max_per_page: 20,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DirectoryConfigError::DefaultPerPage { .. })
        ));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let no_names = DirectoryConfig {
            max_name_len: 0,
            ..Default::default()
        };
        assert_eq!(no_names.validate(), Err(DirectoryConfigError::MaxNameLen));

        let no_pages = DirectoryConfig {
            max_per_page: 0,
            default_per_page: 0,
            ..Default::default()
        };
        assert_eq!(no_pages.validate(), Err(DirectoryConfigError::MaxPerPage));
    }
}
