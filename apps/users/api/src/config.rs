//! Configuration for Users API

use core_config::{app_info, env_parse_or, server::ServerConfig, AppInfo, ConfigError, FromEnv};
use domain_users::{
    config::{DEFAULT_MAX_NAME_LEN, DEFAULT_MAX_PER_PAGE, DEFAULT_PER_PAGE},
    DirectoryConfig, DirectoryConfigError, EmailReusePolicy, NamePolicy,
};

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub directory: DirectoryConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let directory = directory_from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            directory,
        })
    }
}

/// Reads the `USERS_*` variables, falling back to the directory defaults.
fn directory_from_env() -> Result<DirectoryConfig, ConfigError> {
    let config = DirectoryConfig {
        max_name_len: env_parse_or("USERS_MAX_NAME_LEN", DEFAULT_MAX_NAME_LEN)?,
        name_policy: env_parse_or("USERS_NAME_POLICY", NamePolicy::default())?,
        email_reuse: env_parse_or("USERS_EMAIL_REUSE", EmailReusePolicy::default())?,
        default_per_page: env_parse_or("USERS_DEFAULT_PER_PAGE", DEFAULT_PER_PAGE)?,
        max_per_page: env_parse_or("USERS_MAX_PER_PAGE", DEFAULT_MAX_PER_PAGE)?,
    };

    config.validate().map_err(|e| {
        let key = match e {
            DirectoryConfigError::MaxNameLen => "USERS_MAX_NAME_LEN",
            DirectoryConfigError::MaxPerPage => "USERS_MAX_PER_PAGE",
            DirectoryConfigError::DefaultPerPage { .. } => "USERS_DEFAULT_PER_PAGE",
        };
        ConfigError::Invalid {
            key: key.to_string(),
            details: e.to_string(),
        }
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS_VARS: [&str; 5] = [
        "USERS_MAX_NAME_LEN",
        "USERS_NAME_POLICY",
        "USERS_EMAIL_REUSE",
        "USERS_DEFAULT_PER_PAGE",
        "USERS_MAX_PER_PAGE",
    ];

    fn with_users_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let all: Vec<(&str, Option<&str>)> = USERS_VARS
            .iter()
            .map(|key| {
                let value = vars.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect();
        temp_env::with_vars(all, f);
    }

    fn invalid_key() -> String {
        match directory_from_env() {
            Err(ConfigError::Invalid { key, .. }) => key,
            other => panic!("expected an invalid variable, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_defaults() {
        with_users_vars(&[], || {
            assert_eq!(directory_from_env().unwrap(), DirectoryConfig::default());
        });
    }

    #[test]
    fn test_directory_from_env_values() {
        with_users_vars(
            &[
                ("USERS_MAX_NAME_LEN", "50"),
                ("USERS_NAME_POLICY", "relaxed"),
                ("USERS_EMAIL_REUSE", "never"),
                ("USERS_DEFAULT_PER_PAGE", "20"),
                ("USERS_MAX_PER_PAGE", "50"),
            ],
            || {
                let config = directory_from_env().unwrap();
                assert_eq!(config.max_name_len, 50);
                assert_eq!(config.name_policy, NamePolicy::Relaxed);
                assert_eq!(config.email_reuse, EmailReusePolicy::Never);
                assert_eq!(config.default_per_page, 20);
                assert_eq!(config.max_per_page, 50);
            },
        );
    }

    #[test]
    fn test_unknown_policy_names_variable() {
        with_users_vars(&[("USERS_EMAIL_REUSE", "sometimes")], || {
            let err = directory_from_env().unwrap_err();
            assert!(err.to_string().contains("USERS_EMAIL_REUSE"));
        });
    }

    #[test]
    fn test_default_page_size_must_fit_max() {
        with_users_vars(
            &[("USERS_DEFAULT_PER_PAGE", "30"), ("USERS_MAX_PER_PAGE", "20")],
            || {
                assert_eq!(invalid_key(), "USERS_DEFAULT_PER_PAGE");
            },
        );
    }

    #[test]
    fn test_config_from_env_reports_app_info() {
        let mut vars: Vec<(&str, Option<&str>)> = USERS_VARS.iter().map(|k| (*k, None)).collect();
        vars.extend([("HOST", None), ("PORT", Some("4000")), ("APP_ENV", None)]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.app.name, "users_api");
            assert_eq!(config.server.port, 4000);
            assert!(config.environment.is_development());
        });
    }

    #[test]
    fn test_zero_limits_name_their_variable() {
        with_users_vars(&[("USERS_DEFAULT_PER_PAGE", "0")], || {
            assert_eq!(invalid_key(), "USERS_DEFAULT_PER_PAGE");
        });

        with_users_vars(&[("USERS_MAX_NAME_LEN", "0")], || {
            assert_eq!(invalid_key(), "USERS_MAX_NAME_LEN");
        });
    }
}
