//! Per-request credential resolution.
//!
//! The deployment flag and the key itself are read when a submission
//! arrives, not at startup; the resolved key lives only as long as the
//! request that needed it.

use counsel_llm::ApiKey;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable holding the completion API key.
pub const API_KEY_VAR: &str = "OPEN_API_KEY";

/// Environment variable distinguishing hosted from local deployments.
pub const DEPLOYMENT_ENV_VAR: &str = "COUNSEL_ENV";

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("No API key is configured: set {API_KEY_VAR} in the environment or the secrets store")]
    MissingCredential,

    #[error("Secrets store {path} is not valid TOML: {source}")]
    StoreInvalid {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Where the process is running, per the ambient environment flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentEnv {
    /// Secrets come from the managed store.
    Hosted,
    /// Secrets come from the process environment.
    Local,
}

impl DeploymentEnv {
    pub fn detect() -> Self {
        match std::env::var(DEPLOYMENT_ENV_VAR).as_deref() {
            Ok("hosted") | Ok("cloud") => Self::Hosted,
            _ => Self::Local,
        }
    }
}

/// Secret source, selected once per resolution from the deployment flag.
#[derive(Debug, Clone)]
pub enum SecretSource {
    /// Local process environment.
    Env { var: String },

    /// Managed TOML store (hosted deployments).
    Store { path: PathBuf, key: String },
}

impl SecretSource {
    pub fn for_environment(env: DeploymentEnv, store_path: &str) -> Self {
        match env {
            DeploymentEnv::Hosted => Self::Store {
                path: PathBuf::from(store_path),
                key: API_KEY_VAR.to_string(),
            },
            DeploymentEnv::Local => Self::Env {
                var: API_KEY_VAR.to_string(),
            },
        }
    }

    /// Resolve the API key. The value is never cached and never logged.
    pub fn resolve(&self) -> Result<ApiKey, SecretError> {
        match self {
            Self::Env { var } => match std::env::var(var) {
                Ok(value) if !value.trim().is_empty() => Ok(ApiKey::new(value)),
                _ => Err(SecretError::MissingCredential),
            },
            Self::Store { path, key } => {
                // An absent or unreadable store means no value, same as an
                // unset variable
                let raw = std::fs::read_to_string(path)
                    .map_err(|_| SecretError::MissingCredential)?;

                let table: toml::Table =
                    raw.parse().map_err(|source| SecretError::StoreInvalid {
                        path: path.display().to_string(),
                        source,
                    })?;

                match table.get(key).and_then(|value| value.as_str()) {
                    Some(value) if !value.trim().is_empty() => Ok(ApiKey::new(value)),
                    _ => Err(SecretError::MissingCredential),
                }
            }
        }
    }
}

/// Resolve the key for one submission from the ambient deployment flag.
pub fn resolve_api_key(store_path: &str) -> Result<ApiKey, SecretError> {
    SecretSource::for_environment(DeploymentEnv::detect(), store_path).resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn env_source_resolves_set_variable() {
        std::env::set_var("COUNSEL_TEST_KEY_SET", "sk-test");

        let source = SecretSource::Env {
            var: "COUNSEL_TEST_KEY_SET".to_string(),
        };

        let key = source.resolve().unwrap();
        assert_eq!(key.expose(), "sk-test");
    }

    #[test]
    fn env_source_missing_variable_is_missing_credential() {
        let source = SecretSource::Env {
            var: "COUNSEL_TEST_KEY_UNSET".to_string(),
        };

        assert!(matches!(
            source.resolve(),
            Err(SecretError::MissingCredential)
        ));
    }

    #[test]
    fn env_source_blank_variable_is_missing_credential() {
        std::env::set_var("COUNSEL_TEST_KEY_BLANK", "   ");

        let source = SecretSource::Env {
            var: "COUNSEL_TEST_KEY_BLANK".to_string(),
        };

        assert!(matches!(
            source.resolve(),
            Err(SecretError::MissingCredential)
        ));
    }

    #[test]
    fn store_source_reads_key_entry() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{} = \"sk-store\"", API_KEY_VAR).unwrap();

        let source = SecretSource::Store {
            path: file.path().to_path_buf(),
            key: API_KEY_VAR.to_string(),
        };

        let key = source.resolve().unwrap();
        assert_eq!(key.expose(), "sk-store");
    }

    #[test]
    fn store_source_absent_file_is_missing_credential() {
        let dir = tempfile::tempdir().unwrap();

        let source = SecretSource::Store {
            path: dir.path().join("no-such-secrets.toml"),
            key: API_KEY_VAR.to_string(),
        };

        assert!(matches!(
            source.resolve(),
            Err(SecretError::MissingCredential)
        ));
    }

    #[test]
    fn store_source_absent_entry_is_missing_credential() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "OTHER_KEY = \"value\"").unwrap();

        let source = SecretSource::Store {
            path: file.path().to_path_buf(),
            key: API_KEY_VAR.to_string(),
        };

        assert!(matches!(
            source.resolve(),
            Err(SecretError::MissingCredential)
        ));
    }

    #[test]
    fn store_source_malformed_toml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();

        let source = SecretSource::Store {
            path: file.path().to_path_buf(),
            key: API_KEY_VAR.to_string(),
        };

        assert!(matches!(source.resolve(), Err(SecretError::StoreInvalid { .. })));
    }

    #[test]
    fn hosted_environment_selects_the_store() {
        let source = SecretSource::for_environment(DeploymentEnv::Hosted, "config/secrets.toml");
        assert!(matches!(source, SecretSource::Store { .. }));

        let source = SecretSource::for_environment(DeploymentEnv::Local, "config/secrets.toml");
        assert!(matches!(source, SecretSource::Env { .. }));
    }
}
