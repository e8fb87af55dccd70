//! Deployment environment used to pick an endpoint's base URL.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Explicit environment name, e.g. `development`.
pub const COURIER_ENVIRONMENT: &str = "COURIER_ENVIRONMENT";
/// Boolean test-mode switch; `true` selects development.
pub const COURIER_TEST_MODE: &str = "COURIER_TEST_MODE";

/// Target environment of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// Every environment, in declaration order.
    pub const ALL: [Environment; 2] = [Environment::Development, Environment::Production];

    /// Test mode maps to development, everything else to production.
    pub fn from_test_mode(is_test_mode: bool) -> Self {
        if is_test_mode {
            Self::Development
        } else {
            Self::Production
        }
    }

    /// Resolve from `COURIER_ENVIRONMENT`, then `COURIER_TEST_MODE`.
    ///
    /// Falls back to production when neither is set or parseable.
    pub fn from_env() -> Self {
        if let Ok(name) = env::var(COURIER_ENVIRONMENT) {
            match name.parse() {
                Ok(environment) => return environment,
                Err(e) => tracing::warn!(target: courier_log::OTHER, "{}", e),
            }
        }

        env::var(COURIER_TEST_MODE)
            .ok()
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .map(Self::from_test_mode)
            .unwrap_or_default()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = EnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(EnvironmentError::Unknown(s.to_string())),
        }
    }
}

/// Environment parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvironmentError {
    #[error("unknown environment: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_test_mode() {
        assert_eq!(Environment::from_test_mode(true), Environment::Development);
        assert_eq!(Environment::from_test_mode(false), Environment::Production);
    }

    #[test]
    fn test_parse() {
        assert_eq!("development".parse(), Ok(Environment::Development));
        assert_eq!("PROD".parse(), Ok(Environment::Production));
        assert_eq!(
            "staging".parse::<Environment>(),
            Err(EnvironmentError::Unknown("staging".to_string()))
        );
    }

    #[test]
    fn test_all_and_display() {
        let names: Vec<String> = Environment::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["development", "production"]);
    }

    #[test]
    fn test_from_env() {
        let original_env = env::var(COURIER_ENVIRONMENT).ok();
        let original_test_mode = env::var(COURIER_TEST_MODE).ok();

        env::set_var(COURIER_ENVIRONMENT, "development");
        assert_eq!(Environment::from_env(), Environment::Development);

        env::remove_var(COURIER_ENVIRONMENT);
        env::set_var(COURIER_TEST_MODE, "1");
        assert_eq!(Environment::from_env(), Environment::Development);

        env::set_var(COURIER_TEST_MODE, "false");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::remove_var(COURIER_TEST_MODE);
        assert_eq!(Environment::from_env(), Environment::Production);

        if let Some(val) = original_env {
            env::set_var(COURIER_ENVIRONMENT, val);
        }
        if let Some(val) = original_test_mode {
            env::set_var(COURIER_TEST_MODE, val);
        }
    }
}
